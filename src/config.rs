use std::{env, str::FromStr};

use log::{info, warn};
use scrumpoker_server::DEFAULT_PORT;

use crate::ScrumpokerError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Start-up settings, read from the environment
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string. Without it rooms are kept in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Config {
    pub fn load() -> Result<Self, ScrumpokerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScrumpokerError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        if database_url.is_none() {
            warn!("DATABASE_URL not set, rooms will only be kept in memory");
        }

        Ok(Self {
            port: try_load_positive(&lookup, "PORT", DEFAULT_PORT)?,
            database_url,
            max_connections: try_load_positive(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
        })
    }
}

fn try_load<T>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ScrumpokerError>
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ScrumpokerError::Config {
            key,
            value: value.clone(),
        }),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

/// Like `try_load`, but zero is rejected as well
fn try_load_positive<T>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ScrumpokerError>
where
    T: FromStr + std::fmt::Display + Default + PartialEq,
{
    let value = try_load(lookup, key, default)?;

    if value == T::default() {
        return Err(ScrumpokerError::Config {
            key,
            value: value.to_string(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use crate::ScrumpokerError;

    use super::Config;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ScrumpokerError> {
        let vars: HashMap<_, _> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 5);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("DATABASE_URL", "postgres://localhost/scrumpoker"),
        ])
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/scrumpoker")
        );
    }

    #[test]
    fn invalid_port_is_an_error() {
        let result = config_from(&[("PORT", "eighty")]);

        assert!(matches!(
            result,
            Err(ScrumpokerError::Config { key: "PORT", .. })
        ));
    }

    #[test]
    fn zero_counts_are_rejected() {
        let result = config_from(&[("DATABASE_MAX_CONNECTIONS", "0")]);
        assert!(matches!(
            result,
            Err(ScrumpokerError::Config {
                key: "DATABASE_MAX_CONNECTIONS",
                ..
            })
        ));

        let result = config_from(&[("PORT", " 0 ")]);
        assert!(matches!(
            result,
            Err(ScrumpokerError::Config { key: "PORT", .. })
        ));
    }
}
