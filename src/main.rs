use std::process;

use colored::Colorize;
use config::Config;
use log::{error, info};
use scrumpoker_collab::{Collab, DatabaseError, MemoryDatabase, PgDatabase};
use scrumpoker_server::{run_server, ServerContext};
use thiserror::Error;
use tokio::runtime::{self, Runtime};

mod config;
mod logging;

pub struct Scrumpoker {
    config: Config,
    context: ServerContext,
    runtime: Runtime,
}

#[derive(Debug, Error)]
pub enum ScrumpokerError {
    #[error("Invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },

    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server failed: {0}")]
    Server(std::io::Error),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Scrumpoker {
    fn new() -> Result<Self, ScrumpokerError> {
        let config = Config::load()?;

        info!("Building async runtime...");
        let main_runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("scrumpoker-async")
            .build()
            .map_err(|e| ScrumpokerError::Fatal(e.to_string()))?;

        let collab = match &config.database_url {
            Some(url) => {
                info!("Connecting to database...");
                let database =
                    main_runtime.block_on(PgDatabase::new(url, config.max_connections))?;

                Collab::new(database)
            }
            None => Collab::new(MemoryDatabase::new()),
        };

        Ok(Self {
            config,
            context: ServerContext::new(collab),
            runtime: main_runtime,
        })
    }

    fn run(&self) -> Result<(), ScrumpokerError> {
        self.runtime
            .block_on(run_server(self.context.clone(), self.config.port))
            .map_err(ScrumpokerError::Server)
    }
}

impl ScrumpokerError {
    fn hint(&self) -> String {
        match self {
            ScrumpokerError::Config { key, .. } => format!("Check the {} environment variable. Ports and connection counts must be positive numbers.", key),
            ScrumpokerError::Database(_) => "This is a database error. Make sure DATABASE_URL points to a running Postgres instance, or unset it to keep rooms in memory.".to_string(),
            ScrumpokerError::Server(_) => "The server could not listen. Make sure the port is not already in use.".to_string(),
            ScrumpokerError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn report(error: ScrumpokerError) -> ! {
    error!(
        "{} Read the error below to troubleshoot the issue.",
        "Scrumpoker failed!".bold().red()
    );
    error!("{}", error);
    error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());

    process::exit(1)
}

fn main() {
    if let Err(e) = logging::init_logger() {
        eprintln!("Could not initialize logging: {}", e);
    }

    match Scrumpoker::new() {
        Ok(scrumpoker) => {
            info!("Initialized successfully.");

            match scrumpoker.run() {
                Ok(()) => info!("Server stopped."),
                Err(error) => report(error),
            }
        }
        Err(error) => report(error),
    }
}
