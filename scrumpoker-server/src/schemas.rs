use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::errors::ServerError;

#[derive(Debug, ToSchema, Validate, Deserialize)]
pub struct NewRoomSchema {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "the name of the room is required"))]
    #[schema(example = "Sprint 12 planning")]
    pub name: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
pub struct JoinRoomSchema {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "the name of the player is required"))]
    #[schema(example = "Thiago")]
    pub player_name: String,
    /// Join as the facilitator of the room
    pub host: Option<bool>,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
pub struct TopicSchema {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "the topic is required"))]
    #[schema(example = "LOGIN-42")]
    pub topic: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
pub struct RenamePlayerSchema {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "the name of the player is required"))]
    pub player_name: String,
}

#[derive(Debug, ToSchema, Validate, Deserialize)]
pub struct NewVoteSchema {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "the player_id field is required"))]
    pub player_id: String,
    #[schema(example = 5)]
    pub value: f64,
}

/// Required text fields are stored without surrounding whitespace
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;

    Ok(value.trim().to_string())
}

/// Json that is validated after parsing
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::Unprocessable(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ServerError::Validation(first_message(&errors)))?;

        Ok(Self(value))
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

#[cfg(test)]
mod test {
    use validator::Validate;

    use super::{first_message, JoinRoomSchema, NewVoteSchema};

    #[test]
    fn names_are_trimmed_before_validation() {
        let body: JoinRoomSchema =
            serde_json::from_str(r#"{"player_name": "  Thiago  ", "host": true}"#).unwrap();

        assert_eq!(body.player_name, "Thiago");
        assert_eq!(body.host, Some(true));
        assert!(body.validate().is_ok());
    }

    #[test]
    fn blank_and_missing_fields_fail_validation() {
        let blank: JoinRoomSchema = serde_json::from_str(r#"{"player_name": "   "}"#).unwrap();
        let errors = blank.validate().unwrap_err();
        assert_eq!(first_message(&errors), "the name of the player is required");

        let missing: NewVoteSchema = serde_json::from_str(r#"{"value": 3}"#).unwrap();
        let errors = missing.validate().unwrap_err();
        assert_eq!(first_message(&errors), "the player_id field is required");
    }
}
