use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use scrumpoker_collab::{DatabaseError, RoomError};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// A required field is missing or blank
    #[error("{0}")]
    Validation(String),
    /// The body could not be parsed
    #[error("{0}")]
    Unprocessable(String),
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

/// The body of every failed request
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = 404)]
    pub code: u16,
    #[schema(example = "room not found")]
    pub message: String,
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Unprocessable(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();

        let body = ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound { resource, .. } => Self::NotFound { resource },
            DatabaseError::Conflict { .. } => Self::Conflict(value.to_string()),
            e => {
                error!("Store failure: {}", e);
                Self::Internal(e.to_string())
            }
        }
    }
}

impl From<RoomError> for ServerError {
    fn from(value: RoomError) -> Self {
        match value {
            RoomError::HostTaken => Self::Conflict(value.to_string()),
            RoomError::Db(e) => e.into(),
            e => {
                error!("{}", e);
                Self::Internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use axum::{http::StatusCode, response::IntoResponse};
    use scrumpoker_collab::{DatabaseError, RoomError};

    use super::ServerError;

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found: ServerError = DatabaseError::NotFound {
            resource: "room",
            identifier: "pincode",
        }
        .into();
        assert_eq!(not_found.to_string(), "room not found");
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let conflict: ServerError = RoomError::HostTaken.into();
        assert_eq!(
            conflict.to_string(),
            "there is already a user defined as host"
        );
        assert_eq!(conflict.into_response().status(), StatusCode::BAD_REQUEST);

        let internal: ServerError = RoomError::PincodeExhausted(10).into();
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
