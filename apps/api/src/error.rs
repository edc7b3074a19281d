use adapt_forms::{ErrorBody, FieldError, SchemaError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::db::StoreError;

/// Everything a request can fail with, each mapped to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("This event has reached maximum capacity")]
    CapacityExceeded,
    #[error("This form is currently disabled")]
    DisabledForm,
    #[error("This event does not accept online registrations")]
    RegistrationClosed,
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::CapacityExceeded => StatusCode::CONFLICT,
            Self::DisabledForm => StatusCode::FORBIDDEN,
            Self::RegistrationClosed | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(errors) => ErrorBody {
                error: self.to_string(),
                field_errors: errors.clone(),
            },
            // Storage details stay in the log.
            Self::Storage(_) => ErrorBody {
                error: "Internal server error".to_string(),
                field_errors: Vec::new(),
            },
            _ => ErrorBody {
                error: self.to_string(),
                field_errors: Vec::new(),
            },
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(StoreError::from(err))
    }
}

impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage(err) = &self {
            tracing::error!(error = %err, "request failed in storage");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(ApiError::Validation(Vec::new()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::NotFound("Event").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::CapacityExceeded.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::DisabledForm.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::RegistrationClosed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_errors_are_not_leaked() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.body().error, "Internal server error");
    }

    #[test]
    fn messages_match_what_visitors_see() {
        assert_eq!(ApiError::NotFound("Event").to_string(), "Event not found");
        assert_eq!(
            ApiError::CapacityExceeded.to_string(),
            "This event has reached maximum capacity"
        );
    }
}
