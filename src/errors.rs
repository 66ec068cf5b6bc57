use std::collections::HashMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

/// Field name -> human-readable messages, rendered inline by the form UI.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Error taxonomy for every API operation.
///
/// Validation and authorization failures are part of the normal contract
/// and never carry upstream detail; `Upstream` during a primary effect is
/// logged at the call site and surfaced as a generic failure message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("authentication required")]
    Unauthorized,
    #[error("not allowed")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("resource"),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    data: Option<()>,
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
    timestamp: chrono::DateTime<Utc>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (message, fields) = match self {
            ApiError::Validation(map) => ("Validation failed", Some(map)),
            ApiError::Unauthorized => ("Authentication required", None),
            // Deliberately generic: does not reveal whether the resource
            // exists or is merely owned by someone else.
            ApiError::Forbidden => ("You do not have access to this resource", None),
            ApiError::NotFound(what) => {
                return HttpResponse::build(self.status_code()).json(ErrorBody {
                    success: false,
                    data: None,
                    error: &format!("{} not found", what),
                    fields: None,
                    timestamp: Utc::now(),
                });
            }
            ApiError::Upstream(detail) => {
                log::error!("upstream failure: {detail}");
                ("Something went wrong, please try again", None)
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            data: None,
            error: message,
            fields,
            timestamp: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ApiError::Validation(FieldErrors::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Upstream("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
