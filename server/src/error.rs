//! Mapping of domain errors onto HTTP responses.
//!
//! Every error body is `{"message": "..."}`. Internal failures are logged
//! with their full cause chain and answered with a generic message.

use std::error::Error as _;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use todo_core::{ErrorKind, ServiceError};

pub const INTERNAL_MESSAGE: &str = "internal server error";
pub const TIMEOUT_MESSAGE: &str = "request timed out";

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// The request could not be decoded (bad JSON, bad form).
    BadRequest(String),
    Service(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err.kind() {
                ErrorKind::BadInput => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Service(err) => match err.kind() {
                ErrorKind::BadInput | ErrorKind::NotFound => err.to_string(),
                ErrorKind::Internal => INTERNAL_MESSAGE.to_string(),
                ErrorKind::Cancelled => TIMEOUT_MESSAGE.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Service(err) = &self {
            match err.kind() {
                ErrorKind::Internal => tracing::error!(error = %error_chain(err), "request failed"),
                ErrorKind::Cancelled => tracing::warn!(error = %err, "request cancelled"),
                ErrorKind::BadInput | ErrorKind::NotFound => {}
            }
        }
        let body = ErrorMessage {
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &ServiceError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use todo_core::{ItemId, StoreError, TitleError};

    #[test]
    fn statuses_follow_error_kind() {
        let id: ItemId = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
        let cases = [
            (ApiError::BadRequest("bad json".into()), StatusCode::BAD_REQUEST),
            (ServiceError::from(TitleError::Empty).into(), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound(id).into(), StatusCode::NOT_FOUND),
            (
                ServiceError::Cancelled {
                    op: "list",
                    timeout: Duration::from_millis(5),
                }
                .into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err:?}");
        }
    }

    #[test]
    fn internal_message_hides_cause() {
        let err = ApiError::from(ServiceError::Internal {
            op: "list",
            source: StoreError::backend("password authentication failed for user \"todo\""),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn chain_includes_root_cause() {
        let err = ServiceError::Internal {
            op: "list",
            source: StoreError::backend("connection reset"),
        };
        assert_eq!(
            error_chain(&err),
            "list failed: store backend failure: connection reset"
        );
    }
}
