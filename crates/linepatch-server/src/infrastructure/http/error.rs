//! HTTP error mapping.
//!
//! Every failure a handler can hit is converted into an [`ApiError`], which
//! renders as the usual [`ApiResponse`] envelope with `success: false` and the
//! status code for its class:
//!
//! | Class                                   | Status |
//! |-----------------------------------------|--------|
//! | missing template or file                | 404    |
//! | malformed payload, invalid template id  | 400    |
//! | line number outside the file            | 422    |
//! | I/O, record parse, worker failure       | 500    |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use super::dto::ApiResponse;
use crate::application::{LocateError, PatchError, StoreError};

/// Error type returned by every HTTP handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        } else {
            warn!("request rejected ({status}): {self}");
        }
        (status, Json(ApiResponse::<()>::err(self.to_string()))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StoreError::InvalidId { .. } => ApiError::BadRequest(e.to_string()),
            StoreError::Io { .. } | StoreError::Parse { .. } | StoreError::Serialize { .. } => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<LocateError> for ApiError {
    fn from(e: LocateError) -> Self {
        match e {
            LocateError::FileNotFound { .. } => ApiError::NotFound(e.to_string()),
            LocateError::LineOutOfRange { .. } => ApiError::Unprocessable(e.to_string()),
            LocateError::Io { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<PatchError> for ApiError {
    fn from(e: PatchError) -> Self {
        match &e {
            PatchError::File { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ApiError::NotFound(e.to_string())
            }
            PatchError::File { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("malformed request body: {}", rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_store_errors_map_to_expected_status() {
        let not_found: ApiError = StoreError::NotFound { id: "x".into() }.into();
        let invalid: ApiError = StoreError::InvalidId { id: "a/b".into() }.into();
        let io: ApiError = StoreError::Io {
            path: PathBuf::from("/t"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        }
        .into();

        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_line_out_of_range_maps_to_unprocessable() {
        let e: ApiError = LocateError::LineOutOfRange {
            path: PathBuf::from("a.conf"),
            line_number: 9,
            line_count: 2,
        }
        .into();

        assert_eq!(e.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(e.to_string().contains("line 9"));
    }

    #[test]
    fn test_patch_error_on_missing_file_maps_to_not_found() {
        let e: ApiError = PatchError::File {
            path: PathBuf::from("gone.conf"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();

        assert_eq!(e.status(), StatusCode::NOT_FOUND);
    }
}
