//! Maps crate errors onto HTTP responses.
//!
//! Every failure renders as `{"error": <code>, "message": <text>}`. Store and internal
//! failures are logged here and reach the client only as an opaque message.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Builds a JSON error response.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_validation() {
            return json_error(StatusCode::BAD_REQUEST, "validation_error", self.to_string());
        }
        match self {
            Self::BillNotFound { .. } => {
                json_error(StatusCode::NOT_FOUND, "not_found", self.to_string())
            }
            Self::Database(ref e) => {
                error!("Bill store failure: {e}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    "The bill store could not complete the request",
                )
            }
            other => {
                error!("Internal error: {other}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        }
    }
}

/// Converts a rejected JSON body (bad syntax, unknown field, wrong content type)
/// into a validation error.
pub fn body_rejection(rejection: &JsonRejection) -> Error {
    Error::InvalidField {
        field: "body",
        reason: rejection.body_text(),
    }
}
