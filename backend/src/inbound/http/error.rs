//! Mapping from domain errors and extractor failures to HTTP responses.
//!
//! The domain [`Error`] stays transport agnostic; this module decides the
//! status code, redacts internal failures and turns actix extractor
//! rejections (bad JSON, bad path segments) into the same JSON envelope.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias returned by every handler.
pub type ApiResult<T> = Result<T, Error>;

/// Message returned whenever a required request field is missing or malformed.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

/// Largest accepted JSON request body in bytes.
pub const JSON_BODY_LIMIT: usize = 64 * 1024;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client. Internal errors keep only their trace id.
fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

fn log_failure(error: &Error, status: StatusCode) {
    let trace_id = error.trace_id().unwrap_or_default();
    if status.is_server_error() {
        error!(code = ?error.code(), message = error.message(), trace_id, "request failed");
    } else {
        debug!(code = ?error.code(), message = error.message(), trace_id, "request rejected");
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        log_failure(self, status);
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced through a handler");
        Error::internal(REDACTED_MESSAGE)
    }
}

/// Invalid-request error naming the offending request field.
///
/// # Examples
/// ```
/// use rideshare::domain::ErrorCode;
/// use rideshare::inbound::http::error::invalid_field;
///
/// let err = invalid_field("origin", "origin is required");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.message(), "Please fill in all required fields.");
/// assert_eq!(err.details().and_then(|d| d["field"].as_str()), Some("origin"));
/// ```
#[must_use]
pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(REQUIRED_FIELDS_MESSAGE).with_details(json!({
        "field": field,
        "reason": reason.to_string(),
    }))
}

fn json_rejection(err: &JsonPayloadError) -> Error {
    match err {
        JsonPayloadError::Deserialize(inner) => {
            Error::invalid_request(REQUIRED_FIELDS_MESSAGE).with_details(json!({
                "code": "invalid_body",
                "reason": inner.to_string(),
            }))
        }
        JsonPayloadError::ContentType => {
            Error::invalid_request("Expected an application/json request body.")
        }
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            Error::invalid_request("Request body is too large.")
        }
        other => {
            warn!(error = %other, "unreadable JSON request body");
            Error::invalid_request("Malformed JSON request body.")
        }
    }
}

/// JSON extractor configuration answering malformed bodies with the API
/// error envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req: &HttpRequest| json_rejection(&err).into())
}

/// Path extractor configuration; non-numeric identifiers become 400s.
#[must_use]
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req| {
        Error::invalid_request("Invalid identifier.")
            .with_details(json!({ "reason": err.to_string() }))
            .into()
    })
}

/// Query-string extractor configuration.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        Error::invalid_request("Invalid query parameters.")
            .with_details(json!({ "reason": err.to_string() }))
            .into()
    })
}
