//! Domain errors as actix responses.
//!
//! Every failure leaves as `{"code", "detail", "traceId"?, "errors"?}` with
//! the status from [`status_for`] and the request's `trace-id` header.
//! Internal failures are logged in full and answered with a fixed detail.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by every handler.
pub type ApiResult<T> = Result<T, Error>;

/// Detail sent instead of the real message for `internal_error`.
pub const INTERNAL_DETAIL: &str = "Internal server error";

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_body(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(INTERNAL_DETAIL);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(detail = %self.detail(), trace_id = ?self.trace_id(), "internal error");
        }
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error reached a handler");
        Self::internal(INTERNAL_DETAIL)
    }
}

/// Turn an extractor failure (JSON body, path segment or query string) into
/// a 400 carrying the parser's message.
pub fn invalid_payload(err: &impl fmt::Display) -> actix_web::Error {
    debug!(error = %err, "rejected malformed request input");
    Error::invalid_request(err.to_string()).into()
}
