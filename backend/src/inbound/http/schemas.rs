//! OpenAPI stand-ins for the domain error payload.
//!
//! `crate::domain` stays free of utoipa derives; these mirrors are registered
//! under the domain type names so the generated document describes the JSON
//! that [`crate::domain::Error`] actually serialises to.

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// Mirror of [`crate::domain::ErrorCode`], serialised in snake case.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or a failed field check (400).
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No session, or bad credentials (401).
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in but neither author nor administrator (403).
    #[schema(rename = "forbidden")]
    Forbidden,
    /// Unknown id or page (404).
    #[schema(rename = "not_found")]
    NotFound,
    /// Database or mail relay unreachable (503).
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// Anything else; the detail is redacted (500).
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Mirror of [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Fields are only read by utoipa when generating the document"
)]
pub struct ErrorSchema {
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    #[schema(example = "Only the author or an administrator may operate on this object.")]
    detail: String,
    /// Value of the `trace-id` response header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Per-field validation messages; present only on field errors.
    #[schema(value_type = Option<Object>, example = json!({"email": ["user with this email already exists."]}))]
    errors: Option<BTreeMap<String, Vec<String>>>,
}
