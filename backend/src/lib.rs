//! Classifieds backend: ads, reviews and user accounts over a session-cookie
//! REST API.
//!
//! Layout follows ports and adapters: `domain` holds entities, policy and
//! services; `inbound::http` drives them from Actix handlers; `outbound`
//! implements the storage and mail ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
