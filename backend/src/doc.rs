//! OpenAPI document for the REST API.
//!
//! [`ApiDoc`] registers every handler in `inbound::http`, the request and
//! response DTOs, the error payload wrappers from `schemas`, and a session
//! cookie security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use crate::inbound::http::ads::{AdPageResponse, AdRequest, AdResponse};
use crate::inbound::http::reviews::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    LoginRequest, MessageResponse, RegisterRequest, ResetPasswordConfirmRequest,
    ResetPasswordRequest, UpdateUserRequest, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the session cookie security scheme.
pub const SESSION_COOKIE_SCHEME: &str = "SessionCookie";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            SESSION_COOKIE_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /users/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the classifieds API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Classifieds API",
        description = "Ads, reviews and user accounts with session authentication."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::ads::list_ads,
        crate::inbound::http::ads::get_ad,
        crate::inbound::http::ads::create_ad,
        crate::inbound::http::ads::update_ad,
        crate::inbound::http::ads::delete_ad,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::reset_password,
        crate::inbound::http::users::reset_password_confirm,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AdResponse,
        AdRequest,
        AdPageResponse,
        ReviewResponse,
        CreateReviewRequest,
        UpdateReviewRequest,
        UserResponse,
        RegisterRequest,
        UpdateUserRequest,
        LoginRequest,
        ResetPasswordRequest,
        ResetPasswordConfirmRequest,
        MessageResponse,
    )),
    tags(
        (name = "ads", description = "Classified ads"),
        (name = "reviews", description = "Reviews attached to ads"),
        (name = "users", description = "Accounts, sessions and password resets"),
        (name = "health", description = "Readiness and liveness probes")
    )
)]
pub struct ApiDoc;
