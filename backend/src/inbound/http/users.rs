//! Users API handlers: registration, profiles, login and password reset.
//!
//! ```text
//! POST /users/register/ {"email":"ada@example.com","password":"long enough"}
//! POST /users/login/    {"email":"ada@example.com","password":"long enough"}
//! GET  /users/retrieve/{id}/
//! POST /users/reset_password/ {"email":"ada@example.com"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{Registration, UserUpdate};
use crate::domain::{
    Error, LoginCredentials, LoginValidationError, PASSWORD_CHANGED, PasswordResetConfirmation,
    PasswordResetRequest, RESET_EMAIL_SENT, UserId, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::CurrentPrincipal;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile as returned by the user endpoints. Never includes the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[schema(example = "user")]
    pub role: String,
    pub image: Option<String>,
    pub is_active: bool,
}

impl From<UserProfile> for UserResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id.get(),
            email: value.email.as_ref().to_owned(),
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            role: value.role.as_str().to_owned(),
            image: value.image,
            is_active: value.is_active,
        }
    }
}

/// Sign-up body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "long enough")]
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            password: value.password.map(Zeroizing::new),
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
        }
    }
}

/// Partial profile update. A blank `phone` or `image` clears it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            image: value.image,
            password: value.password.map(Zeroizing::new),
        }
    }
}

/// Login request body for `POST /users/login/`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Body of `POST /users/reset_password/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordRequest {
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Body of `POST /users/reset_password_confirm/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ResetPasswordConfirmRequest {
    #[schema(example = 1)]
    pub uid: i64,
    #[schema(example = "0123456789abcdef0123456789abcdef")]
    pub token: String,
    pub new_password: String,
}

/// Plain `{"message": "..."}` acknowledgement for the reset endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Password changed")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/users/register/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/register/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let profile = state
        .users_command
        .register(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::from(profile)))
}

/// List every profile.
#[utoipa::path(
    get,
    path = "/users/list/",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("SessionCookie" = []))
)]
#[get("/users/list/")]
pub async fn list_users(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users(principal.get()).await?;
    Ok(web::Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch the caller's own profile.
#[utoipa::path(
    get,
    path = "/users/retrieve/{id}/",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("SessionCookie" = []))
)]
#[get("/users/retrieve/{id}/")]
pub async fn get_user(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let profile = state
        .users
        .get_user(principal.get(), UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(profile.into()))
}

/// Update the caller's own profile.
#[utoipa::path(
    patch,
    path = "/users/update/{id}/",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("SessionCookie" = []))
)]
#[patch("/users/update/{id}/")]
pub async fn update_user(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let profile = state
        .users_command
        .update_user(
            principal.get(),
            UserId::new(path.into_inner()),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(profile.into()))
}

/// Delete the caller's own account along with its ads and reviews.
#[utoipa::path(
    delete,
    path = "/users/delete/{id}/",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("SessionCookie" = []))
)]
#[delete("/users/delete/{id}/")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.into_inner());
    state.users_command.delete_user(principal.get(), id).await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/users/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| Error::field_error(err.field(), err.to_string()))?;
    let profile = state.login.authenticate(&credentials).await?;
    session.persist_user(profile.id)?;
    Ok(web::Json(profile.into()))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/users/logout/",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/users/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Some(id) = session.user_id() {
        info!(user = %id, "logout");
    }
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Mail a reset link for the caller's account.
#[utoipa::path(
    post,
    path = "/users/reset_password/",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Mail relay unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "requestPasswordReset",
    security(("SessionCookie" = []))
)]
#[post("/users/reset_password/")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .password_reset
        .request_reset(
            principal.get(),
            PasswordResetRequest {
                email: payload.into_inner().email,
            },
        )
        .await?;
    Ok(web::Json(MessageResponse::new(RESET_EMAIL_SENT)))
}

/// Redeem a reset token and set a new password.
#[utoipa::path(
    post,
    path = "/users/reset_password_confirm/",
    request_body = ResetPasswordConfirmRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid reset link or password", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "confirmPasswordReset",
    security(("SessionCookie" = []))
)]
#[post("/users/reset_password_confirm/")]
pub async fn reset_password_confirm(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    payload: web::Json<ResetPasswordConfirmRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let ResetPasswordConfirmRequest {
        uid,
        token,
        new_password,
    } = payload.into_inner();
    state
        .password_reset
        .confirm_reset(
            principal.get(),
            PasswordResetConfirmation {
                uid,
                token,
                new_password,
            },
        )
        .await?;
    Ok(web::Json(MessageResponse::new(PASSWORD_CHANGED)))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
