//! Review API handlers, mounted under `/ads/reviews/`.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Review, ReviewDraft, ReviewId, ReviewPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::CurrentPrincipal;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Review as returned by every review endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "as described")]
    pub text: String,
    pub created_at: String,
    /// Id of the reviewed ad.
    pub ad: i64,
    pub author: Option<i64>,
}

impl From<Review> for ReviewResponse {
    fn from(value: Review) -> Self {
        Self {
            id: value.id.get(),
            text: value.text,
            created_at: value.created_at.to_rfc3339(),
            ad: value.ad.get(),
            author: value.author.map(|id| id.get()),
        }
    }
}

/// Body accepted by review creation.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateReviewRequest {
    pub text: Option<String>,
    #[schema(example = 1)]
    pub ad: Option<i64>,
}

/// Body accepted by review updates. Only the text can change.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
}

/// List every review.
#[utoipa::path(
    get,
    path = "/ads/reviews/",
    responses(
        (status = 200, description = "Reviews", body = [ReviewResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security(("SessionCookie" = []))
)]
#[get("/ads/reviews/")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
) -> ApiResult<web::Json<Vec<ReviewResponse>>> {
    let reviews = state.reviews.list_reviews(principal.get()).await?;
    Ok(web::Json(
        reviews.into_iter().map(ReviewResponse::from).collect(),
    ))
}

/// Fetch a single review. Author or administrator only.
#[utoipa::path(
    get,
    path = "/ads/reviews/retrieve/{id}/",
    params(("id" = i64, Path, description = "Review identifier")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "getReview",
    security(("SessionCookie" = []))
)]
#[get("/ads/reviews/retrieve/{id}/")]
pub async fn get_review(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let review = state
        .reviews
        .get_review(principal.get(), ReviewId::new(path.into_inner()))
        .await?;
    Ok(web::Json(review.into()))
}

/// Review an ad as the caller.
#[utoipa::path(
    post,
    path = "/ads/reviews/create/",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("SessionCookie" = []))
)]
#[post("/ads/reviews/create/")]
pub async fn create_review(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    payload: web::Json<CreateReviewRequest>,
) -> ApiResult<HttpResponse> {
    let CreateReviewRequest { text, ad } = payload.into_inner();
    let review = state
        .reviews_command
        .create_review(principal.get(), ReviewDraft { text, ad })
        .await?;
    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

/// Change a review's text. Author or administrator only.
#[utoipa::path(
    patch,
    path = "/ads/reviews/update/{id}/",
    params(("id" = i64, Path, description = "Review identifier")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("SessionCookie" = []))
)]
#[patch("/ads/reviews/update/{id}/")]
pub async fn update_review(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
    payload: web::Json<UpdateReviewRequest>,
) -> ApiResult<web::Json<ReviewResponse>> {
    let review = state
        .reviews_command
        .update_review(
            principal.get(),
            ReviewId::new(path.into_inner()),
            ReviewPatch {
                text: payload.into_inner().text,
            },
        )
        .await?;
    Ok(web::Json(review.into()))
}

/// Remove a review. Author or administrator only.
#[utoipa::path(
    delete,
    path = "/ads/reviews/delete/{id}/",
    params(("id" = i64, Path, description = "Review identifier")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("SessionCookie" = []))
)]
#[delete("/ads/reviews/delete/{id}/")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .reviews_command
        .delete_review(principal.get(), ReviewId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
