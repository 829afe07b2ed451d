//! Ads API handlers.
//!
//! ```text
//! GET    /ads/?page=2&page_size=4&title=phone
//! GET    /ads/retrieve/{id}/
//! POST   /ads/create/        {"title":"phone","price":10000,"description":"boxed"}
//! PATCH  /ads/update/{id}/   {"price":20000}
//! DELETE /ads/delete/{id}/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::{Page, PageParams, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Ad, AdDraft, AdFilter, AdId, AdPatch, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::principal::CurrentPrincipal;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Detail returned for pages outside the result set.
pub const INVALID_PAGE: &str = "Invalid page.";

/// Ad as returned by every ad endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "phone")]
    pub title: String,
    #[schema(example = 10000)]
    pub price: u32,
    pub description: Option<String>,
    #[schema(example = "2026-03-14T09:30:00+00:00")]
    pub created_at: String,
    /// Id of the publishing user; `null` once the account is gone.
    pub author: Option<i64>,
}

impl From<Ad> for AdResponse {
    fn from(value: Ad) -> Self {
        Self {
            id: value.id.get(),
            title: value.title,
            price: value.price,
            description: value.description,
            created_at: value.created_at.to_rfc3339(),
            author: value.author.map(|id| id.get()),
        }
    }
}

/// Body accepted by create and update.
///
/// Unknown keys, `author` included, are ignored: the author is always the
/// caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct AdRequest {
    #[schema(example = "phone")]
    pub title: Option<String>,
    #[schema(example = 10000)]
    pub price: Option<i64>,
    pub description: Option<String>,
}

impl From<AdRequest> for AdDraft {
    fn from(value: AdRequest) -> Self {
        Self {
            title: value.title,
            price: value.price,
            description: value.description,
        }
    }
}

impl From<AdRequest> for AdPatch {
    fn from(value: AdRequest) -> Self {
        Self {
            title: value.title,
            price: value.price,
            description: value.description,
        }
    }
}

/// Query string accepted by the ad listing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdListQuery {
    /// Only ads with exactly this title.
    pub title: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Ads per page, capped at 100.
    pub page_size: Option<u32>,
}

/// Paginated ad listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdPageResponse {
    #[schema(example = 9)]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<AdResponse>,
}

impl From<Page<AdResponse>> for AdPageResponse {
    fn from(page: Page<AdResponse>) -> Self {
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.results,
        }
    }
}

/// List ads, newest first.
#[utoipa::path(
    get,
    path = "/ads/",
    params(AdListQuery),
    responses(
        (status = 200, description = "One page of ads", body = AdPageResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "listAds",
    security([])
)]
#[get("/ads/")]
pub async fn list_ads(
    state: web::Data<HttpState>,
    request: HttpRequest,
    query: web::Query<AdListQuery>,
) -> ApiResult<web::Json<AdPageResponse>> {
    let AdListQuery {
        title,
        page,
        page_size,
    } = query.into_inner();
    let page_request = PageRequest::from_params(PageParams { page, page_size }, state.page_size)
        .map_err(|_| Error::not_found(INVALID_PAGE))?;
    let slice = state
        .ads
        .list_ads(&AdFilter { title }, page_request)
        .await?;
    let results = slice.ads.into_iter().map(AdResponse::from).collect();
    let page = Page::new(results, slice.total, page_request, &request.full_url())
        .map_err(|_| Error::not_found(INVALID_PAGE))?;
    Ok(web::Json(page.into()))
}

/// Fetch a single ad.
#[utoipa::path(
    get,
    path = "/ads/retrieve/{id}/",
    params(("id" = i64, Path, description = "Ad identifier")),
    responses(
        (status = 200, description = "Ad", body = AdResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "getAd",
    security(("SessionCookie" = []))
)]
#[get("/ads/retrieve/{id}/")]
pub async fn get_ad(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AdResponse>> {
    let ad = state
        .ads
        .get_ad(principal.get(), AdId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ad.into()))
}

/// Publish an ad as the caller.
#[utoipa::path(
    post,
    path = "/ads/create/",
    request_body = AdRequest,
    responses(
        (status = 201, description = "Ad created", body = AdResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "createAd",
    security(("SessionCookie" = []))
)]
#[post("/ads/create/")]
pub async fn create_ad(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    payload: web::Json<AdRequest>,
) -> ApiResult<HttpResponse> {
    let ad = state
        .ads_command
        .create_ad(principal.get(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(AdResponse::from(ad)))
}

/// Partially update an ad. Author or administrator only.
#[utoipa::path(
    patch,
    path = "/ads/update/{id}/",
    params(("id" = i64, Path, description = "Ad identifier")),
    request_body = AdRequest,
    responses(
        (status = 200, description = "Ad updated", body = AdResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "updateAd",
    security(("SessionCookie" = []))
)]
#[patch("/ads/update/{id}/")]
pub async fn update_ad(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
    payload: web::Json<AdRequest>,
) -> ApiResult<web::Json<AdResponse>> {
    let ad = state
        .ads_command
        .update_ad(
            principal.get(),
            AdId::new(path.into_inner()),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(ad.into()))
}

/// Delete an ad together with its reviews. Author or administrator only.
#[utoipa::path(
    delete,
    path = "/ads/delete/{id}/",
    params(("id" = i64, Path, description = "Ad identifier")),
    responses(
        (status = 204, description = "Ad deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "deleteAd",
    security(("SessionCookie" = []))
)]
#[delete("/ads/delete/{id}/")]
pub async fn delete_ad(
    state: web::Data<HttpState>,
    principal: CurrentPrincipal,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .ads_command
        .delete_ad(principal.get(), AdId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "ads_tests.rs"]
mod tests;
