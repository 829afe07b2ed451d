//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod ads;
pub mod error;
pub mod health;
pub mod principal;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Register every API handler and the extractor error mapping.
///
/// Health probes are registered separately because they depend on
/// [`health::HealthState`] rather than [`state::HttpState`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| error::invalid_payload(&err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| error::invalid_payload(&err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| error::invalid_payload(&err)))
        .service(ads::list_ads)
        .service(ads::get_ad)
        .service(ads::create_ad)
        .service(ads::update_ad)
        .service(ads::delete_ad)
        .service(reviews::list_reviews)
        .service(reviews::get_review)
        .service(reviews::create_review)
        .service(reviews::update_review)
        .service(reviews::delete_review)
        .service(users::register)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(users::login)
        .service(users::logout)
        .service(users::reset_password)
        .service(users::reset_password_confirm);
}
