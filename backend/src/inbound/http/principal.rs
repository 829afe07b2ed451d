//! Extractor resolving the session cookie into the calling [`Principal`].
//!
//! Anonymous callers are not rejected here. Services decide whether a
//! missing principal is acceptable for the operation at hand.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, Principal};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The caller behind the request, or `None` for anonymous requests.
///
/// A session naming a deleted or deactivated account resolves to `None`.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(Option<Principal>);

impl CurrentPrincipal {
    /// Borrow the principal in the shape driving ports expect.
    pub fn get(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}

impl FromRequest for CurrentPrincipal {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = SessionContext::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(user_id) = session.await?.user_id() else {
                return Ok(Self(None));
            };
            let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            let principal = state.users.resolve_principal(user_id).await?;
            if principal.is_none() {
                debug!(user = %user_id, "session names an unknown or inactive user");
            }
            Ok(Self(principal))
        })
    }
}
