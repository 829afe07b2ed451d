//! Wiring of driven adapters into the services behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use classifieds::domain::ports::{
    AdRepository, PasswordResetMailer, ReviewRepository, UserRepository,
};
use classifieds::domain::{AdsService, PasswordResetService, ReviewsService, UsersService};
use classifieds::inbound::http::state::{HttpState, HttpStatePorts};
use classifieds::outbound::mail::{LoggingMailer, WebhookMailer};
use classifieds::outbound::memory::InMemoryStore;
use classifieds::outbound::persistence::{
    DbPool, DieselAdRepository, DieselReviewRepository, DieselUserRepository,
};

use super::{ServerConfig, ServiceSettings};

/// Storage adapters for each driven port.
pub struct Repositories<U, A, R> {
    pub users: Arc<U>,
    pub ads: Arc<A>,
    pub reviews: Arc<R>,
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore> {
    /// Every port served by one shared in-memory store.
    pub fn in_memory(store: &InMemoryStore) -> Self {
        let store = Arc::new(store.clone());
        Self {
            users: Arc::clone(&store),
            ads: Arc::clone(&store),
            reviews: store,
        }
    }
}

impl Repositories<DieselUserRepository, DieselAdRepository, DieselReviewRepository> {
    /// PostgreSQL repositories sharing `pool`.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            ads: Arc::new(DieselAdRepository::new(pool.clone())),
            reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
        }
    }
}

fn build_mailer(settings: &ServiceSettings) -> Arc<dyn PasswordResetMailer> {
    let Some(endpoint) = settings.mail_webhook_url.clone() else {
        return Arc::new(LoggingMailer);
    };
    match WebhookMailer::new(endpoint) {
        Ok(mailer) => Arc::new(mailer),
        Err(error) => {
            warn!(%error, "mail relay client unavailable; logging reset links instead");
            Arc::new(LoggingMailer)
        }
    }
}

/// Build the services over `repos` and bundle them for the handlers.
pub fn wire_http_state<U, A, R>(
    repos: Repositories<U, A, R>,
    mailer: Arc<dyn PasswordResetMailer>,
    clock: Arc<dyn Clock>,
    settings: &ServiceSettings,
) -> HttpState
where
    U: UserRepository + 'static,
    A: AdRepository + 'static,
    R: ReviewRepository + 'static,
{
    let Repositories {
        users: user_repo,
        ads: ad_repo,
        reviews: review_repo,
    } = repos;
    let users = Arc::new(UsersService::new(
        Arc::clone(&user_repo),
        settings.admin_group.as_str(),
    ));
    let ads = Arc::new(AdsService::new(
        Arc::clone(&ad_repo),
        Arc::clone(&review_repo),
        Arc::clone(&clock),
    ));
    let reviews = Arc::new(ReviewsService::new(review_repo, ad_repo, clock));
    let password_reset = Arc::new(PasswordResetService::new(
        user_repo,
        mailer,
        settings.reset_base_url.as_str(),
    ));

    HttpState::from(HttpStatePorts {
        login: users.clone(),
        users: users.clone(),
        users_command: users,
        ads: ads.clone(),
        ads_command: ads,
        reviews: reviews.clone(),
        reviews_command: reviews,
        password_reset,
    })
    .with_page_size(settings.page_size)
}

/// Select PostgreSQL or the in-memory store from `config`.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let mailer = build_mailer(&config.services);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => wire_http_state(
            Repositories::postgres(pool),
            mailer,
            clock,
            &config.services,
        ),
        None => {
            info!("no database configured; data lives in memory and is lost on restart");
            wire_http_state(
                Repositories::in_memory(&InMemoryStore::new()),
                mailer,
                clock,
                &config.services,
            )
        }
    }
}
