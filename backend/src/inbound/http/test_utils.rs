//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use mockable::{Clock, DefaultClock};
use serde_json::json;

use crate::Trace;
use crate::domain::ports::UserRepository;
use crate::domain::{
    AdsService, Email, NewUser, Password, PasswordResetService, ReviewsService, UserId, UserRole,
    UsersService,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::mail::LoggingMailer;
use crate::outbound::memory::InMemoryStore;

/// Group name used by handler tests for administrators.
pub const TEST_ADMIN_GROUP: &str = "Administrators";
/// Base URL used for reset links in handler tests.
pub const TEST_RESET_BASE_URL: &str = "http://localhost:3000/password/reset/";
/// Password shared by every seeded account.
pub const TEST_PASSWORD: &str = "correct horse battery";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Wire every driving port to real services over `store`.
pub fn memory_state(store: &InMemoryStore) -> HttpState {
    let store = Arc::new(store.clone());
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users = Arc::new(UsersService::new(Arc::clone(&store), TEST_ADMIN_GROUP));
    let ads = Arc::new(AdsService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&clock),
    ));
    let reviews = Arc::new(ReviewsService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        clock,
    ));
    let password_reset = Arc::new(PasswordResetService::new(
        Arc::clone(&store),
        Arc::new(LoggingMailer),
        TEST_RESET_BASE_URL,
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
}

/// Full API over `store`, with sessions and trace ids.
pub fn test_app(
    store: &InMemoryStore,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(memory_state(store)))
        .wrap(test_session_middleware())
        .wrap(Trace)
        .configure(configure)
}

/// Insert an account that can log in with [`TEST_PASSWORD`].
pub async fn seed_user(store: &InMemoryStore, email: &str) -> UserId {
    let password_hash = Password::new(TEST_PASSWORD)
        .expect("valid password")
        .hash()
        .expect("hash password");
    let user = NewUser {
        email: Email::new(email).expect("valid email"),
        password_hash,
        first_name: String::new(),
        last_name: String::new(),
        phone: None,
        role: UserRole::User,
    };
    UserRepository::create(store, &user)
        .await
        .expect("seed user")
        .id()
}

/// Insert an account belonging to the administrator group.
pub async fn seed_admin(store: &InMemoryStore, email: &str) -> UserId {
    let id = seed_user(store, email).await;
    assert!(store.add_user_to_group(id, TEST_ADMIN_GROUP));
    id
}

/// Log in through the API and return the session cookie.
pub async fn login<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/users/login/")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
