//! Integration guardrails for the HTTP adapter over real sockets.
//!
//! The server is wired exactly as the binary wires it, with the in-memory
//! store, a fixed clock and a recording mailer standing in for the driven
//! adapters. Individual driving ports can be swapped for failing doubles to
//! check how domain errors surface on the wire.

#[expect(
    dead_code,
    reason = "Builder methods used only by the binary's start-up path."
)]
#[path = "../src/server/config.rs"]
mod config;
#[path = "../src/server/state_builders.rs"]
mod state_builders;

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mockable::{Clock, MockClock};
use pagination::PageRequest;
use reqwest::{Client, StatusCode, header};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use classifieds::Trace;
use classifieds::domain::ports::{AdsQuery, MailerError, PasswordResetMailer, ResetLinkMessage};
use classifieds::domain::{
    Ad, AdFilter, AdId, AdSlice, Error, PASSWORD_CHANGED, Principal, TRACE_ID_HEADER,
};
use classifieds::inbound::http::configure;
use classifieds::inbound::http::state::HttpState;
use classifieds::outbound::memory::InMemoryStore;

use config::{ServerConfig, ServiceSettings};
use state_builders::{Repositories, wire_http_state};

const RESET_BASE: &str = "https://classifieds.example/reset/";

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<ResetLinkMessage>>>,
}

impl RecordingMailer {
    fn last_link(&self) -> Option<String> {
        self.sent
            .lock()
            .expect("mailer lock")
            .last()
            .map(|message| message.link.clone())
    }
}

#[async_trait]
impl PasswordResetMailer for RecordingMailer {
    async fn send_reset_link(&self, message: &ResetLinkMessage) -> Result<(), MailerError> {
        self.sent.lock().expect("mailer lock").push(message.clone());
        Ok(())
    }
}

struct UnavailableAds;

#[async_trait]
impl AdsQuery for UnavailableAds {
    async fn list_ads(&self, _filter: &AdFilter, _page: PageRequest) -> Result<AdSlice, Error> {
        Err(Error::service_unavailable("ad repository unavailable"))
    }

    async fn get_ad(&self, _principal: Option<&Principal>, _id: AdId) -> Result<Ad, Error> {
        Err(Error::service_unavailable("ad repository unavailable"))
    }
}

fn published_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

struct Harness {
    base_url: String,
    mailer: RecordingMailer,
    handle: ServerHandle,
    client: Client,
}

impl Harness {
    async fn stop(self) {
        self.handle.stop(true).await;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post(&self, path: &str, cookie: Option<&str>, body: Value) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).json(&body);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.send().await.expect("request should reach the server")
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        request.send().await.expect("request should reach the server")
    }

    async fn register_and_login(&self, email: &str, password: &str) -> (i64, String) {
        let res = self
            .post(
                "/users/register/",
                None,
                json!({ "email": email, "password": password, "first_name": "Test" }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let profile: Value = res.json().await.expect("profile json");

        let res = self
            .post(
                "/users/login/",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .expect("session cookie")
            .to_owned();
        (profile["id"].as_i64().expect("user id"), cookie)
    }
}

#[fixture]
fn settings() -> ServiceSettings {
    ServiceSettings::default()
        .with_page_size(2)
        .with_reset_base_url(RESET_BASE)
}

fn start(state: HttpState, mailer: RecordingMailer) -> Harness {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let key = Key::generate();
    let data = web::Data::new(state);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_name("session".to_owned())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(Trace)
            .configure(configure)
    })
    .workers(1)
    .listen(listener)
    .expect("listen on ephemeral port")
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);
    Harness {
        base_url: format!("http://{addr}"),
        mailer,
        handle,
        client: Client::new(),
    }
}

fn memory_state(settings: &ServiceSettings, mailer: &RecordingMailer) -> HttpState {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(published_at());
    let clock: Arc<dyn Clock> = Arc::new(clock);
    wire_http_state(
        Repositories::in_memory(&InMemoryStore::new()),
        Arc::new(mailer.clone()),
        clock,
        settings,
    )
}

#[rstest]
#[actix_rt::test]
async fn marketplace_flow_over_http(settings: ServiceSettings) {
    let mailer = RecordingMailer::default();
    let harness = start(memory_state(&settings, &mailer), mailer);
    let (seller, seller_cookie) = harness
        .register_and_login("seller@example.com", "seller password")
        .await;
    let (_, buyer_cookie) = harness
        .register_and_login("buyer@example.com", "buyer password")
        .await;

    for title in ["kettle", "toaster", "blender"] {
        let res = harness
            .post(
                "/ads/create/",
                Some(&seller_cookie),
                json!({ "title": title, "price": 25 }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let page: Value = harness
        .get("/ads/", None)
        .await
        .json()
        .await
        .expect("page json");
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["results"][0]["created_at"], published_at().to_rfc3339());
    assert_eq!(page["results"][0]["author"], seller);
    let next = page["next"].as_str().expect("next link");
    assert!(next.starts_with(&harness.base_url), "next link was {next}");

    let ad_id = page["results"][0]["id"].as_i64().expect("ad id");
    let res = harness
        .post(
            "/ads/reviews/create/",
            Some(&buyer_cookie),
            json!({ "text": "does it whistle?", "ad": ad_id }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = harness
        .client
        .delete(harness.url(&format!("/ads/delete/{ad_id}/")))
        .header(header::COOKIE, &buyer_cookie)
        .send()
        .await
        .expect("request should reach the server");
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    harness.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn emailed_reset_link_changes_the_password(settings: ServiceSettings) {
    let mailer = RecordingMailer::default();
    let harness = start(memory_state(&settings, &mailer), mailer);
    let (uid, cookie) = harness
        .register_and_login("owner@example.com", "first password")
        .await;

    let res = harness
        .post(
            "/users/reset_password/",
            Some(&cookie),
            json!({ "email": "OWNER@example.com" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let link = harness.mailer.last_link().expect("reset link sent");
    assert!(link.starts_with(&format!("{RESET_BASE}{uid}/")), "link was {link}");
    let token = link
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .expect("token segment")
        .to_owned();

    let res = harness
        .post(
            "/users/reset_password_confirm/",
            Some(&cookie),
            json!({ "uid": uid, "token": token, "new_password": "second password" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.expect("message json");
    assert_eq!(body["message"], PASSWORD_CHANGED);

    let res = harness
        .post(
            "/users/login/",
            None,
            json!({ "email": "owner@example.com", "password": "second password" }),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    harness.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn unavailable_storage_surfaces_as_503_with_trace_id(settings: ServiceSettings) {
    let mailer = RecordingMailer::default();
    let mut state = memory_state(&settings, &mailer);
    state.ads = Arc::new(UnavailableAds);
    let harness = start(state, mailer);

    let res = harness.get("/ads/", None).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let header_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = res.json().await.expect("error json");
    assert_eq!(body["code"], "service_unavailable");
    assert_eq!(body["traceId"], header_id);

    harness.stop().await;
}

#[rstest]
#[actix_rt::test]
async fn anonymous_callers_get_401_with_trace_id(settings: ServiceSettings) {
    let mailer = RecordingMailer::default();
    let harness = start(memory_state(&settings, &mailer), mailer);

    let res = harness.get("/users/list/", None).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = res.json().await.expect("error json");
    assert_eq!(body["code"], "unauthorized");
    assert!(body["traceId"].is_string());

    harness.stop().await;
}

#[rstest]
fn config_accepts_custom_service_settings(settings: ServiceSettings) {
    let bind_addr = "127.0.0.1:0".parse().expect("socket address");
    let config = ServerConfig::new(
        Key::generate(),
        false,
        actix_web::cookie::SameSite::Lax,
        bind_addr,
    )
    .with_services(settings);
    assert_eq!(state_builders::build_http_state(&config).page_size, 2);
}
