//! Backend entry-point: loads configuration, prepares storage and serves the
//! REST API.

mod server;
mod settings;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use classifieds::inbound::http::health::HealthState;
use classifieds::inbound::http::session_config::{BuildMode, session_settings_from_env};
use classifieds::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{ServerConfig, ServiceSettings, create_server};
use settings::AppSettings;

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;
    let services = ServiceSettings::default()
        .with_page_size(settings.page_size())
        .with_admin_group(settings.admin_group())
        .with_reset_base_url(settings.reset_base_url())
        .with_mail_webhook(settings.mail_webhook_url()?);

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_services(services);

    if let Some(database_url) = settings.database_url.as_deref() {
        run_migrations(database_url)
            .await
            .wrap_err("failed to migrate database")?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("failed to connect to database")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
