use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use orphancare::config::CONFIG;
use orphancare::db::CareStorage;
use orphancare::service::{housekeeping, mail_actor, mailer::MailTransport};
use orphancare::{CareState, care_router};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &*CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        listen_addr = %cfg.basic.listen_addr,
        mail_relay = %cfg.mail.relay_url.as_ref().map(|u| u.as_str()).unwrap_or("<log only>"),
        loglevel = %cfg.basic.loglevel,
        require_session = cfg.auth.require_session
    );
    if cfg.basic.service_key == orphancare::config::BasicConfig::default().service_key {
        warn!("service_key is the built-in default; set CARE_BASIC__SERVICE_KEY");
    }

    let storage = CareStorage::connect(&cfg.basic.database_url).await?;
    let mailer = mail_actor::spawn(MailTransport::from_config(&cfg.mail)?).await?;

    let state = CareState::new(storage, mailer, cfg.clone());
    housekeeping::spawn(state.clone(), cfg.auth.sweep_interval());
    let app = care_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
