//! Backend entry-point: loads settings, wires adapters, then serves the REST
//! API alongside the weekly rotation scheduler.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::cookie::SameSite;
use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use munch_backend::domain::RotationScheduler;
use munch_backend::inbound::http::health::HealthState;
use munch_backend::settings::AppSettings;
use munch_backend::wiring::wire_from_settings;
use server::{ServerConfig, create_server, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter([OsString::from("munch-backend")])
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let scheduler_config = settings.scheduler_config().map_err(std::io::Error::other)?;
    let key = load_session_key(
        &settings.session_key_file(),
        settings.allow_ephemeral_session_key,
    )
    .map_err(std::io::Error::other)?;

    let wiring = wire_from_settings(&settings)
        .await
        .map_err(std::io::Error::other)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_task = if settings.scheduler_enabled() {
        let scheduler = RotationScheduler::new(
            wiring.scheduler_ports,
            Arc::new(DefaultClock),
            scheduler_config,
        );
        Some(actix_web::rt::spawn(async move {
            scheduler.run(shutdown_rx).await;
        }))
    } else {
        info!("rotation scheduler disabled");
        None
    };

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        bind_addr,
        wiring.http_state,
    );
    let result = match create_server(health_state.clone(), config) {
        Ok(server) => {
            info!(%bind_addr, "serving");
            server.await
        }
        Err(e) => Err(e),
    };

    health_state.mark_unhealthy();
    shutdown_tx.send_replace(true);
    if let Some(task) = scheduler_task {
        if let Err(e) = task.await {
            error!(error = %e, "rotation scheduler task failed");
        }
    }
    result
}
