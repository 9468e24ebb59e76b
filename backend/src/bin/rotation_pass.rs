//! Run one rotation recomputation pass over every enrolled user.
//!
//! Intended for cron-style deployments where the in-process scheduler is
//! disabled, and for operators forcing a refresh after a catalogue change.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use munch_backend::domain::{RotationPassReport, RotationScheduler};
use munch_backend::settings::AppSettings;
use munch_backend::wiring::wire_from_settings;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `rotation-pass` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rotation-pass",
    about = "Recompute every enrolled user's restaurant rotation once",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `MUNCH_DATABASE_URL`, then
    /// `DATABASE_URL`, when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before the pass.
    #[arg(long)]
    migrate: bool,
    /// Override the number of users refreshed concurrently.
    #[arg(long = "max-concurrent-users", value_name = "n")]
    max_concurrent_users: Option<usize>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut settings = AppSettings::load_from_iter([OsString::from("rotation-pass")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    settings.database_url = Some(resolve_database_url(
        args.database_url,
        settings.database_url.take(),
    )?);
    settings.run_migrations = settings.run_migrations || args.migrate;
    if let Some(limit) = args.max_concurrent_users {
        settings.max_concurrent_users = Some(limit);
    }

    let scheduler_config = settings.scheduler_config().map_err(io::Error::other)?;
    let wiring = wire_from_settings(&settings)
        .await
        .map_err(|error| io::Error::other(format!("wire adapters: {error}")))?;
    let scheduler = RotationScheduler::new(
        wiring.scheduler_ports,
        Arc::new(DefaultClock),
        scheduler_config,
    );

    let report = scheduler
        .run_pass()
        .await
        .map_err(|error| io::Error::other(format!("rotation pass failed: {error}")))?;
    print_report(&report);

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "{} user(s) kept their previous rotation",
            report.failed.len()
        )))
    }
}

fn print_report(report: &RotationPassReport) {
    println!("started_at={}", report.started_at.to_rfc3339());
    println!("finished_at={}", report.finished_at.to_rfc3339());
    println!("visited={}", report.visited());
    println!("refreshed={}", report.refreshed);
    println!("skipped={}", report.skipped);
    println!("failed={}", report.failed.len());
    for failure in &report.failed {
        println!(
            "failure user_id={} attempts={} error={}",
            failure.user_id, failure.attempts, failure.error
        );
    }
}

fn resolve_database_url(explicit: Option<String>, configured: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let fallback = configured
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url, MUNCH_DATABASE_URL or DATABASE_URL",
            )
        })?;
    if fallback.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "configured database URL must not be empty",
        ));
    }
    Ok(fallback)
}
