//! Periodic recomputation of every user's rotation.
//!
//! The scheduler owns the weekly cadence, bounded fan-out across users
//! (semaphore), and per-user retry (jittered exponential backoff). Failures
//! are isolated per user: a user whose refresh fails keeps the previous
//! rotation and the pass carries on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use mockable::Clock;
use tokio::sync::{Semaphore, watch};
use tracing::{Instrument, error, info, info_span, warn};

use crate::domain::ports::{
    RotationRecomputation, UserRotationRepository, UserRotationRepositoryError,
};
use crate::domain::{Error, ErrorCode, TraceId, UserId};

mod cadence;
mod runtime;

pub use cadence::{CadenceError, RotationCadence};
pub use runtime::{RandomJitter, RotationSchedulerPorts, RotationSchedulerRuntime, TokioSleeper};

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSchedulerConfig {
    /// When passes run.
    pub cadence: RotationCadence,
    /// Users refreshed concurrently within one pass.
    pub max_concurrent_users: usize,
    /// Recompute attempts per user and pass (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Retry delay cap.
    pub max_backoff: Duration,
}

impl Default for RotationSchedulerConfig {
    fn default() -> Self {
        Self {
            cadence: RotationCadence::default(),
            max_concurrent_users: 4,
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Async sleeping abstraction so tests can drive ticks deterministically.
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use munch_backend::domain::RotationSleeper;
/// use std::sync::Mutex;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct RecordingSleeper(Mutex<Vec<Duration>>);
///
/// #[async_trait]
/// impl RotationSleeper for RecordingSleeper {
///     async fn sleep(&self, duration: Duration) {
///         self.0.lock().expect("sleeper mutex").push(duration);
///     }
/// }
/// ```
#[async_trait]
pub trait RotationSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Retry backoff jitter abstraction.
pub trait BackoffJitter: Send + Sync {
    /// Return a jittered delay derived from the exponential base delay.
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration;
}

/// A user whose rotation could not be refreshed during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecomputeFailure {
    pub user_id: UserId,
    /// Attempts made before giving up.
    pub attempts: u32,
    pub error: Error,
}

/// Summary of one pass over every user.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPassReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Users whose rotation was replaced.
    pub refreshed: usize,
    /// Users that disappeared mid-pass.
    pub skipped: usize,
    /// Users left on their previous rotation.
    pub failed: Vec<UserRecomputeFailure>,
}

impl RotationPassReport {
    /// Number of users visited.
    pub fn visited(&self) -> usize {
        self.refreshed + self.skipped + self.failed.len()
    }
}

enum UserOutcome {
    Refreshed,
    Skipped,
    Failed(UserRecomputeFailure),
}

/// Domain-owned rotation scheduler.
pub struct RotationScheduler {
    users: Arc<dyn UserRotationRepository>,
    recomputation: Arc<dyn RotationRecomputation>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn RotationSleeper>,
    jitter: Arc<dyn BackoffJitter>,
    user_semaphore: Semaphore,
    config: RotationSchedulerConfig,
}

impl RotationScheduler {
    /// Build a scheduler using Tokio sleeping and random jitter.
    pub fn new(
        ports: RotationSchedulerPorts,
        clock: Arc<dyn Clock>,
        config: RotationSchedulerConfig,
    ) -> Self {
        Self::with_runtime(ports, clock, RotationSchedulerRuntime::default(), config)
    }

    /// Build a scheduler with injected timing collaborators.
    pub fn with_runtime(
        ports: RotationSchedulerPorts,
        clock: Arc<dyn Clock>,
        runtime: RotationSchedulerRuntime,
        config: RotationSchedulerConfig,
    ) -> Self {
        Self {
            users: ports.users,
            recomputation: ports.recomputation,
            clock,
            sleeper: runtime.sleeper,
            jitter: runtime.jitter,
            user_semaphore: Semaphore::new(config.max_concurrent_users.max(1)),
            config,
        }
    }

    /// Run passes on the configured cadence until `shutdown` becomes `true`
    /// or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(cadence = %self.config.cadence, "rotation scheduler started");
        loop {
            if *shutdown.borrow() {
                break;
            }
            let now = self.clock.utc();
            let next_tick = self.config.cadence.next_tick_after(now);
            let wait = (next_tick - now).to_std().unwrap_or_default();
            info!(next_tick = %next_tick, "waiting for next rotation pass");

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                () = self.sleeper.sleep(wait) => {}
            }

            if let Err(error) = self.run_pass().await {
                error!(error = %error, "rotation pass aborted");
            }
        }
        info!("rotation scheduler stopped");
    }

    /// Refresh every enrolled user once.
    ///
    /// # Errors
    ///
    /// Fails only when the user list cannot be read; per-user failures are
    /// collected in the report.
    pub async fn run_pass(&self) -> Result<RotationPassReport, Error> {
        let trace_id = TraceId::generate();
        let span = info_span!("rotation_pass", trace_id = %trace_id);
        TraceId::scope(trace_id, self.run_pass_inner().instrument(span)).await
    }

    async fn run_pass_inner(&self) -> Result<RotationPassReport, Error> {
        let started_at = self.clock.utc();
        let user_ids = self
            .users
            .list_user_ids()
            .await
            .map_err(map_listing_error)?;
        info!(users = user_ids.len(), "rotation pass started");

        let outcomes = join_all(user_ids.into_iter().map(|user_id| {
            let span = info_span!("rotation_refresh", user_id = %user_id);
            self.refresh_user(user_id).instrument(span)
        }))
        .await;

        let mut report = RotationPassReport {
            started_at,
            finished_at: started_at,
            refreshed: 0,
            skipped: 0,
            failed: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                UserOutcome::Refreshed => report.refreshed += 1,
                UserOutcome::Skipped => report.skipped += 1,
                UserOutcome::Failed(failure) => report.failed.push(failure),
            }
        }
        report.finished_at = self.clock.utc();

        info!(
            refreshed = report.refreshed,
            skipped = report.skipped,
            failed = report.failed.len(),
            "rotation pass finished"
        );
        Ok(report)
    }

    async fn refresh_user(&self, user_id: UserId) -> UserOutcome {
        let Ok(_permit) = self.user_semaphore.acquire().await else {
            return UserOutcome::Failed(UserRecomputeFailure {
                user_id,
                attempts: 0,
                error: Error::internal("rotation scheduler semaphore closed"),
            });
        };

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.recomputation.recompute(&user_id).await {
                Ok(_) => return UserOutcome::Refreshed,
                Err(error) if error.code() == ErrorCode::NotFound => {
                    info!("user removed during pass; skipping");
                    return UserOutcome::Skipped;
                }
                Err(error) if error.is_retryable() && attempt < max_attempts => {
                    let delay = self.jitter.jittered_delay(
                        self.retry_base_delay(attempt),
                        attempt,
                        self.clock.utc(),
                    );
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "rotation refresh failed; retrying"
                    );
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    if error.code() == ErrorCode::InternalError {
                        error!(attempts = attempt, error = %error, "rotation refresh failed");
                    } else {
                        warn!(attempts = attempt, error = %error, "rotation refresh gave up");
                    }
                    return UserOutcome::Failed(UserRecomputeFailure {
                        user_id,
                        attempts: attempt,
                        error,
                    });
                }
            }
        }
    }

    fn retry_base_delay(&self, attempt: u32) -> Duration {
        let exponent = 2_u32.saturating_pow(attempt.saturating_sub(1));
        let base_ms = u64::try_from(self.config.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.config.max_backoff.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(u64::from(exponent)).min(max_ms))
    }
}

fn map_listing_error(error: UserRotationRepositoryError) -> Error {
    if error.is_retryable() {
        Error::service_unavailable(format!("could not list users: {error}"))
    } else {
        Error::internal(format!("could not list users: {error}"))
    }
}
