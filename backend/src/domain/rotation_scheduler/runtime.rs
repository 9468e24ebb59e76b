//! Port and runtime dependency bundles for the rotation scheduler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::domain::ports::{RotationRecomputation, UserRotationRepository};

use super::{BackoffJitter, RotationSleeper};

/// Port bundle required by the scheduler.
pub struct RotationSchedulerPorts {
    /// Source of the user ids visited by each pass.
    pub users: Arc<dyn UserRotationRepository>,
    /// Per-user recomputation pipeline.
    pub recomputation: Arc<dyn RotationRecomputation>,
}

impl RotationSchedulerPorts {
    /// Bundle the scheduler's ports.
    pub fn new(
        users: Arc<dyn UserRotationRepository>,
        recomputation: Arc<dyn RotationRecomputation>,
    ) -> Self {
        Self {
            users,
            recomputation,
        }
    }
}

/// Timing collaborators used between ticks and retries.
pub struct RotationSchedulerRuntime {
    /// Async sleep implementation.
    pub sleeper: Arc<dyn RotationSleeper>,
    /// Jitter strategy for retry delays.
    pub jitter: Arc<dyn BackoffJitter>,
}

impl Default for RotationSchedulerRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter),
        }
    }
}

/// Tokio-backed sleeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl RotationSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Adds up to a quarter of the base delay, drawn uniformly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl BackoffJitter for RandomJitter {
    fn jittered_delay(&self, base: Duration, _attempt: u32, _now: DateTime<Utc>) -> Duration {
        let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
        let max_extra = (base_ms / 4).max(1);
        let extra = rand::thread_rng().gen_range(0..=max_extra);
        Duration::from_millis(base_ms.saturating_add(extra))
    }
}
