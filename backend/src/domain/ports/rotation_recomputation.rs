//! Driving port used by the scheduler to refresh rotations.

use async_trait::async_trait;

use crate::domain::{Error, RotationEntry, UserId, UserRotationState};

/// Per-user recomputation pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RotationRecomputation: Send + Sync {
    /// Re-read favourites, fetch the catalogue, select and persist.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the user disappeared.
    /// - `ServiceUnavailable` when the catalogue or store timed out or is
    ///   unreachable; callers may retry.
    /// - `InternalError` for corrupt stored state.
    async fn recompute(&self, user_id: &UserId) -> Result<UserRotationState, Error>;

    /// Overwrite the stored rotation with `entries` after validating them.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when `entries` break the rotation invariants
    /// and `NotFound` when the user is not enrolled.
    async fn replace_rotation(
        &self,
        user_id: &UserId,
        entries: Vec<RotationEntry>,
    ) -> Result<(), Error>;
}
