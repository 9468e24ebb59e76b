//! Outbound port for persisting per-user favourites and rotations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Favourites, Rotation, UserId, UserRotationState};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user rotation repository adapters.
    pub enum UserRotationRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "user rotation repository connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "user rotation repository query failed: {message}",
        /// No state exists for the user.
        UserNotFound { user_id: UserId } => "no rotation state for user {user_id}",
        /// A state already exists for the user.
        AlreadyEnrolled { user_id: UserId } => "user {user_id} already has a rotation",
        /// Stored data could not be decoded into a valid state.
        CorruptState { message: String } => "stored rotation state is corrupt: {message}",
    }
}

impl UserRotationRepositoryError {
    /// Whether retrying the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Persistence contract for [`UserRotationState`].
///
/// Every mutation rewrites the affected fields of one user's row in a single
/// statement, so concurrent readers see either the old or the new state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRotationRepository: Send + Sync {
    /// Fetch the state for `user_id`, if enrolled.
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserRotationState>, UserRotationRepositoryError>;

    /// List every enrolled user.
    async fn list_user_ids(&self) -> Result<Vec<UserId>, UserRotationRepositoryError>;

    /// Insert a new state. Fails with `AlreadyEnrolled` when one exists.
    async fn create(&self, state: &UserRotationState) -> Result<(), UserRotationRepositoryError>;

    /// Overwrite the rotation, leaving favourites untouched.
    async fn replace_rotation(
        &self,
        user_id: &UserId,
        rotation: &Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), UserRotationRepositoryError>;

    /// Overwrite favourites and rotation together.
    async fn replace_favourites(
        &self,
        user_id: &UserId,
        favourites: &Favourites,
        rotation: &Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), UserRotationRepositoryError>;
}
