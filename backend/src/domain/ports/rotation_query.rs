//! Driving port for reading a user's rotation state.

use async_trait::async_trait;

use crate::domain::{Error, Favourites, Rotation, UserId, UserRotationState};

/// Read side of the rotation store.
///
/// Reads never wait on an in-flight recomputation; they return the last
/// persisted state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RotationQuery: Send + Sync {
    /// Fetch the full state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user is not enrolled and
    /// `ServiceUnavailable` when the store cannot be reached.
    async fn fetch_state(&self, user_id: &UserId) -> Result<UserRotationState, Error>;

    /// Fetch only the rotation.
    async fn fetch_rotation(&self, user_id: &UserId) -> Result<Rotation, Error> {
        self.fetch_state(user_id).await.map(|state| state.rotation)
    }

    /// Fetch only the favourites.
    async fn fetch_favourites(&self, user_id: &UserId) -> Result<Favourites, Error> {
        self.fetch_state(user_id).await.map(|state| state.favourites)
    }
}
