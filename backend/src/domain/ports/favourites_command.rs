//! Driving port for replacing a user's favourites.

use async_trait::async_trait;

use crate::domain::{Error, Favourites, UserId, UserRotationState};

/// Write side for favourites.
///
/// Replacing favourites recomputes the rotation before returning, so the
/// returned state (and any later read) already pins every new favourite that
/// exists in the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouritesCommand: Send + Sync {
    /// Replace the whole favourites set and recompute the rotation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for users without a rotation and
    /// `ServiceUnavailable` when the catalogue or store cannot be reached.
    async fn replace_favourites(
        &self,
        user_id: &UserId,
        favourites: Favourites,
    ) -> Result<UserRotationState, Error>;
}
