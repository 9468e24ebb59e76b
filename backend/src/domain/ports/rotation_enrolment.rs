//! Driving port for creating a user's first rotation.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserRotationState};

/// Seeds a new user with empty favourites and a full random draw.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RotationEnrolment: Send + Sync {
    /// Create the rotation state for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the user already has a rotation.
    async fn enrol(&self, user_id: &UserId) -> Result<UserRotationState, Error>;
}
