//! Rotation store domain service.
//!
//! Implements the rotation driving ports on top of the catalogue and user
//! rotation repository. Every write for a user runs under that user's lock
//! and re-reads the stored favourites inside it, so a recomputation triggered
//! by a favourites update always sees the new favourites.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::ports::{
    FavouritesCommand, RestaurantCatalogue, RestaurantCatalogueError, RotationEnrolment,
    RotationQuery, RotationRecomputation, UserRotationRepository, UserRotationRepositoryError,
};
use crate::domain::{
    Error, Favourites, RestaurantRef, Rotation, RotationEntry, RotationRandomness, UserId,
    UserLocks, UserRotationState, select_rotation,
};

/// Default upper bound on one catalogue read.
pub const DEFAULT_CATALOGUE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`RotationService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationServiceConfig {
    /// Catalogue reads taking longer fail with `ServiceUnavailable`.
    pub catalogue_timeout: Duration,
}

impl Default for RotationServiceConfig {
    fn default() -> Self {
        Self {
            catalogue_timeout: DEFAULT_CATALOGUE_TIMEOUT,
        }
    }
}

/// Runtime collaborators that are not persistence ports.
pub struct RotationServiceRuntime {
    /// Source of `refreshed_at` timestamps.
    pub clock: Arc<dyn Clock>,
    /// Generator factory for rotation draws.
    pub randomness: Arc<dyn RotationRandomness>,
}

/// Rotation store service implementing the driving ports.
pub struct RotationService<R, C> {
    repository: Arc<R>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
    randomness: Arc<dyn RotationRandomness>,
    locks: UserLocks,
    config: RotationServiceConfig,
}

impl<R, C> RotationService<R, C> {
    /// Create a service over the given adapters.
    pub fn new(
        repository: Arc<R>,
        catalogue: Arc<C>,
        runtime: RotationServiceRuntime,
        config: RotationServiceConfig,
    ) -> Self {
        Self {
            repository,
            catalogue,
            clock: runtime.clock,
            randomness: runtime.randomness,
            locks: UserLocks::new(),
            config,
        }
    }
}

impl<R, C> RotationService<R, C>
where
    R: UserRotationRepository,
    C: RestaurantCatalogue,
{
    fn map_repository_error(error: UserRotationRepositoryError) -> Error {
        match error {
            UserRotationRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("rotation store unavailable: {message}"))
            }
            UserRotationRepositoryError::Query { message } => {
                Error::internal(format!("rotation store error: {message}"))
            }
            UserRotationRepositoryError::UserNotFound { user_id } => {
                Self::not_enrolled(&user_id)
            }
            UserRotationRepositoryError::AlreadyEnrolled { user_id } => {
                Error::conflict("user already has a rotation")
                    .with_details(json!({ "userId": user_id.to_string() }))
            }
            UserRotationRepositoryError::CorruptState { message } => {
                error!(error = %message, "stored rotation state is corrupt");
                Error::internal(format!("stored rotation state is corrupt: {message}"))
            }
        }
    }

    fn map_catalogue_error(error: RestaurantCatalogueError) -> Error {
        match error {
            RestaurantCatalogueError::Connection { message } => {
                Error::service_unavailable(format!("restaurant catalogue unavailable: {message}"))
            }
            RestaurantCatalogueError::Query { message } => {
                Error::internal(format!("restaurant catalogue error: {message}"))
            }
        }
    }

    fn not_enrolled(user_id: &UserId) -> Error {
        Error::not_found("user has no rotation")
            .with_details(json!({ "userId": user_id.to_string() }))
    }

    async fn load_state(&self, user_id: &UserId) -> Result<UserRotationState, Error> {
        self.repository
            .find_by_user_id(user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_enrolled(user_id))
    }

    async fn load_catalogue(&self) -> Result<Vec<RestaurantRef>, Error> {
        let timeout = self.config.catalogue_timeout;
        match tokio::time::timeout(timeout, self.catalogue.list_all()).await {
            Ok(result) => result.map_err(Self::map_catalogue_error),
            Err(_) => {
                let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                Err(Error::service_unavailable("restaurant catalogue timed out")
                    .with_details(json!({ "timeoutMs": timeout_ms })))
            }
        }
    }

    fn select(
        &self,
        user_id: &UserId,
        favourites: &Favourites,
        catalogue: &[RestaurantRef],
    ) -> Rotation {
        let mut rng = self.randomness.rng();
        let selection = select_rotation(favourites, catalogue, &mut rng);
        if selection.dropped_favourites > 0 {
            warn!(
                user_id = %user_id,
                favourites = favourites.len(),
                dropped = selection.dropped_favourites,
                "favourites exceed rotation capacity; keeping lowest ids"
            );
        }
        selection.rotation
    }
}

#[async_trait]
impl<R, C> RotationQuery for RotationService<R, C>
where
    R: UserRotationRepository,
    C: RestaurantCatalogue,
{
    async fn fetch_state(&self, user_id: &UserId) -> Result<UserRotationState, Error> {
        self.load_state(user_id).await
    }
}

#[async_trait]
impl<R, C> FavouritesCommand for RotationService<R, C>
where
    R: UserRotationRepository,
    C: RestaurantCatalogue,
{
    async fn replace_favourites(
        &self,
        user_id: &UserId,
        favourites: Favourites,
    ) -> Result<UserRotationState, Error> {
        let _guard = self.locks.acquire(user_id).await;
        self.load_state(user_id).await?;

        let catalogue = self.load_catalogue().await?;
        let rotation = self.select(user_id, &favourites, &catalogue);
        let refreshed_at = self.clock.utc();
        self.repository
            .replace_favourites(user_id, &favourites, &rotation, refreshed_at)
            .await
            .map_err(Self::map_repository_error)?;

        Ok(UserRotationState::new(
            *user_id,
            favourites,
            rotation,
            refreshed_at,
        ))
    }
}

#[async_trait]
impl<R, C> RotationEnrolment for RotationService<R, C>
where
    R: UserRotationRepository,
    C: RestaurantCatalogue,
{
    async fn enrol(&self, user_id: &UserId) -> Result<UserRotationState, Error> {
        let _guard = self.locks.acquire(user_id).await;
        let existing = self
            .repository
            .find_by_user_id(user_id)
            .await
            .map_err(Self::map_repository_error)?;
        if existing.is_some() {
            return Err(Self::map_repository_error(
                UserRotationRepositoryError::already_enrolled(*user_id),
            ));
        }

        let catalogue = self.load_catalogue().await?;
        let favourites = Favourites::new();
        let rotation = self.select(user_id, &favourites, &catalogue);
        let state = UserRotationState::new(*user_id, favourites, rotation, self.clock.utc());
        self.repository
            .create(&state)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(state)
    }
}

#[async_trait]
impl<R, C> RotationRecomputation for RotationService<R, C>
where
    R: UserRotationRepository,
    C: RestaurantCatalogue,
{
    async fn recompute(&self, user_id: &UserId) -> Result<UserRotationState, Error> {
        let _guard = self.locks.acquire(user_id).await;
        let current = self.load_state(user_id).await?;

        let catalogue = self.load_catalogue().await?;
        let rotation = self.select(user_id, &current.favourites, &catalogue);
        let refreshed_at = self.clock.utc();
        self.repository
            .replace_rotation(user_id, &rotation, refreshed_at)
            .await
            .map_err(Self::map_repository_error)?;

        Ok(UserRotationState::new(
            *user_id,
            current.favourites,
            rotation,
            refreshed_at,
        ))
    }

    async fn replace_rotation(
        &self,
        user_id: &UserId,
        entries: Vec<RotationEntry>,
    ) -> Result<(), Error> {
        let rotation = Rotation::try_from_entries(entries).map_err(|violation| {
            error!(user_id = %user_id, error = %violation, "rejected rotation write");
            Error::internal(format!("rotation invariant violated: {violation}"))
        })?;

        let _guard = self.locks.acquire(user_id).await;
        self.repository
            .replace_rotation(user_id, &rotation, self.clock.utc())
            .await
            .map_err(Self::map_repository_error)
    }
}

#[cfg(test)]
#[path = "rotation_service_tests.rs"]
mod tests;
