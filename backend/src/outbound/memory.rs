//! Process-local adapters.
//!
//! Used when no database is configured and by the integration tests. The
//! rotation store keeps every state behind one `RwLock`, so each write is
//! atomic with respect to readers.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    RestaurantCatalogue, RestaurantCatalogueError, UserRotationRepository,
    UserRotationRepositoryError,
};
use crate::domain::{Favourites, RestaurantRef, Rotation, UserId, UserRotationState};

/// Fixed restaurant list.
#[derive(Debug, Default)]
pub struct StaticRestaurantCatalogue {
    restaurants: RwLock<Vec<RestaurantRef>>,
}

impl StaticRestaurantCatalogue {
    pub fn new(restaurants: Vec<RestaurantRef>) -> Self {
        Self {
            restaurants: RwLock::new(restaurants),
        }
    }

    /// Swap the whole list, e.g. to simulate catalogue churn in tests.
    pub fn replace(&self, restaurants: Vec<RestaurantRef>) -> Result<(), RestaurantCatalogueError> {
        let mut guard = self
            .restaurants
            .write()
            .map_err(|_| RestaurantCatalogueError::query("catalogue lock poisoned"))?;
        *guard = restaurants;
        Ok(())
    }
}

#[async_trait]
impl RestaurantCatalogue for StaticRestaurantCatalogue {
    async fn list_all(&self) -> Result<Vec<RestaurantRef>, RestaurantCatalogueError> {
        self.restaurants
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| RestaurantCatalogueError::query("catalogue lock poisoned"))
    }
}

/// In-memory rotation store.
#[derive(Debug, Default)]
pub struct InMemoryUserRotationRepository {
    states: RwLock<HashMap<UserId, UserRotationState>>,
}

fn poisoned() -> UserRotationRepositoryError {
    UserRotationRepositoryError::query("rotation store lock poisoned")
}

impl InMemoryUserRotationRepository {
    fn update<F>(&self, user_id: &UserId, apply: F) -> Result<(), UserRotationRepositoryError>
    where
        F: FnOnce(&mut UserRotationState),
    {
        let mut states = self.states.write().map_err(|_| poisoned())?;
        let state = states
            .get_mut(user_id)
            .ok_or_else(|| UserRotationRepositoryError::user_not_found(*user_id))?;
        apply(state);
        Ok(())
    }

    /// Drop a user, e.g. to simulate deletion mid-pass.
    pub fn remove(&self, user_id: &UserId) -> Result<bool, UserRotationRepositoryError> {
        let mut states = self.states.write().map_err(|_| poisoned())?;
        Ok(states.remove(user_id).is_some())
    }
}

#[async_trait]
impl UserRotationRepository for InMemoryUserRotationRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserRotationState>, UserRotationRepositoryError> {
        let states = self.states.read().map_err(|_| poisoned())?;
        Ok(states.get(user_id).cloned())
    }

    async fn list_user_ids(&self) -> Result<Vec<UserId>, UserRotationRepositoryError> {
        let states = self.states.read().map_err(|_| poisoned())?;
        let mut ids: Vec<UserId> = states.keys().copied().collect();
        ids.sort_by_key(|id| *id.as_uuid());
        Ok(ids)
    }

    async fn create(&self, state: &UserRotationState) -> Result<(), UserRotationRepositoryError> {
        let mut states = self.states.write().map_err(|_| poisoned())?;
        if states.contains_key(&state.user_id) {
            return Err(UserRotationRepositoryError::already_enrolled(state.user_id));
        }
        states.insert(state.user_id, state.clone());
        Ok(())
    }

    async fn replace_rotation(
        &self,
        user_id: &UserId,
        rotation: &Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), UserRotationRepositoryError> {
        self.update(user_id, |state| {
            state.rotation = rotation.clone();
            state.refreshed_at = refreshed_at;
        })
    }

    async fn replace_favourites(
        &self,
        user_id: &UserId,
        favourites: &Favourites,
        rotation: &Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), UserRotationRepositoryError> {
        self.update(user_id, |state| {
            state.favourites = favourites.clone();
            state.rotation = rotation.clone();
            state.refreshed_at = refreshed_at;
        })
    }
}
