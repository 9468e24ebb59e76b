//! PostgreSQL-backed `UserRotationRepository`.
//!
//! Favourites live in a `uuid[]` column and the rotation in a `jsonb` array.
//! Each mutation is a single `INSERT` or `UPDATE`, so readers see either the
//! previous row or the new one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRotationRepository, UserRotationRepositoryError};
use crate::domain::{Favourites, RestaurantId, Rotation, UserId, UserRotationState};

use super::diesel_helpers::{DieselFailure, classify_diesel_error};
use super::models::{FavouritesUpdate, NewUserRotationRow, RotationUpdate, UserRotationRow};
use super::pool::DbPool;
use super::schema::user_rotations;

/// Diesel implementation of the rotation store.
#[derive(Clone)]
pub struct DieselUserRotationRepository {
    pool: DbPool,
}

impl DieselUserRotationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure, user_id: Option<&UserId>) -> UserRotationRepositoryError {
    match (failure, user_id) {
        (DieselFailure::Connection(message), _) => UserRotationRepositoryError::connection(message),
        (DieselFailure::UniqueViolation(_), Some(user_id)) => {
            UserRotationRepositoryError::already_enrolled(*user_id)
        }
        (DieselFailure::UniqueViolation(message) | DieselFailure::Query(message), _) => {
            UserRotationRepositoryError::query(message)
        }
    }
}

fn encode_rotation(rotation: &Rotation) -> Result<serde_json::Value, UserRotationRepositoryError> {
    serde_json::to_value(rotation)
        .map_err(|error| UserRotationRepositoryError::query(format!("encode rotation: {error}")))
}

fn favourite_uuids(favourites: &Favourites) -> Vec<Uuid> {
    favourites.iter().map(|id| *id.as_uuid()).collect()
}

pub(crate) fn row_to_state(
    row: UserRotationRow,
) -> Result<UserRotationState, UserRotationRepositoryError> {
    let user_id = UserId::from_uuid(row.user_id);
    let rotation: Rotation = serde_json::from_value(row.rotation).map_err(|error| {
        UserRotationRepositoryError::corrupt_state(format!("rotation for user {user_id}: {error}"))
    })?;
    let favourites = row
        .favourite_ids
        .into_iter()
        .map(RestaurantId::from_uuid)
        .collect();
    Ok(UserRotationState::new(
        user_id,
        favourites,
        rotation,
        row.refreshed_at,
    ))
}

fn expect_one_row(
    updated: usize,
    user_id: &UserId,
) -> Result<(), UserRotationRepositoryError> {
    if updated == 0 {
        Err(UserRotationRepositoryError::user_not_found(*user_id))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserRotationRepository for DieselUserRotationRepository {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserRotationState>, UserRotationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_failure(error.into(), None))?;
        let row: Option<UserRotationRow> = user_rotations::table
            .filter(user_rotations::user_id.eq(user_id.as_uuid()))
            .select(UserRotationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_failure(classify_diesel_error(error, "load rotation"), None))?;
        row.map(row_to_state).transpose()
    }

    async fn list_user_ids(&self) -> Result<Vec<UserId>, UserRotationRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_failure(error.into(), None))?;
        let ids: Vec<Uuid> = user_rotations::table
            .select(user_rotations::user_id)
            .order(user_rotations::user_id.asc())
            .load(&mut conn)
            .await
            .map_err(|error| map_failure(classify_diesel_error(error, "list users"), None))?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }

    async fn create(&self, state: &UserRotationState) -> Result<(), UserRotationRepositoryError> {
        let rotation = encode_rotation(&state.rotation)?;
        let favourite_ids = favourite_uuids(&state.favourites);
        let row = NewUserRotationRow {
            user_id: *state.user_id.as_uuid(),
            favourite_ids: &favourite_ids,
            rotation: &rotation,
            refreshed_at: state.refreshed_at,
        };

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_failure(error.into(), None))?;
        diesel::insert_into(user_rotations::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                map_failure(
                    classify_diesel_error(error, "create rotation"),
                    Some(&state.user_id),
                )
            })
    }

    async fn replace_rotation(
        &self,
        user_id: &UserId,
        rotation: &Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), UserRotationRepositoryError> {
        let rotation = encode_rotation(rotation)?;
        let changes = RotationUpdate {
            rotation: &rotation,
            refreshed_at,
        };

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_failure(error.into(), None))?;
        let updated = diesel::update(
            user_rotations::table.filter(user_rotations::user_id.eq(user_id.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|error| map_failure(classify_diesel_error(error, "replace rotation"), None))?;
        expect_one_row(updated, user_id)
    }

    async fn replace_favourites(
        &self,
        user_id: &UserId,
        favourites: &Favourites,
        rotation: &Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), UserRotationRepositoryError> {
        let rotation = encode_rotation(rotation)?;
        let favourite_ids = favourite_uuids(favourites);
        let changes = FavouritesUpdate {
            favourite_ids: &favourite_ids,
            rotation: &rotation,
            refreshed_at,
        };

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_failure(error.into(), None))?;
        let updated = diesel::update(
            user_rotations::table.filter(user_rotations::user_id.eq(user_id.as_uuid())),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(|error| map_failure(classify_diesel_error(error, "replace favourites"), None))?;
        expect_one_row(updated, user_id)
    }
}
