//! Diesel row types. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{restaurants, user_rotations};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = restaurants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RestaurantRow {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub location: String,
    pub logo_asset_id: Option<String>,
    pub barcode_asset_id: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_rotations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRotationRow {
    pub user_id: Uuid,
    pub favourite_ids: Vec<Uuid>,
    pub rotation: serde_json::Value,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_rotations)]
pub(crate) struct NewUserRotationRow<'a> {
    pub user_id: Uuid,
    pub favourite_ids: &'a [Uuid],
    pub rotation: &'a serde_json::Value,
    pub refreshed_at: DateTime<Utc>,
}

/// Scheduler write: favourites stay untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_rotations)]
pub(crate) struct RotationUpdate<'a> {
    pub rotation: &'a serde_json::Value,
    pub refreshed_at: DateTime<Utc>,
}

/// Favourites write: both columns in one statement.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_rotations)]
pub(crate) struct FavouritesUpdate<'a> {
    pub favourite_ids: &'a [Uuid],
    pub rotation: &'a serde_json::Value,
    pub refreshed_at: DateTime<Utc>,
}
