//! PostgreSQL-backed `RestaurantCatalogue`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{RestaurantCatalogue, RestaurantCatalogueError};
use crate::domain::{AssetId, RestaurantId, RestaurantRef};

use super::diesel_helpers::{DieselFailure, classify_diesel_error};
use super::models::RestaurantRow;
use super::pool::DbPool;
use super::schema::restaurants;

/// Reads the `restaurants` table.
#[derive(Clone)]
pub struct DieselRestaurantCatalogue {
    pool: DbPool,
}

impl DieselRestaurantCatalogue {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: DieselFailure) -> RestaurantCatalogueError {
    match failure {
        DieselFailure::Connection(message) => RestaurantCatalogueError::connection(message),
        DieselFailure::UniqueViolation(message) | DieselFailure::Query(message) => {
            RestaurantCatalogueError::query(message)
        }
    }
}

fn asset_id(raw: Option<String>, column: &'static str, restaurant: &RestaurantId) -> Option<AssetId> {
    let raw = raw?;
    match AssetId::new(raw) {
        Ok(id) => Some(id),
        Err(error) => {
            warn!(%restaurant, column, %error, "ignoring malformed asset id");
            None
        }
    }
}

pub(crate) fn row_to_restaurant(row: RestaurantRow) -> RestaurantRef {
    let id = RestaurantId::from_uuid(row.id);
    let logo = asset_id(row.logo_asset_id, "logo_asset_id", &id);
    let barcode = asset_id(row.barcode_asset_id, "barcode_asset_id", &id);
    RestaurantRef::new(id, row.name, row.category, row.location).with_assets(logo, barcode)
}

#[async_trait]
impl RestaurantCatalogue for DieselRestaurantCatalogue {
    async fn list_all(&self) -> Result<Vec<RestaurantRef>, RestaurantCatalogueError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| map_failure(error.into()))?;
        let rows: Vec<RestaurantRow> = restaurants::table
            .select(RestaurantRow::as_select())
            .order(restaurants::id.asc())
            .load(&mut conn)
            .await
            .map_err(|error| map_failure(classify_diesel_error(error, "list restaurants")))?;
        Ok(rows.into_iter().map(row_to_restaurant).collect())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(logo: Option<&str>) -> RestaurantRow {
        RestaurantRow {
            id: Uuid::from_u128(7),
            name: "Noodle Bar".to_owned(),
            category: "Asian".to_owned(),
            location: "Level 2".to_owned(),
            logo_asset_id: logo.map(str::to_owned),
            barcode_asset_id: None,
        }
    }

    #[rstest]
    fn maps_every_column() {
        let restaurant = row_to_restaurant(row(Some("logo-7")));
        assert_eq!(restaurant.id, RestaurantId::from_uuid(Uuid::from_u128(7)));
        assert_eq!(restaurant.name, "Noodle Bar");
        assert_eq!(
            restaurant.logo_asset_id.as_ref().map(AssetId::as_str),
            Some("logo-7")
        );
        assert!(restaurant.barcode_asset_id.is_none());
    }

    #[rstest]
    #[case(Some(""))]
    #[case(Some("has space"))]
    fn malformed_asset_ids_are_dropped(#[case] logo: Option<&str>) {
        assert!(row_to_restaurant(row(logo)).logo_asset_id.is_none());
    }

    #[rstest]
    fn connection_failures_stay_retryable() {
        let error = map_failure(DieselFailure::Connection("reset".to_owned()));
        assert!(error.is_retryable());
    }
}
