//! Catalogue listing.
//!
//! ```text
//! GET /api/v1/restaurants
//! ```

use actix_web::{get, web};
use tracing::warn;

use crate::domain::ports::RestaurantCatalogueError;
use crate::domain::{Error, RestaurantRef};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn map_catalogue_error(error: RestaurantCatalogueError) -> Error {
    if error.is_retryable() {
        warn!(%error, "catalogue unavailable");
        Error::service_unavailable("restaurant catalogue unavailable")
    } else {
        Error::internal(format!("restaurant catalogue error: {error}"))
    }
}

/// List every restaurant a rotation can draw from, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    responses(
        (status = 200, description = "Restaurant catalogue", body = [RestaurantRef]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Catalogue unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["restaurants"],
    operation_id = "listRestaurants"
)]
#[get("/restaurants")]
pub async fn list_restaurants(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<RestaurantRef>>> {
    session.require_user_id()?;
    let mut restaurants = state
        .catalogue
        .list_all()
        .await
        .map_err(map_catalogue_error)?;
    restaurants.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    Ok(web::Json(restaurants))
}
