//! Favourites API handlers.
//!
//! ```text
//! GET /api/v1/users/me/favourites
//! PUT /api/v1/users/me/favourites {"restaurantIds":["3fa85f64-..."]}
//! ```
//!
//! `PUT` replaces the whole set and answers with the recomputed rotation, so
//! the new favourites are visible immediately.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Favourites, RestaurantId, UserRotationState};
use crate::inbound::http::ApiResult;
use crate::inbound::http::rotations::RotationResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ensure_max_len, missing_field_error, parse_uuid_list,
};

const RESTAURANT_IDS: FieldName = FieldName::new("restaurantIds");

/// Upper bound on `restaurantIds` per request, counted before duplicates
/// collapse.
pub const MAX_FAVOURITES: usize = 100;

/// Request body for `PUT /api/v1/users/me/favourites`.
///
/// At most [`MAX_FAVOURITES`] ids are accepted. Duplicates collapse. Ids unknown to the catalogue are kept but never
/// selected.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouritesRequest {
    #[schema(value_type = Vec<String>, format = Uuid, max_items = 100)]
    pub restaurant_ids: Option<Vec<String>>,
}

impl TryFrom<FavouritesRequest> for Favourites {
    type Error = Error;

    fn try_from(request: FavouritesRequest) -> Result<Self, Self::Error> {
        let raw = request
            .restaurant_ids
            .ok_or_else(|| missing_field_error(RESTAURANT_IDS))?;
        ensure_max_len(&raw, RESTAURANT_IDS, MAX_FAVOURITES)?;
        let ids = parse_uuid_list(raw, RESTAURANT_IDS)?;
        Ok(ids.into_iter().map(RestaurantId::from_uuid).collect())
    }
}

/// The caller's favourites in ascending id order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouritesResponse {
    pub user_id: Uuid,
    pub restaurant_ids: Vec<Uuid>,
}

impl From<&UserRotationState> for FavouritesResponse {
    fn from(state: &UserRotationState) -> Self {
        Self {
            user_id: *state.user_id.as_uuid(),
            restaurant_ids: state.favourites.iter().map(|id| *id.as_uuid()).collect(),
        }
    }
}

/// Fetch the caller's favourites.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/favourites",
    responses(
        (status = 200, description = "Favourites", body = FavouritesResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User has no rotation yet", body = Error),
        (status = 503, description = "Rotation store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["favourites"],
    operation_id = "getFavourites"
)]
#[get("/users/me/favourites")]
pub async fn get_favourites(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FavouritesResponse>> {
    let user_id = session.require_user_id()?;
    let current = state.rotations.fetch_state(&user_id).await?;
    Ok(web::Json(FavouritesResponse::from(&current)))
}

/// Replace the caller's favourites and return the recomputed rotation.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/favourites",
    request_body = FavouritesRequest,
    responses(
        (status = 200, description = "Rotation after the update", body = RotationResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User has no rotation yet", body = Error),
        (status = 503, description = "Catalogue or store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["favourites"],
    operation_id = "replaceFavourites"
)]
#[put("/users/me/favourites")]
pub async fn replace_favourites(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FavouritesRequest>,
) -> ApiResult<web::Json<RotationResponse>> {
    let user_id = session.require_user_id()?;
    let favourites = Favourites::try_from(payload.into_inner())?;
    let updated = state
        .favourites
        .replace_favourites(&user_id, favourites)
        .await?;
    Ok(web::Json(updated.into()))
}

#[cfg(test)]
#[path = "favourites_tests.rs"]
mod tests;
