//! Rotation API handlers.
//!
//! ```text
//! GET  /api/v1/users/me/rotation
//! POST /api/v1/users/me/rotation
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, RotationEntry, UserRotationState};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The signed-in user's current rotation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotationResponse {
    pub user_id: Uuid,
    /// When the rotation was last recomputed.
    #[schema(value_type = String, format = DateTime)]
    pub refreshed_at: DateTime<Utc>,
    /// Favourites first (by id), then random draws.
    pub restaurants: Vec<RotationEntry>,
}

impl From<UserRotationState> for RotationResponse {
    fn from(state: UserRotationState) -> Self {
        Self {
            user_id: *state.user_id.as_uuid(),
            refreshed_at: state.refreshed_at,
            restaurants: state.rotation.into_entries(),
        }
    }
}

/// Fetch the caller's rotation.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/rotation",
    responses(
        (status = 200, description = "Current rotation", body = RotationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "User has no rotation yet", body = Error),
        (status = 503, description = "Rotation store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rotations"],
    operation_id = "getRotation"
)]
#[get("/users/me/rotation")]
pub async fn get_rotation(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RotationResponse>> {
    let user_id = session.require_user_id()?;
    let current = state.rotations.fetch_state(&user_id).await?;
    Ok(web::Json(current.into()))
}

/// Enrol the caller: empty favourites and a fresh random rotation.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/rotation",
    responses(
        (status = 201, description = "Rotation created", body = RotationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "User already has a rotation", body = Error),
        (status = 503, description = "Catalogue or store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["rotations"],
    operation_id = "enrolRotation"
)]
#[post("/users/me/rotation")]
pub async fn enrol_rotation(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let created = state.enrolment.enrol(&user_id).await?;
    Ok(HttpResponse::Created().json(RotationResponse::from(created)))
}

#[cfg(test)]
#[path = "rotations_tests.rs"]
mod tests;
