//! OpenAPI document for the REST API.
//!
//! Served at `/api-docs/openapi.json` with Swagger UI under `/docs` in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, RestaurantRef, RotationEntry};
use crate::inbound::http::favourites::{FavouritesRequest, FavouritesResponse};
use crate::inbound::http::rotations::RotationResponse;

struct SessionCookieScheme;

impl Modify for SessionCookieScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// Generated OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieScheme),
    info(
        title = "Munch rotation API",
        description = "Weekly restaurant rotations biased towards each user's favourites."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::rotations::get_rotation,
        crate::inbound::http::rotations::enrol_rotation,
        crate::inbound::http::favourites::get_favourites,
        crate::inbound::http::favourites::replace_favourites,
        crate::inbound::http::restaurants::list_restaurants,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RestaurantRef,
        RotationEntry,
        RotationResponse,
        FavouritesRequest,
        FavouritesResponse,
    )),
    tags(
        (name = "rotations", description = "The signed-in user's weekly rotation"),
        (name = "favourites", description = "Restaurants pinned into every rotation"),
        (name = "restaurants", description = "The restaurant catalogue"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;

    use super::*;

    #[rstest]
    #[case("/api/v1/users/me/rotation")]
    #[case("/api/v1/users/me/favourites")]
    #[case("/api/v1/restaurants")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn documents_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn rotation_path_documents_both_methods() {
        let doc = ApiDoc::openapi();
        let item = doc
            .paths
            .paths
            .get("/api/v1/users/me/rotation")
            .expect("rotation path");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
    }

    #[rstest]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
        assert!(components.schemas.contains_key("RotationResponse"));
    }
}
