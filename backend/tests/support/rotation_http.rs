//! In-process app over the in-memory adapters, shared by the HTTP suites.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, get, test, web};
use mockable::DefaultClock;

use munch_backend::Trace;
use munch_backend::domain::{
    Error, RotationServiceConfig, RotationServiceRuntime, SeededRandomness, UserId,
};
use munch_backend::inbound::http::favourites::{get_favourites, replace_favourites};
use munch_backend::inbound::http::restaurants::list_restaurants;
use munch_backend::inbound::http::rotations::{enrol_rotation, get_rotation};
use munch_backend::inbound::http::session::SessionContext;
use munch_backend::inbound::http::state::HttpState;
use munch_backend::outbound::memory::{InMemoryUserRotationRepository, StaticRestaurantCatalogue};
use munch_backend::test_support::numbered_catalogue;
use munch_backend::wiring::wire_rotation;

/// Stands in for the identity provider: writes the path's user id into the
/// session.
#[get("/test/sign-in/{user_id}")]
async fn sign_in(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Rotation state over `catalogue_size` numbered restaurants with seeded
/// draws.
pub fn memory_http_state(catalogue_size: u128) -> HttpState {
    wire_rotation(
        Arc::new(InMemoryUserRotationRepository::default()),
        Arc::new(StaticRestaurantCatalogue::new(numbered_catalogue(
            catalogue_size,
        ))),
        RotationServiceRuntime {
            clock: Arc::new(DefaultClock),
            randomness: Arc::new(SeededRandomness::new(42)),
        },
        RotationServiceConfig::default(),
    )
    .http_state
}

pub async fn init_app(
    state: HttpState,
    key: Key,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(sign_in)
                    .service(get_rotation)
                    .service(enrol_rotation)
                    .service(get_favourites)
                    .service(replace_favourites)
                    .service(list_restaurants),
            ),
    )
    .await
}

pub async fn signed_in_cookie<S>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/test/sign-in/{user_id}"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
