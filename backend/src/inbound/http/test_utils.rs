//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, get, test, web};

use crate::domain::ports::{
    MockFavouritesCommand, MockRestaurantCatalogue, MockRotationEnrolment, MockRotationQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpStatePorts;

/// Cookie session middleware for tests: fresh key per call, cookie named
/// `session`, `Secure` off so plain-HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Stands in for the upstream identity provider.
#[get("/test/sign-in/{user_id}")]
pub async fn sign_in(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user_id = UserId::new(path.into_inner())
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn sign_in_request(user_id: &UserId) -> test::TestRequest {
    test::TestRequest::get().uri(&format!("/test/sign-in/{user_id}"))
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Ports backed by expectation-free mocks; tests replace what they use.
pub fn mock_ports() -> HttpStatePorts {
    HttpStatePorts {
        rotations: Arc::new(MockRotationQuery::new()),
        favourites: Arc::new(MockFavouritesCommand::new()),
        enrolment: Arc::new(MockRotationEnrolment::new()),
        catalogue: Arc::new(MockRestaurantCatalogue::new()),
    }
}
