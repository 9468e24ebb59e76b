//! HTTP edge cases over the in-memory adapters: duplicate enrolment, reads
//! before enrolment, and session enforcement.
//!
//! The favourites flow lives in `favourites_update_bdd.rs`.

use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use munch_backend::domain::UserId;
use munch_backend::inbound::http::state::HttpState;

#[path = "support/rotation_http.rs"]
mod rotation_http;

use rotation_http::{init_app, memory_http_state, signed_in_cookie};

#[fixture]
fn http_state() -> HttpState {
    memory_http_state(15)
}

#[rstest]
#[actix_web::test]
async fn enrolling_twice_conflicts(http_state: HttpState) {
    let app = init_app(http_state, Key::generate()).await;
    let cookie = signed_in_cookie(&app, &UserId::random()).await;
    let enrol = || {
        test::TestRequest::post()
            .uri("/api/v1/users/me/rotation")
            .cookie(cookie.clone())
            .to_request()
    };

    let first = test::call_service(&app, enrol()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = test::call_service(&app, enrol()).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["code"], json!("conflict"));
}

#[rstest]
#[actix_web::test]
async fn unenrolled_user_gets_not_found(http_state: HttpState) {
    let app = init_app(http_state, Key::generate()).await;
    let cookie = signed_in_cookie(&app, &UserId::random()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me/rotation")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("trace-id"));
}

#[rstest]
#[actix_web::test]
async fn restaurant_listing_requires_a_session(http_state: HttpState) {
    let app = init_app(http_state, Key::generate()).await;

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/restaurants").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = signed_in_cookie(&app, &UserId::random()).await;
    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/restaurants")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body: Value = test::read_body_json(listed).await;
    assert_eq!(body.as_array().map(Vec::len), Some(15));
}
