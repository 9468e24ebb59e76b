//! Behavioural tests for replacing favourites over HTTP.
//!
//! Every request builds a fresh app over the same state and session key, so
//! the session cookie from the sign-in step stays valid across steps.

use std::collections::HashSet;

use actix_web::cookie::{Cookie, Key};
use actix_web::rt::System;
use actix_web::test as actix_test;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};

use munch_backend::domain::UserId;
use munch_backend::inbound::http::state::HttpState;
use munch_backend::test_support::restaurant_id;

#[path = "support/rotation_http.rs"]
mod rotation_http;

use rotation_http::{init_app, memory_http_state, signed_in_cookie};

#[derive(Default, ScenarioState)]
struct FavouritesWorld {
    state: Slot<HttpState>,
    key: Slot<Key>,
    cookie: Slot<Cookie<'static>>,
    catalogue_size: Slot<u128>,
    enrolled_ids: Slot<Vec<String>>,
    picked: Slot<Vec<String>>,
    last_status: Slot<u16>,
    last_body: Slot<Value>,
}

impl FavouritesWorld {
    fn send(&self, request: actix_test::TestRequest) -> (u16, Value) {
        let state = self.state.get().expect("app state");
        let key = self.key.get().expect("session key");
        let cookie = self.cookie.get().expect("session cookie");
        let (status, body) = System::new().block_on(async move {
            let app = init_app(state, key).await;
            let res = actix_test::call_service(&app, request.cookie(cookie).to_request()).await;
            let status = res.status().as_u16();
            let body = actix_test::read_body(res).await;
            (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
        });
        self.last_status.set(status);
        self.last_body.set(body.clone());
        (status, body)
    }

    fn put_favourites(&self, ids: Vec<String>) {
        self.send(
            actix_test::TestRequest::put()
                .uri("/api/v1/users/me/favourites")
                .set_json(json!({ "restaurantIds": ids })),
        );
    }

    fn last_body(&self) -> Value {
        self.last_body.get().expect("response body")
    }
}

fn ids_of(rotation: &Value) -> Vec<String> {
    rotation["restaurants"]
        .as_array()
        .expect("restaurants array")
        .iter()
        .map(|entry| {
            entry["restaurant"]["id"]
                .as_str()
                .expect("restaurant id")
                .to_owned()
        })
        .collect()
}

fn parse_count(raw: &str) -> usize {
    raw.parse().expect("numeric step argument")
}

#[fixture]
fn world() -> FavouritesWorld {
    FavouritesWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("a signed-in user on a catalogue of {size} restaurants")]
fn a_signed_in_user_on_a_catalogue(world: &FavouritesWorld, size: String) {
    let size: u128 = size.parse().expect("catalogue size");
    let state = memory_http_state(size);
    let key = Key::generate();
    let user_id = UserId::random();
    let cookie = System::new().block_on({
        let state = state.clone();
        let key = key.clone();
        async move {
            let app = init_app(state, key).await;
            signed_in_cookie(&app, &user_id).await
        }
    });
    world.state.set(state);
    world.key.set(key);
    world.cookie.set(cookie);
    world.catalogue_size.set(size);
}

#[given("the user has enrolled in a rotation")]
fn the_user_has_enrolled(world: &FavouritesWorld) {
    let (status, body) = world.send(actix_test::TestRequest::post().uri("/api/v1/users/me/rotation"));
    assert_eq!(status, 201, "enrolment failed: {body}");
    world.enrolled_ids.set(ids_of(&body));
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("the user picks {count} favourites outside the current rotation")]
fn the_user_picks_favourites_outside_the_rotation(world: &FavouritesWorld, count: String) {
    let drawn = world.enrolled_ids.get().expect("enrolled rotation");
    let size = world.catalogue_size.get().expect("catalogue size");
    let mut picked: Vec<String> = (1..=size)
        .map(|n| restaurant_id(n).to_string())
        .filter(|id| !drawn.contains(id))
        .take(parse_count(&count))
        .collect();
    assert_eq!(picked.len(), parse_count(&count), "catalogue too small");
    // Submit out of order; the response must sort them.
    picked.reverse();
    world.put_favourites(picked.clone());
    picked.sort();
    world.picked.set(picked);
}

#[when("the user submits the favourite id {value}")]
fn the_user_submits_the_favourite_id(world: &FavouritesWorld, value: String) {
    world.put_favourites(vec![value]);
}

#[when("the user submits {count} favourite ids")]
fn the_user_submits_favourite_ids(world: &FavouritesWorld, count: String) {
    let ids = (1..=parse_count(&count) as u128)
        .map(|n| restaurant_id(n).to_string())
        .collect();
    world.put_favourites(ids);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the response status is {status}")]
fn the_response_status_is(world: &FavouritesWorld, status: String) {
    let expected: u16 = status.parse().expect("status code");
    assert_eq!(
        world.last_status.get(),
        Some(expected),
        "body: {}",
        world.last_body()
    );
}

#[then("the rotation starts with the picked favourites in id order")]
fn the_rotation_starts_with_the_picked_favourites(world: &FavouritesWorld) {
    let picked = world.picked.get().expect("picked favourites");
    let body = world.last_body();
    let entries = body["restaurants"].as_array().expect("restaurants array");
    assert_eq!(ids_of(&body)[..picked.len()], picked[..]);
    assert!(
        entries[..picked.len()]
            .iter()
            .all(|entry| entry["fromFavourites"] == json!(true))
    );
    assert!(
        entries[picked.len()..]
            .iter()
            .all(|entry| entry["fromFavourites"] == json!(false))
    );
}

#[then("the rotation holds {count} distinct restaurants")]
fn the_rotation_holds_distinct_restaurants(world: &FavouritesWorld, count: String) {
    let ids = ids_of(&world.last_body());
    assert_eq!(ids.len(), parse_count(&count));
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
}

#[then("reading the rotation back returns the same restaurants")]
fn reading_the_rotation_back_returns_the_same_restaurants(world: &FavouritesWorld) {
    let updated = ids_of(&world.last_body());
    let (status, read_back) =
        world.send(actix_test::TestRequest::get().uri("/api/v1/users/me/rotation"));
    assert_eq!(status, 200);
    assert_eq!(ids_of(&read_back), updated);
}

#[then("the stored favourites are the picked favourites")]
fn the_stored_favourites_are_the_picked_favourites(world: &FavouritesWorld) {
    let picked = world.picked.get().expect("picked favourites");
    let (status, stored) =
        world.send(actix_test::TestRequest::get().uri("/api/v1/users/me/favourites"));
    assert_eq!(status, 200);
    assert_eq!(stored["restaurantIds"], json!(picked));
}

#[then("the error names {field} with code {code}")]
fn the_error_names_field_with_code(world: &FavouritesWorld, field: String, code: String) {
    let body = world.last_body();
    assert_eq!(body["code"], json!("invalid_request"));
    assert_eq!(body["details"]["field"], json!(field));
    assert_eq!(body["details"]["code"], json!(code));
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/favourites_update.feature",
    name = "Favourites lead the rotation after an update"
)]
fn favourites_lead_the_rotation_after_an_update(world: FavouritesWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/favourites_update.feature",
    name = "Malformed favourite ids are rejected"
)]
fn malformed_favourite_ids_are_rejected(world: FavouritesWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/favourites_update.feature",
    name = "Oversized favourite lists are rejected"
)]
fn oversized_favourite_lists_are_rejected(world: FavouritesWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/favourites_update.feature",
    name = "Favourites cannot be set before enrolling"
)]
fn favourites_cannot_be_set_before_enrolling(world: FavouritesWorld) {
    let _ = world;
}
