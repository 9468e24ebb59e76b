//! PostgreSQL adapters built on Diesel, `diesel-async` and a `bb8` pool.
//!
//! Row structs and table definitions stay private to this module; adapters
//! only hand domain types across the port boundary.

mod diesel_helpers;
mod diesel_restaurant_catalogue;
mod diesel_user_rotation_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_restaurant_catalogue::DieselRestaurantCatalogue;
pub use diesel_user_rotation_repository::DieselUserRotationRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
