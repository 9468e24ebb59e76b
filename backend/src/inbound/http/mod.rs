//! HTTP inbound adapter exposing the rotation REST endpoints.

pub mod error;
pub mod favourites;
pub mod health;
pub mod restaurants;
pub mod rotations;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;
