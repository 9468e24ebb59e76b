//! Domain ports for the hexagonal boundary.
//!
//! Outbound ports (`RestaurantCatalogue`, `UserRotationRepository`) are
//! implemented by persistence adapters. Driving ports (`RotationQuery`,
//! `FavouritesCommand`, `RotationEnrolment`, `RotationRecomputation`) are
//! implemented by [`RotationService`](crate::domain::RotationService) and
//! consumed by the HTTP adapter and the scheduler.

mod macros;
pub(crate) use macros::define_port_error;

mod favourites_command;
mod restaurant_catalogue;
mod rotation_enrolment;
mod rotation_query;
mod rotation_recomputation;
mod user_rotation_repository;

pub use favourites_command::FavouritesCommand;
#[cfg(test)]
pub use favourites_command::MockFavouritesCommand;
#[cfg(test)]
pub use restaurant_catalogue::MockRestaurantCatalogue;
pub use restaurant_catalogue::{RestaurantCatalogue, RestaurantCatalogueError};
#[cfg(test)]
pub use rotation_enrolment::MockRotationEnrolment;
pub use rotation_enrolment::RotationEnrolment;
#[cfg(test)]
pub use rotation_query::MockRotationQuery;
pub use rotation_query::RotationQuery;
#[cfg(test)]
pub use rotation_recomputation::MockRotationRecomputation;
pub use rotation_recomputation::RotationRecomputation;
#[cfg(test)]
pub use user_rotation_repository::MockUserRotationRepository;
pub use user_rotation_repository::{UserRotationRepository, UserRotationRepositoryError};
