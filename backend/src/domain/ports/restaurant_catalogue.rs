//! Outbound port for reading the restaurant catalogue.

use async_trait::async_trait;

use crate::domain::RestaurantRef;

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue adapters.
    pub enum RestaurantCatalogueError {
        /// The catalogue store could not be reached.
        Connection { message: String } => "restaurant catalogue connection failed: {message}",
        /// The catalogue query failed or returned unusable rows.
        Query { message: String } => "restaurant catalogue query failed: {message}",
    }
}

impl RestaurantCatalogueError {
    /// Whether retrying the read may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Read-only access to every restaurant eligible for rotations.
///
/// The catalogue is small enough to load in one call; adapters return rows
/// in a stable order but callers must not depend on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantCatalogue: Send + Sync {
    /// Load the full catalogue.
    async fn list_all(&self) -> Result<Vec<RestaurantRef>, RestaurantCatalogueError>;
}
