//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be exercised against mocks or in-memory adapters.

use std::sync::Arc;

use crate::domain::ports::{
    FavouritesCommand, RestaurantCatalogue, RotationEnrolment, RotationQuery,
};

/// Port implementations backing the HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub rotations: Arc<dyn RotationQuery>,
    pub favourites: Arc<dyn FavouritesCommand>,
    pub enrolment: Arc<dyn RotationEnrolment>,
    pub catalogue: Arc<dyn RestaurantCatalogue>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub rotations: Arc<dyn RotationQuery>,
    pub favourites: Arc<dyn FavouritesCommand>,
    pub enrolment: Arc<dyn RotationEnrolment>,
    pub catalogue: Arc<dyn RestaurantCatalogue>,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            rotations,
            favourites,
            enrolment,
            catalogue,
        } = ports;
        Self {
            rotations,
            favourites,
            enrolment,
            catalogue,
        }
    }

    /// Wire all driving ports to one service implementing them together.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use munch_backend::domain::{
    ///     EntropyRandomness, RotationService, RotationServiceConfig, RotationServiceRuntime,
    /// };
    /// use munch_backend::inbound::http::state::HttpState;
    /// use munch_backend::outbound::memory::{
    ///     InMemoryUserRotationRepository, StaticRestaurantCatalogue,
    /// };
    ///
    /// let catalogue = Arc::new(StaticRestaurantCatalogue::default());
    /// let service = Arc::new(RotationService::new(
    ///     Arc::new(InMemoryUserRotationRepository::default()),
    ///     catalogue.clone(),
    ///     RotationServiceRuntime {
    ///         clock: Arc::new(DefaultClock),
    ///         randomness: Arc::new(EntropyRandomness),
    ///     },
    ///     RotationServiceConfig::default(),
    /// ));
    /// let state = HttpState::from_service(service, catalogue);
    /// # let _ = state;
    /// ```
    pub fn from_service<S>(service: Arc<S>, catalogue: Arc<dyn RestaurantCatalogue>) -> Self
    where
        S: RotationQuery + FavouritesCommand + RotationEnrolment + 'static,
    {
        Self::new(HttpStatePorts {
            rotations: service.clone(),
            favourites: service.clone(),
            enrolment: service,
            catalogue,
        })
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
