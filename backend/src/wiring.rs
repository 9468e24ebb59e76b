//! Adapter selection and service assembly shared by the server and the
//! `rotation-pass` binary.
//!
//! With a database URL the Diesel adapters back the rotation service;
//! without one the process runs on in-memory stores, optionally seeded with
//! a catalogue file.

use std::path::Path;
use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use crate::domain::ports::{RestaurantCatalogue, UserRotationRepository};
use crate::domain::{
    EntropyRandomness, RestaurantRef, RotationService, RotationServiceConfig,
    RotationServiceRuntime, RotationSchedulerPorts,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryUserRotationRepository, StaticRestaurantCatalogue};
use crate::outbound::persistence::{
    DbPool, DieselRestaurantCatalogue, DieselUserRotationRepository, MigrationError, PoolConfig,
    PoolError, run_pending_migrations,
};
use crate::settings::AppSettings;

/// Startup failures while assembling adapters.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Migrations(#[from] MigrationError),
    #[error("failed to read catalogue file {path}: {message}")]
    CatalogueFile { path: String, message: String },
}

/// Everything the entry points need from one rotation service instance.
pub struct RotationWiring {
    pub http_state: HttpState,
    pub scheduler_ports: RotationSchedulerPorts,
}

/// Assemble one [`RotationService`] over `repository` and `catalogue` and
/// hand out its ports.
pub fn wire_rotation<R, C>(
    repository: Arc<R>,
    catalogue: Arc<C>,
    runtime: RotationServiceRuntime,
    config: RotationServiceConfig,
) -> RotationWiring
where
    R: UserRotationRepository + 'static,
    C: RestaurantCatalogue + 'static,
{
    let service = Arc::new(RotationService::new(
        repository.clone(),
        catalogue.clone(),
        runtime,
        config,
    ));
    RotationWiring {
        http_state: HttpState::from_service(service.clone(), catalogue),
        scheduler_ports: RotationSchedulerPorts::new(repository, service),
    }
}

fn production_runtime() -> RotationServiceRuntime {
    RotationServiceRuntime {
        clock: Arc::new(DefaultClock),
        randomness: Arc::new(EntropyRandomness),
    }
}

/// Load a JSON array of restaurants for the in-memory catalogue.
///
/// # Errors
///
/// [`WiringError::CatalogueFile`] when the file is unreadable or malformed.
pub fn load_catalogue_file(path: &Path) -> Result<Vec<RestaurantRef>, WiringError> {
    let failure = |message: String| WiringError::CatalogueFile {
        path: path.display().to_string(),
        message,
    };
    let bytes = std::fs::read(path).map_err(|error| failure(error.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|error| failure(error.to_string()))
}

/// Pick adapters according to `settings`.
///
/// # Errors
///
/// Fails when the pool cannot be built, migrations fail, or the catalogue
/// file cannot be loaded.
pub async fn wire_from_settings(settings: &AppSettings) -> Result<RotationWiring, WiringError> {
    let config = settings.service_config();
    match settings.database_url.as_deref() {
        Some(url) => {
            if settings.run_migrations {
                let applied = run_pending_migrations(url).await?;
                info!(applied, "database migrations complete");
            }
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            info!("using PostgreSQL rotation store");
            Ok(wire_rotation(
                Arc::new(DieselUserRotationRepository::new(pool.clone())),
                Arc::new(DieselRestaurantCatalogue::new(pool)),
                production_runtime(),
                config,
            ))
        }
        None => {
            let restaurants = match settings.catalogue_file.as_deref() {
                Some(path) => load_catalogue_file(path)?,
                None => Vec::new(),
            };
            warn!(
                restaurants = restaurants.len(),
                "no database configured; rotations are kept in memory"
            );
            Ok(wire_rotation(
                Arc::new(InMemoryUserRotationRepository::default()),
                Arc::new(StaticRestaurantCatalogue::new(restaurants)),
                production_runtime(),
                config,
            ))
        }
    }
}
