//! Domain primitives, services and ports.
//!
//! Purpose: model restaurant rotations independently of transport and
//! storage. Types document their invariants and serialisation contracts in
//! their own Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `RestaurantRef`, `Favourites`, `Rotation`, `UserRotationState`: the
//!   rotation aggregate.
//! - `select_rotation`: pure selection over a catalogue snapshot.
//! - `RotationService`: implements the driving ports in [`ports`].
//! - `RotationScheduler`: weekly recomputation over every user.

pub mod error;
pub mod ports;
mod randomness;
mod restaurant;
mod rotation;
pub mod rotation_scheduler;
mod rotation_selector;
mod rotation_service;
mod trace_id;
pub mod user;
mod user_locks;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::randomness::{EntropyRandomness, RotationRandomness, SeededRandomness};
pub use self::restaurant::{AssetId, AssetIdValidationError, RestaurantId, RestaurantRef};
pub use self::rotation::{
    Favourites, ROTATION_SIZE, Rotation, RotationEntry, RotationInvariantError,
    UserRotationState,
};
pub use self::rotation_scheduler::{
    BackoffJitter, CadenceError, RandomJitter, RotationCadence, RotationPassReport,
    RotationScheduler, RotationSchedulerConfig, RotationSchedulerPorts,
    RotationSchedulerRuntime, RotationSleeper, TokioSleeper, UserRecomputeFailure,
};
pub use self::rotation_selector::{RotationSelection, select_rotation};
pub use self::rotation_service::{
    DEFAULT_CATALOGUE_TIMEOUT, RotationService, RotationServiceConfig, RotationServiceRuntime,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserValidationError};
pub use self::user_locks::{UserLockGuard, UserLocks};

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use munch_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
