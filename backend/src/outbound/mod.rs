//! Outbound adapters implementing the domain's persistence ports.
//!
//! - [`persistence`]: PostgreSQL via Diesel.
//! - [`memory`]: process-local stores for development runs and tests.

pub mod memory;
pub mod persistence;
