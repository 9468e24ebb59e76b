//! Request middleware.
//!
//! [`Trace`] scopes a [`TraceId`](crate::domain::TraceId) around every
//! request so domain errors and log lines carry the same identifier.

pub mod trace;

pub use trace::Trace;
