//! Core types and service wiring for the liefero delivery dispatcher.

/// Domain models and identifiers shared by all stores.
pub mod model;
/// Traits describing the storage interfaces.
pub mod ports;
/// Dispatch engine and rank reporting used by clients.
pub mod service;

pub use model::*;
pub use ports::*;
pub use service::*;
