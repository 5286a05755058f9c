//! Traits describing the storage collaborators the dispatch service relies on.

use async_trait::async_trait;

use crate::model::{CityId, Delivery, DeliveryOrder, Driver, DriverId};

#[derive(thiserror::Error, Debug)]
/// Errors surfaced by the dispatch service and its storage ports.
pub enum DispatchError {
    /// No driver in the restaurant's city is free at the requested time.
    #[error("There are no available drivers")]
    NoDriverAvailable,
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Shorthand for results carrying a [`DispatchError`].
pub type DispatchResult<T> = Result<T, DispatchError>;

#[async_trait]
/// Lookup of drivers, keyed by city.
pub trait DriverDirectory: Send + Sync {
    /// All drivers operating in the given city.
    ///
    /// The returned order is the store's insertion order and is observable:
    /// the dispatch engine breaks least-busy ties in favour of the driver
    /// listed first.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the backend lookup fails.
    async fn find_by_city(&self, city: &CityId) -> DispatchResult<Vec<Driver>>;

    /// Every driver in the directory, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the backend lookup fails.
    async fn find_all(&self) -> DispatchResult<Vec<Driver>>;

    /// Look up a single driver by exact name.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the backend lookup fails.
    async fn find_by_name(&self, name: &str) -> DispatchResult<Option<Driver>>;
}

#[async_trait]
/// Lookup and storage of delivery records.
pub trait DeliveryLedger: Send + Sync {
    /// All deliveries referencing the given driver, in save order.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the backend lookup fails.
    async fn find_by_driver(&self, driver: &DriverId) -> DispatchResult<Vec<Delivery>>;

    /// Persist an order, assigning it a fresh [`DeliveryId`].
    ///
    /// This is the only write the dispatch engine performs; there is no
    /// transaction spanning the availability check and the save.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the write fails. The failure is
    /// propagated to the dispatch caller unchanged.
    ///
    /// [`DeliveryId`]: crate::model::DeliveryId
    async fn save(&self, order: DeliveryOrder) -> DispatchResult<Delivery>;
}
