//! Domain data structures for cities, drivers, restaurants, and deliveries.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Built-in cities served by the demo fleet.
pub enum Cities {
    /// Berlin, Germany.
    Berlin,
    /// Hamburg, Germany.
    Hamburg,
    /// Munich, Germany.
    Munich,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a city known to liefero.
pub struct CityId(pub String);

impl fmt::Display for Cities {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Cities::Berlin => "berlin",
            Cities::Hamburg => "hamburg",
            Cities::Munich => "munich",
        };
        write!(formatter, "{slug}")
    }
}

impl From<Cities> for CityId {
    fn from(city: Cities) -> Self {
        CityId(city.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a driver in the directory.
pub struct DriverId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A courier operating within exactly one city.
pub struct Driver {
    /// Unique identifier used by the ledger to reference deliveries.
    pub id: DriverId,
    /// Human-friendly name.
    pub name: String,
    /// City the driver operates in.
    pub city: CityId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A customer placing delivery orders.
pub struct Customer {
    /// Human-friendly name.
    pub name: String,
    /// City the customer lives in.
    pub city: CityId,
    /// Street address deliveries go to.
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A restaurant deliveries are picked up from.
pub struct Restaurant {
    /// Human-friendly name.
    pub name: String,
    /// City the restaurant is located in.
    pub city: CityId,
    /// Street address pickups happen at.
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Persistent identity of a delivery, assigned by the ledger on save.
pub struct DeliveryId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A delivery record before it has been persisted.
///
/// Constructed by the dispatch engine once a driver has been matched; the
/// ledger turns it into a [`Delivery`] by assigning a [`DeliveryId`].
pub struct DeliveryOrder {
    /// Driver matched to the order.
    pub driver: Driver,
    /// Restaurant the order is picked up from.
    pub restaurant: Restaurant,
    /// Customer the order is delivered to.
    pub customer: Customer,
    /// Requested delivery time.
    pub scheduled_at: NaiveDateTime,
    /// Distance driven for the delivery, in whole kilometres.
    pub distance_km: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A persisted delivery. Immutable once saved.
pub struct Delivery {
    /// Ledger-assigned identity.
    pub id: DeliveryId,
    /// Driver carrying out the delivery.
    pub driver: Driver,
    /// Restaurant the order was picked up from.
    pub restaurant: Restaurant,
    /// Customer the order was delivered to.
    pub customer: Customer,
    /// Requested delivery time. A driver with a delivery at exactly this
    /// time counts as busy for further requests at the same time.
    pub scheduled_at: NaiveDateTime,
    /// Distance driven for the delivery, in whole kilometres.
    pub distance_km: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Report row pairing a driver with the total distance it has driven.
///
/// Derived from the ledger on demand; never persisted.
pub struct DriverDistance {
    /// The ranked driver.
    pub driver: Driver,
    /// Sum of [`Delivery::distance_km`] over all of the driver's deliveries.
    pub total_km: u64,
}
