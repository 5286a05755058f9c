//! In-memory implementations of the liefero storage ports.
//!
//! Both stores keep their records in insertion order behind a mutex, which
//! is the order the dispatch engine's tie-breaking and the rank reporter's
//! stable sort observe. A save is the only atomic storage operation; nothing
//! spans the dispatch engine's availability check and its write.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use liefero_core::{
    model::{CityId, Delivery, DeliveryId, DeliveryOrder, Driver, DriverId},
    ports::{DeliveryLedger, DispatchError, DispatchResult, DriverDirectory},
};

fn lock<T>(mutex: &Mutex<T>) -> DispatchResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_poisoned: PoisonError<_>| DispatchError::Storage("store lock poisoned".into()))
}

/// Driver directory backed by an in-memory list.
#[derive(Default)]
pub struct MemoryDirectory {
    drivers: Mutex<Vec<Driver>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a driver to the directory.
    ///
    /// Insertion order is preserved by every query, so the order drivers are
    /// added in decides who wins least-busy ties during dispatch.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when the store lock is poisoned.
    pub fn insert(&self, driver: Driver) -> DispatchResult<()> {
        lock(&self.drivers)?.push(driver);
        Ok(())
    }
}

#[async_trait]
impl DriverDirectory for MemoryDirectory {
    async fn find_by_city(&self, city: &CityId) -> DispatchResult<Vec<Driver>> {
        Ok(lock(&self.drivers)?
            .iter()
            .filter(|driver| &driver.city == city)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> DispatchResult<Vec<Driver>> {
        Ok(lock(&self.drivers)?.clone())
    }

    async fn find_by_name(&self, name: &str) -> DispatchResult<Option<Driver>> {
        Ok(lock(&self.drivers)?
            .iter()
            .find(|driver| driver.name == name)
            .cloned())
    }
}

#[derive(Default)]
struct LedgerState {
    next_id: u64,
    deliveries: Vec<Delivery>,
}

/// Delivery ledger backed by an in-memory list.
#[derive(Default)]
pub struct MemoryLedger {
    state: Mutex<LedgerState>,
}

impl MemoryLedger {
    /// Create an empty ledger. Ids are assigned sequentially from 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DeliveryLedger for MemoryLedger {
    async fn find_by_driver(&self, driver: &DriverId) -> DispatchResult<Vec<Delivery>> {
        Ok(lock(&self.state)?
            .deliveries
            .iter()
            .filter(|delivery| &delivery.driver.id == driver)
            .cloned()
            .collect())
    }

    async fn save(&self, order: DeliveryOrder) -> DispatchResult<Delivery> {
        let mut state = lock(&self.state)?;
        state.next_id += 1;

        let delivery = Delivery {
            id: DeliveryId(state.next_id),
            driver: order.driver,
            restaurant: order.restaurant,
            customer: order.customer,
            scheduled_at: order.scheduled_at,
            distance_km: order.distance_km,
        };
        state.deliveries.push(delivery.clone());

        Ok(delivery)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use liefero_core::model::{Cities, Customer, Restaurant};

    use super::*;

    fn berlin() -> CityId {
        Cities::Berlin.into()
    }

    fn driver(id: &str, name: &str, city: CityId) -> Driver {
        Driver {
            id: DriverId(id.to_owned()),
            name: name.to_owned(),
            city,
        }
    }

    fn slot(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    fn order(driver: Driver, hour: u32, distance_km: u32) -> DeliveryOrder {
        DeliveryOrder {
            restaurant: Restaurant {
                name: "Goldener Drache".to_owned(),
                city: driver.city.clone(),
                address: "Torstraße 98".to_owned(),
            },
            customer: Customer {
                name: "Jonas".to_owned(),
                city: driver.city.clone(),
                address: "Kastanienallee 12".to_owned(),
            },
            driver,
            scheduled_at: slot(hour),
            distance_km,
        }
    }

    #[tokio::test]
    async fn save_assigns_fresh_sequential_ids() {
        let ledger = MemoryLedger::new();
        let courier = driver("d1", "Moritz", berlin());

        let first = ledger
            .save(order(courier.clone(), 12, 5))
            .await
            .expect("save");
        let second = ledger.save(order(courier, 13, 7)).await.expect("save");

        assert_eq!(first.id, DeliveryId(1), "ids start at 1");
        assert_eq!(second.id, DeliveryId(2), "ids increase per save");
        assert_eq!(second.distance_km, 7, "saved record keeps the order data");
    }

    #[tokio::test]
    async fn find_by_driver_returns_only_that_drivers_records_in_save_order() {
        let ledger = MemoryLedger::new();
        let moritz = driver("d1", "Moritz", berlin());
        let sina = driver("d2", "Sina", berlin());

        ledger
            .save(order(moritz.clone(), 12, 5))
            .await
            .expect("save");
        ledger.save(order(sina.clone(), 12, 9)).await.expect("save");
        ledger
            .save(order(moritz.clone(), 14, 2))
            .await
            .expect("save");

        let records = ledger.find_by_driver(&moritz.id).await.expect("lookup");

        assert_eq!(records.len(), 2, "other drivers' records are excluded");
        assert_eq!(records[0].scheduled_at, slot(12), "save order is kept");
        assert_eq!(records[1].scheduled_at, slot(14), "save order is kept");

        let none = ledger
            .find_by_driver(&DriverId("d9".to_owned()))
            .await
            .expect("lookup");
        assert!(none.is_empty(), "unknown driver has no deliveries");
    }

    #[tokio::test]
    async fn directory_queries_filter_and_keep_insertion_order() {
        let directory = MemoryDirectory::new();
        directory
            .insert(driver("d1", "Moritz", berlin()))
            .expect("insert");
        directory
            .insert(driver("d2", "Sina", Cities::Hamburg.into()))
            .expect("insert");
        directory
            .insert(driver("d3", "Ayse", berlin()))
            .expect("insert");

        let berliners = directory.find_by_city(&berlin()).await.expect("lookup");
        assert_eq!(berliners.len(), 2, "only Berlin drivers match");
        assert_eq!(berliners[0].name, "Moritz", "insertion order is kept");
        assert_eq!(berliners[1].name, "Ayse", "insertion order is kept");

        let all = directory.find_all().await.expect("lookup");
        assert_eq!(all.len(), 3, "find_all returns every driver");

        let sina = directory.find_by_name("Sina").await.expect("lookup");
        assert_eq!(
            sina.map(|found| found.id),
            Some(DriverId("d2".to_owned())),
            "find_by_name is an exact match"
        );

        let missing = directory.find_by_name("Nobody").await.expect("lookup");
        assert!(missing.is_none(), "unknown names yield None");
    }
}
