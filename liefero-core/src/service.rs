//! Dispatch engine and driver rank reporting on top of the storage ports.

use std::cmp::Reverse;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::model::{
    CityId, Customer, Delivery, DeliveryOrder, Driver, DriverDistance, Restaurant,
};
use crate::ports::{DeliveryLedger, DispatchError, DispatchResult, DriverDirectory};

/// Largest distance, in kilometres, a delivery can be credited with.
pub const MAX_DELIVERY_DISTANCE_KM: u32 = 20;

/// Public entry point for dispatching orders and ranking drivers.
///
/// The random source is injected so tests can pin delivery distances with a
/// seeded generator; production code uses [`DispatchService::new`], which
/// seeds from the operating system.
pub struct DispatchService<R = StdRng> {
    directory: Arc<dyn DriverDirectory>,
    ledger: Arc<dyn DeliveryLedger>,
    rng: Mutex<R>,
}

impl DispatchService {
    /// Create a service bound to the given stores, drawing delivery
    /// distances from an OS-seeded generator.
    #[must_use]
    pub fn new(directory: Arc<dyn DriverDirectory>, ledger: Arc<dyn DeliveryLedger>) -> Self {
        Self::with_rng(directory, ledger, StdRng::from_os_rng())
    }
}

impl<R: Rng> DispatchService<R> {
    /// Create a service drawing delivery distances from the given generator.
    #[must_use]
    pub fn with_rng(
        directory: Arc<dyn DriverDirectory>,
        ledger: Arc<dyn DeliveryLedger>,
        rng: R,
    ) -> Self {
        Self {
            directory,
            ledger,
            rng: Mutex::new(rng),
        }
    }

    /// Assign the least-busy available driver in the restaurant's city and
    /// persist the resulting delivery.
    ///
    /// Availability is exact-match on the requested time: a driver already
    /// holding a delivery scheduled at precisely `scheduled_at` is skipped.
    /// Ties on delivery count go to the driver the directory lists first.
    ///
    /// Performs exactly one ledger write. There is no retry and no
    /// transaction spanning the availability check and the save, so two
    /// concurrent calls for the same time can double-book a driver.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoDriverAvailable`] when every driver in the
    /// city is booked at the requested time (or the city has none). Storage
    /// failures propagate unchanged.
    pub async fn assign(
        &self,
        customer: &Customer,
        restaurant: &Restaurant,
        scheduled_at: NaiveDateTime,
    ) -> DispatchResult<Delivery> {
        let driver = self.match_driver(restaurant, scheduled_at).await?;
        let distance_km = self.draw_distance();

        debug!(
            driver = %driver.name,
            restaurant = %restaurant.name,
            distance_km,
            "dispatching order"
        );

        self.ledger
            .save(DeliveryOrder {
                driver,
                restaurant: restaurant.clone(),
                customer: customer.clone(),
                scheduled_at,
                distance_km,
            })
            .await
    }

    /// Rank every driver by total distance driven, descending.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when a store lookup fails.
    pub async fn rank_all(&self) -> DispatchResult<Vec<DriverDistance>> {
        let drivers = self.directory.find_all().await?;
        self.rank(drivers).await
    }

    /// Rank the drivers of one city by total distance driven, descending.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] when a store lookup fails.
    pub async fn rank_by_city(&self, city: &CityId) -> DispatchResult<Vec<DriverDistance>> {
        let drivers = self.directory.find_by_city(city).await?;
        self.rank(drivers).await
    }

    async fn match_driver(
        &self,
        restaurant: &Restaurant,
        scheduled_at: NaiveDateTime,
    ) -> DispatchResult<Driver> {
        let drivers = self.directory.find_by_city(&restaurant.city).await?;

        // One ledger query per candidate covers both the availability check
        // and the least-busy comparison.
        let mut candidates = Vec::with_capacity(drivers.len());
        for driver in drivers {
            let deliveries = self.ledger.find_by_driver(&driver.id).await?;
            let booked = deliveries
                .iter()
                .any(|delivery| delivery.scheduled_at == scheduled_at);
            if !booked {
                candidates.push((driver, deliveries.len()));
            }
        }

        // min_by_key keeps the first of equally loaded drivers, so ties
        // follow directory order.
        let Some((driver, load)) = candidates.into_iter().min_by_key(|(_, load)| *load) else {
            debug!(city = %restaurant.city.0, at = %scheduled_at, "no available driver");
            return Err(DispatchError::NoDriverAvailable);
        };

        debug!(driver = %driver.name, load, "matched least-busy driver");
        Ok(driver)
    }

    async fn rank(&self, drivers: Vec<Driver>) -> DispatchResult<Vec<DriverDistance>> {
        let mut rows = Vec::with_capacity(drivers.len());
        for driver in drivers {
            let total_km = self
                .ledger
                .find_by_driver(&driver.id)
                .await?
                .iter()
                .map(|delivery| u64::from(delivery.distance_km))
                .sum();
            rows.push(DriverDistance { driver, total_km });
        }

        // Stable sort: drivers with equal totals keep their input order.
        rows.sort_by_key(|row| Reverse(row.total_km));
        Ok(rows)
    }

    fn draw_distance(&self) -> u32 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..=MAX_DELIVERY_DISTANCE_KM)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::{Cities, DeliveryId, DriverId};

    struct FakeDirectory {
        drivers: Vec<Driver>,
    }

    #[async_trait]
    impl DriverDirectory for FakeDirectory {
        async fn find_by_city(&self, city: &CityId) -> DispatchResult<Vec<Driver>> {
            Ok(self
                .drivers
                .iter()
                .filter(|driver| &driver.city == city)
                .cloned()
                .collect())
        }

        async fn find_all(&self) -> DispatchResult<Vec<Driver>> {
            Ok(self.drivers.clone())
        }

        async fn find_by_name(&self, name: &str) -> DispatchResult<Option<Driver>> {
            Ok(self.drivers.iter().find(|driver| driver.name == name).cloned())
        }
    }

    #[derive(Default)]
    struct FakeLedger {
        state: Mutex<LedgerState>,
    }

    #[derive(Default)]
    struct LedgerState {
        next_id: u64,
        deliveries: Vec<Delivery>,
    }

    #[async_trait]
    impl DeliveryLedger for FakeLedger {
        async fn find_by_driver(&self, driver: &DriverId) -> DispatchResult<Vec<Delivery>> {
            let state = self.state.lock().expect("ledger lock");
            Ok(state
                .deliveries
                .iter()
                .filter(|delivery| &delivery.driver.id == driver)
                .cloned()
                .collect())
        }

        async fn save(&self, order: DeliveryOrder) -> DispatchResult<Delivery> {
            let mut state = self.state.lock().expect("ledger lock");
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

    fn customer(city: CityId) -> Customer {
        Customer {
            name: "Jonas".to_owned(),
            city,
            address: "Kastanienallee 12".to_owned(),
        }
    }

    fn restaurant(city: CityId) -> Restaurant {
        Restaurant {
            name: "Goldener Drache".to_owned(),
            city,
            address: "Torstraße 98".to_owned(),
        }
    }

    fn slot(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    fn service(drivers: Vec<Driver>) -> DispatchService<SmallRng> {
        DispatchService::with_rng(
            Arc::new(FakeDirectory { drivers }),
            Arc::new(FakeLedger::default()),
            SmallRng::seed_from_u64(42),
        )
    }

    async fn preload(
        service: &DispatchService<SmallRng>,
        driver: &Driver,
        scheduled_at: NaiveDateTime,
        distance_km: u32,
    ) {
        service
            .ledger
            .save(DeliveryOrder {
                driver: driver.clone(),
                restaurant: restaurant(driver.city.clone()),
                customer: customer(driver.city.clone()),
                scheduled_at,
                distance_km,
            })
            .await
            .expect("preload delivery");
    }

    #[tokio::test]
    async fn city_without_drivers_yields_no_driver_available() {
        let service = service(vec![driver("d1", "Moritz", Cities::Hamburg.into())]);

        let result = service
            .assign(&customer(berlin()), &restaurant(berlin()), slot(12))
            .await;

        assert!(
            matches!(result, Err(DispatchError::NoDriverAvailable)),
            "expected NoDriverAvailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn driver_booked_at_requested_time_is_skipped() {
        let courier = driver("d1", "Moritz", berlin());
        let service = service(vec![courier.clone()]);
        preload(&service, &courier, slot(12), 5).await;

        let result = service
            .assign(&customer(berlin()), &restaurant(berlin()), slot(12))
            .await;

        assert!(
            matches!(result, Err(DispatchError::NoDriverAvailable)),
            "a driver booked at the exact time must not be matched, got {result:?}"
        );
    }

    #[tokio::test]
    async fn free_driver_is_assigned_and_persisted() {
        let courier = driver("d1", "Moritz", berlin());
        let service = service(vec![courier.clone()]);
        preload(&service, &courier, slot(12), 5).await;

        let delivery = service
            .assign(&customer(berlin()), &restaurant(berlin()), slot(18))
            .await
            .expect("driver is free at 18:00");

        assert_eq!(delivery.driver, courier, "sole free driver must be picked");
        assert_eq!(delivery.scheduled_at, slot(18), "requested time is kept");
        assert_eq!(
            delivery.customer,
            customer(berlin()),
            "customer is recorded on the delivery"
        );

        let recorded = service
            .ledger
            .find_by_driver(&courier.id)
            .await
            .expect("ledger lookup");
        assert_eq!(recorded.len(), 2, "assign writes exactly one new record");
    }

    #[tokio::test]
    async fn least_busy_driver_wins() {
        let busy = driver("d1", "Moritz", berlin());
        let relaxed = driver("d2", "Sina", berlin());
        let service = service(vec![busy.clone(), relaxed.clone()]);
        preload(&service, &busy, slot(12), 5).await;
        preload(&service, &busy, slot(13), 5).await;
        preload(&service, &relaxed, slot(12), 5).await;

        let delivery = service
            .assign(&customer(berlin()), &restaurant(berlin()), slot(18))
            .await
            .expect("both drivers are free at 18:00");

        assert_eq!(
            delivery.driver, relaxed,
            "driver with fewer deliveries must be picked"
        );
    }

    #[tokio::test]
    async fn equal_load_keeps_directory_order() {
        let first = driver("d1", "Moritz", berlin());
        let second = driver("d2", "Sina", berlin());
        let service = service(vec![first.clone(), second]);

        let delivery = service
            .assign(&customer(berlin()), &restaurant(berlin()), slot(12))
            .await
            .expect("both drivers are idle");

        assert_eq!(
            delivery.driver, first,
            "ties on load go to the driver listed first"
        );
    }

    #[tokio::test]
    async fn distance_stays_within_limits() {
        let courier = driver("d1", "Moritz", berlin());
        let service = service(vec![courier]);

        for hour in 8..18 {
            let delivery = service
                .assign(&customer(berlin()), &restaurant(berlin()), slot(hour))
                .await
                .expect("driver is free at every fresh slot");
            assert!(
                delivery.distance_km <= MAX_DELIVERY_DISTANCE_KM,
                "distance {} exceeds the {MAX_DELIVERY_DISTANCE_KM} km cap",
                delivery.distance_km
            );
        }
    }

    #[tokio::test]
    async fn rank_all_sorts_by_total_distance_descending() {
        let eli = driver("d1", "Eli", berlin());
        let dafna = driver("d2", "Dafna", berlin());
        let david = driver("d3", "David", berlin());
        let service = service(vec![dafna.clone(), david.clone(), eli.clone()]);
        preload(&service, &eli, slot(10), 10).await;
        preload(&service, &eli, slot(11), 10).await;
        preload(&service, &dafna, slot(10), 5).await;
        preload(&service, &dafna, slot(11), 5).await;
        preload(&service, &david, slot(10), 2).await;
        preload(&service, &david, slot(11), 2).await;

        let report = service.rank_all().await.expect("rank report");

        let totals: Vec<u64> = report.iter().map(|row| row.total_km).collect();
        assert_eq!(totals, vec![20, 10, 4], "totals must be descending");
        assert_eq!(report[0].driver, eli, "largest total ranks first");
    }

    #[tokio::test]
    async fn rank_ties_keep_input_order_and_idle_drivers_report_zero() {
        let first = driver("d1", "Moritz", berlin());
        let second = driver("d2", "Sina", berlin());
        let idle = driver("d3", "Ayse", berlin());
        let service = service(vec![first.clone(), second.clone(), idle.clone()]);
        preload(&service, &first, slot(10), 7).await;
        preload(&service, &second, slot(10), 7).await;

        let report = service.rank_all().await.expect("rank report");

        assert_eq!(report[0].driver, first, "equal totals keep directory order");
        assert_eq!(report[1].driver, second, "equal totals keep directory order");
        assert_eq!(report[2].driver, idle, "idle driver ranks last");
        assert_eq!(report[2].total_km, 0, "no deliveries sums to zero");
    }

    #[tokio::test]
    async fn rank_by_city_excludes_other_cities() {
        let local = driver("d1", "Moritz", berlin());
        let remote = driver("d2", "Sina", Cities::Hamburg.into());
        let service = service(vec![local.clone(), remote.clone()]);
        preload(&service, &local, slot(10), 3).await;
        preload(&service, &remote, slot(10), 9).await;

        let report = service.rank_by_city(&berlin()).await.expect("rank report");

        assert_eq!(report.len(), 1, "only Berlin drivers are ranked");
        assert_eq!(report[0].driver, local, "the Berlin driver is listed");
        assert_eq!(report[0].total_km, 3, "total covers only own deliveries");
    }
}
