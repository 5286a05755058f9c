use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use liefero_core::{
    model::{CityId, Customer, Delivery, DriverDistance, Restaurant},
    service::DispatchService,
};

use crate::fleet::Fleet;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    CitySelect,
    Dispatch,
    RankReport,
}

pub(crate) struct App {
    pub service: Arc<DispatchService>,

    pub screen: Screen,
    pub cities: Vec<(CityId, String)>,
    pub city_list_index: usize,
    pub selected_city: Option<CityId>,

    pub restaurants: Vec<Restaurant>,
    pub restaurant_list_index: usize,
    pub customers: Vec<Customer>,
    pub customer_index: usize,

    pub slot_base: NaiveDateTime,
    pub slot_offset_hours: i64,

    pub recent: Vec<Delivery>,
    pub rank_rows: Vec<DriverDistance>,
    pub rank_city_only: bool,

    pub is_loading: bool,
    pub error_message: Option<String>,

    fleet: Fleet,
}

impl App {
    pub(crate) fn new(service: Arc<DispatchService>, fleet: Fleet) -> Self {
        let cities = fleet.cities.clone();
        Self {
            service,
            screen: Screen::CitySelect,
            cities,
            city_list_index: 0,
            selected_city: None,
            restaurants: Vec::new(),
            restaurant_list_index: 0,
            customers: Vec::new(),
            customer_index: 0,
            slot_base: next_full_hour(),
            slot_offset_hours: 0,
            recent: Vec::new(),
            rank_rows: Vec::new(),
            rank_city_only: true,
            is_loading: false,
            error_message: None,
            fleet,
        }
    }

    pub(crate) fn select_current_city(&mut self) {
        if let Some((id, _name)) = self.cities.get(self.city_list_index) {
            let city = id.clone();
            self.restaurants = self
                .fleet
                .restaurants
                .iter()
                .filter(|restaurant| restaurant.city == city)
                .cloned()
                .collect();
            self.customers = self
                .fleet
                .customers
                .iter()
                .filter(|customer| customer.city == city)
                .cloned()
                .collect();
            self.restaurant_list_index = 0;
            self.customer_index = 0;
            self.selected_city = Some(city);
            self.screen = Screen::Dispatch;
        }
    }

    /// The delivery time the next dispatch will request. Whole-hour slots
    /// keep repeated dispatches comparable, which is what makes a fully
    /// booked slot observable in the demo.
    pub(crate) fn current_slot(&self) -> NaiveDateTime {
        self.slot_base + Duration::hours(self.slot_offset_hours)
    }

    pub(crate) fn current_restaurant(&self) -> Option<&Restaurant> {
        self.restaurants.get(self.restaurant_list_index)
    }

    pub(crate) fn current_customer(&self) -> Option<&Customer> {
        self.customers.get(self.customer_index)
    }

    pub(crate) fn advance_customer(&mut self) {
        if self.customer_index + 1 < self.customers.len() {
            self.customer_index += 1;
        } else {
            self.customer_index = 0;
        }
    }

    pub(crate) fn selected_city_name(&self) -> &str {
        self.selected_city
            .as_ref()
            .and_then(|selected| {
                self.cities
                    .iter()
                    .find(|(city, _)| city == selected)
                    .map(|(_, name)| name.as_str())
            })
            .unwrap_or("<no city>")
    }
}

fn next_full_hour() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.date()
        .and_hms_opt(now.hour(), 0, 0)
        .unwrap_or(now)
        + Duration::hours(1)
}
