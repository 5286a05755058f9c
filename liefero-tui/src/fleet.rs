//! Demo fleet seeded into the in-memory stores at startup.

use liefero_core::model::{Cities, CityId, Customer, Driver, DriverId, Restaurant};
use liefero_core::ports::DispatchResult;
use liefero_store_memory::MemoryDirectory;

/// Static reference data the UI offers for dispatching.
pub(crate) struct Fleet {
    pub cities: Vec<(CityId, String)>,
    pub restaurants: Vec<Restaurant>,
    pub customers: Vec<Customer>,
}

/// Register the demo drivers with the directory and return the reference
/// data for the UI.
pub(crate) fn seed(directory: &MemoryDirectory) -> DispatchResult<Fleet> {
    let berlin = CityId::from(Cities::Berlin);
    let hamburg = CityId::from(Cities::Hamburg);
    let munich = CityId::from(Cities::Munich);

    let drivers = [
        driver("drv-01", "Moritz", &berlin),
        driver("drv-02", "Sina", &berlin),
        driver("drv-03", "Ayse", &berlin),
        driver("drv-04", "Jakob", &hamburg),
        driver("drv-05", "Leonie", &hamburg),
        driver("drv-06", "Tarik", &munich),
        driver("drv-07", "Franzi", &munich),
    ];
    for courier in drivers {
        directory.insert(courier)?;
    }

    Ok(Fleet {
        cities: vec![
            (berlin.clone(), "Berlin".to_owned()),
            (hamburg.clone(), "Hamburg".to_owned()),
            (munich.clone(), "München".to_owned()),
        ],
        restaurants: vec![
            restaurant("Goldener Drache", &berlin, "Torstraße 98"),
            restaurant("Trattoria Fontana", &berlin, "Boxhagener Straße 31"),
            restaurant("Elbblick Sushi", &hamburg, "Große Elbstraße 14"),
            restaurant("Curry Pavillon", &hamburg, "Schulterblatt 73"),
            restaurant("Wirtshaus Sendling", &munich, "Lindwurmstraße 205"),
        ],
        customers: vec![
            customer("Jonas", &berlin, "Kastanienallee 12"),
            customer("Helga", &berlin, "Karl-Marx-Allee 101"),
            customer("Pavel", &hamburg, "Eppendorfer Weg 55"),
            customer("Miriam", &hamburg, "Osterstraße 8"),
            customer("Resi", &munich, "Fraunhoferstraße 19"),
        ],
    })
}

fn driver(id: &str, name: &str, city: &CityId) -> Driver {
    Driver {
        id: DriverId(id.to_owned()),
        name: name.to_owned(),
        city: city.clone(),
    }
}

fn restaurant(name: &str, city: &CityId, address: &str) -> Restaurant {
    Restaurant {
        name: name.to_owned(),
        city: city.clone(),
        address: address.to_owned(),
    }
}

fn customer(name: &str, city: &CityId, address: &str) -> Customer {
    Customer {
        name: name.to_owned(),
        city: city.clone(),
        address: address.to_owned(),
    }
}
