// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Test fixtures

use crate::models::{
    DeliveredParcel, Delivery, Location, Money, Order, Parcel, ParcelCategory, Shop, User,
};
use crate::status::Reported;
use chrono::{NaiveDate, NaiveDateTime};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn ts(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, min, sec).unwrap()
}

pub fn parcel(id: &str, status: &str, created_at: NaiveDateTime) -> Parcel {
    Parcel {
        id: id.to_string(),
        tracking_number: format!("TRK-{}", id),
        name: format!("Colis {}", id),
        description: String::new(),
        category: Some(ParcelCategory::Single),
        status: Reported::parse(status),
        sender: Location::new("Ratoma", "Kipé"),
        recipient: Location::new("Matoto", "Kissosso"),
        recipient_name: None,
        recipient_phone: None,
        pickup_at: None,
        dropoff_at: None,
        door_fee: None,
        items: Vec::new(),
        created_at,
    }
}

pub fn order(id: &str, amount: i64, status: &str, created_at: NaiveDateTime) -> Order {
    Order {
        id: id.to_string(),
        amount: Money::gnf(amount),
        status: Reported::parse(status),
        created_at,
    }
}

pub fn delivery(
    id: &str,
    status: &str,
    created_at: NaiveDateTime,
    parcel: Option<DeliveredParcel>,
) -> Delivery {
    Delivery {
        id: id.to_string(),
        status: Reported::parse(status),
        parcel,
        created_at,
    }
}

pub fn delivered_parcel(door_fee: Option<i64>) -> DeliveredParcel {
    DeliveredParcel {
        id: None,
        tracking_number: None,
        name: None,
        door_fee: door_fee.map(Money::gnf),
        items: Vec::new(),
    }
}

pub fn user(id: &str, phone: &str) -> User {
    User {
        id: id.to_string(),
        phone_number: phone.to_string(),
        name: "Mariama Bah".to_string(),
        shops: vec![Shop {
            id: format!("shop-{}", id),
            name: "Boutique Kipé".to_string(),
            location: Location::new("Ratoma", "Kipé"),
            address: "Route du Prince".to_string(),
        }],
    }
}
