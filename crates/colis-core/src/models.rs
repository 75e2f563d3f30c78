// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Domain records
//
// These are the canonical, normalized shapes. Everything the backend sends
// is converted into them by the api module; nothing else sees wire casing.

use crate::aggregate::Tracked;
use crate::range::Timestamped;
use crate::status::{DeliveryStatus, OrderStatus, ParcelStatus, Reported};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// An amount in Guinean francs. The currency has no minor unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn gnf(amount: i64) -> Self {
        Money(amount)
    }

    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Round a JSON number to whole francs
    pub fn from_f64(amount: f64) -> Self {
        Money(amount.round() as i64)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{} GNF", grouped)
        } else {
            write!(f, "{} GNF", grouped)
        }
    }
}

/// Kind of shipment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelCategory {
    Single,
    Multiple,
    Cargo,
    Express,
}

impl ParcelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Multiple => "MULTIPLE",
            Self::Cargo => "CARGO",
            Self::Express => "EXPRESS",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SINGLE" => Some(Self::Single),
            "MULTIPLE" => Some(Self::Multiple),
            "CARGO" => Some(Self::Cargo),
            "EXPRESS" => Some(Self::Express),
            _ => None,
        }
    }
}

impl fmt::Display for ParcelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commune and quartier used for pickup and delivery addressing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub zone: String,
    pub sub_zone: String,
}

impl Location {
    pub fn new(zone: impl Into<String>, sub_zone: impl Into<String>) -> Self {
        Self {
            zone: zone.into(),
            sub_zone: sub_zone.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.zone.trim().is_empty() || self.sub_zone.trim().is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.sub_zone, self.zone)
    }
}

/// One package of a MULTIPLE request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelItem {
    pub destination: Option<Location>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    /// Amount collected from the recipient at the door
    pub door_fee: Option<Money>,
}

/// A single shipment request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parcel {
    pub id: String,
    pub tracking_number: String,
    pub name: String,
    pub description: String,
    pub category: Option<ParcelCategory>,
    pub status: Reported<ParcelStatus>,
    pub sender: Location,
    pub recipient: Location,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub pickup_at: Option<NaiveDateTime>,
    pub dropoff_at: Option<NaiveDateTime>,
    /// Amount collected from the recipient at the door
    pub door_fee: Option<Money>,
    pub items: Vec<ParcelItem>,
    /// Local wall-clock creation time
    pub created_at: NaiveDateTime,
}

impl Parcel {
    /// Door fees owed on this parcel, including every package of a MULTIPLE request
    pub fn door_fees(&self) -> Money {
        self.door_fee.unwrap_or_default()
            + self.items.iter().filter_map(|item| item.door_fee).sum::<Money>()
    }
}

/// A billing record, decoupled from fulfillment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub amount: Money,
    pub status: Reported<OrderStatus>,
    pub created_at: NaiveDateTime,
}

/// The parcel fields a delivery record embeds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveredParcel {
    pub id: Option<String>,
    pub tracking_number: Option<String>,
    pub name: Option<String>,
    pub door_fee: Option<Money>,
    pub items: Vec<ParcelItem>,
}

impl DeliveredParcel {
    pub fn door_fees(&self) -> Money {
        self.door_fee.unwrap_or_default()
            + self.items.iter().filter_map(|item| item.door_fee).sum::<Money>()
    }
}

/// The fulfillment record tracking a parcel's physical movement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub id: String,
    pub status: Reported<DeliveryStatus>,
    pub parcel: Option<DeliveredParcel>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub phone_number: String,
    pub name: String,
    pub shops: Vec<Shop>,
}

impl User {
    /// The shop requests are filed under. Users have one shop in practice.
    pub fn primary_shop(&self) -> Option<&Shop> {
        self.shops.first()
    }
}

impl Timestamped for Parcel {
    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl Tracked for Parcel {
    type Status = ParcelStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &Reported<ParcelStatus> {
        &self.status
    }
}

impl Timestamped for Order {
    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl Tracked for Order {
    type Status = OrderStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &Reported<OrderStatus> {
        &self.status
    }
}

impl Timestamped for Delivery {
    fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl Tracked for Delivery {
    type Status = DeliveryStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &Reported<DeliveryStatus> {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_display_groups_thousands() {
        assert_eq!(Money::gnf(0).to_string(), "0 GNF");
        assert_eq!(Money::gnf(950).to_string(), "950 GNF");
        assert_eq!(Money::gnf(10_000).to_string(), "10 000 GNF");
        assert_eq!(Money::gnf(1_250_000).to_string(), "1 250 000 GNF");
        assert_eq!(Money::gnf(-15_000).to_string(), "-15 000 GNF");
    }

    #[test]
    fn test_money_from_json_number() {
        assert_eq!(Money::from_f64(15000.0), Money::gnf(15_000));
        assert_eq!(Money::from_f64(2499.6), Money::gnf(2_500));
        let total: Money = [Money::gnf(1), Money::gnf(2)].into_iter().sum();
        assert_eq!(total, Money::gnf(3));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(ParcelCategory::parse("express"), Some(ParcelCategory::Express));
        assert_eq!(ParcelCategory::parse("CARGO"), Some(ParcelCategory::Cargo));
        assert_eq!(ParcelCategory::parse("BULK"), None);
    }

    #[test]
    fn test_delivered_parcel_door_fees_include_items() {
        let parcel = DeliveredParcel {
            id: None,
            tracking_number: None,
            name: None,
            door_fee: Some(Money::gnf(5_000)),
            items: vec![
                ParcelItem {
                    destination: None,
                    recipient_name: None,
                    recipient_phone: None,
                    door_fee: Some(Money::gnf(2_000)),
                },
                ParcelItem {
                    destination: None,
                    recipient_name: None,
                    recipient_phone: None,
                    door_fee: None,
                },
            ],
        };
        assert_eq!(parcel.door_fees(), Money::gnf(7_000));
    }
}
