// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Backend JSON shapes
//
// The backend is not consistent about casing or nesting. Every quirk is
// absorbed here; the rest of the crate only sees the models module.

use crate::forms::{NewMultipleRequest, NewRequest, ShopUpdate};
use crate::models::{
    DeliveredParcel, Delivery, Location, Money, Order, Parcel, ParcelCategory, ParcelItem, Shop,
    User,
};
use crate::status::{Reported, StatusKind};
use crate::types::AppError;
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireShop {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub commune: String,
    #[serde(default)]
    pub quartier: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireUser {
    pub id: String,
    pub phone_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub shops: Vec<WireShop>,
}

/// A package of a MULTIPLE request. Older records list packages flat,
/// newer ones group them under their destination.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireItem {
    pub delivery_commune: Option<String>,
    pub delivery_quartier: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    #[serde(default)]
    pub is_fee_at_door: bool,
    pub fee_at_door: Option<f64>,
    #[serde(default)]
    pub packages: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireParcel {
    pub id: String,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parcel_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sender_commune: String,
    #[serde(default)]
    pub sender_quartier: String,
    #[serde(default)]
    pub delivery_commune: String,
    #[serde(default)]
    pub delivery_quartier: String,
    pub recipient_name: Option<String>,
    pub recipient_phone: Option<String>,
    pub pickup_date: Option<String>,
    pub dropoff_date: Option<String>,
    #[serde(default)]
    pub is_fee_at_door: bool,
    pub fee_at_door: Option<f64>,
    #[serde(default)]
    pub parcels_in_multiple: Vec<WireItem>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrder {
    pub id: String,
    pub amount: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireDeliveredParcel {
    pub id: Option<String>,
    pub tracking_number: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub is_fee_at_door: bool,
    pub fee_at_door: Option<f64>,
    #[serde(default)]
    pub parcels_in_multiple: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireDelivery {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    pub parcel: Option<WireDeliveredParcel>,
    #[serde(rename = "Parcel")]
    pub parcel_capitalized: Option<WireDeliveredParcel>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RequestPayload<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parcel_type: &'static str,
    pub sender_commune: &'a str,
    pub sender_quartier: &'a str,
    pub pickup_date: String,
    pub pickup_time: String,
    pub delivery_commune: &'a str,
    pub delivery_quartier: &'a str,
    pub dropoff_date: String,
    pub dropoff_time: String,
    pub is_fee_at_door: bool,
    pub fee_at_door: i64,
    pub recipient_name: &'a str,
    pub recipient_phone: &'a str,
    pub shop_id: &'a str,
    pub user_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackagePayload<'a> {
    pub recipient_name: &'a str,
    pub recipient_phone: &'a str,
    pub is_fee_at_door: bool,
    pub fee_at_door: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DestinationPayload<'a> {
    pub delivery_commune: &'a str,
    pub delivery_quartier: &'a str,
    pub packages: Vec<PackagePayload<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MultipleRequestPayload<'a> {
    pub sender_commune: &'a str,
    pub sender_quartier: &'a str,
    pub pickup_date: String,
    pub pickup_time: String,
    pub parcels_in_multiple: Vec<DestinationPayload<'a>>,
    pub user_id: &'a str,
    pub shop_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfilePayload<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub phone_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PhonePayload<'a> {
    pub id: &'a str,
    pub phone_number: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShopPayload<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub commune: &'a str,
    pub quartier: &'a str,
    pub address: &'a str,
}

/// Parse a backend timestamp into local wall-clock time.
/// Zoned values are converted; unzoned values are taken as already local.
pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, AppError> {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Ok(zoned.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|e| AppError::Serialization(format!("Invalid timestamp {:?}: {}", raw, e)))
}

fn parse_optional_timestamp(raw: Option<&str>) -> Result<Option<NaiveDateTime>, AppError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(parse_timestamp)
        .transpose()
}

/// Local wall-clock time as the UTC ISO string the backend stores
pub(crate) fn to_backend_timestamp(local: NaiveDateTime) -> String {
    let utc = Local
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local));
    utc.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A null or missing status is kept as an unrecognized empty value
fn reported<S: StatusKind>(raw: Option<String>) -> Reported<S> {
    Reported::parse(raw.as_deref().unwrap_or_default())
}

fn clock_time(local: NaiveDateTime) -> String {
    local.format("%H:%M").to_string()
}

fn door_fee(is_fee_at_door: bool, fee: Option<f64>) -> Option<Money> {
    if !is_fee_at_door {
        return None;
    }
    fee.map(Money::from_f64).filter(Money::is_positive)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn flatten_items(items: Vec<WireItem>) -> Vec<ParcelItem> {
    let mut flat = Vec::new();
    for item in items {
        let destination = match (&item.delivery_commune, &item.delivery_quartier) {
            (Some(zone), Some(sub_zone)) => Some(Location::new(zone.clone(), sub_zone.clone())),
            _ => None,
        };

        if item.packages.is_empty() {
            flat.push(ParcelItem {
                destination,
                recipient_name: non_empty(item.recipient_name),
                recipient_phone: non_empty(item.recipient_phone),
                door_fee: door_fee(item.is_fee_at_door, item.fee_at_door),
            });
            continue;
        }

        for package in item.packages {
            flat.push(ParcelItem {
                destination: destination.clone(),
                recipient_name: non_empty(package.recipient_name),
                recipient_phone: non_empty(package.recipient_phone),
                door_fee: door_fee(package.is_fee_at_door, package.fee_at_door),
            });
        }
    }
    flat
}

impl From<WireShop> for Shop {
    fn from(shop: WireShop) -> Self {
        Shop {
            id: shop.id,
            name: shop.name,
            location: Location::new(shop.commune, shop.quartier),
            address: shop.address,
        }
    }
}

impl From<WireUser> for User {
    fn from(user: WireUser) -> Self {
        User {
            id: user.id,
            phone_number: user.phone_number,
            name: user.name,
            shops: user.shops.into_iter().map(Shop::from).collect(),
        }
    }
}

impl TryFrom<WireParcel> for Parcel {
    type Error = AppError;

    fn try_from(parcel: WireParcel) -> Result<Self, Self::Error> {
        let category = parcel.parcel_type.as_deref().and_then(ParcelCategory::parse);
        if category.is_none() {
            tracing::debug!(
                "Parcel {} has no known category ({:?})",
                parcel.id,
                parcel.parcel_type
            );
        }

        Ok(Parcel {
            created_at: parse_timestamp(&parcel.created_at)?,
            pickup_at: parse_optional_timestamp(parcel.pickup_date.as_deref())?,
            dropoff_at: parse_optional_timestamp(parcel.dropoff_date.as_deref())?,
            door_fee: door_fee(parcel.is_fee_at_door, parcel.fee_at_door),
            items: flatten_items(parcel.parcels_in_multiple),
            id: parcel.id,
            tracking_number: parcel.tracking_number,
            name: parcel.name,
            description: parcel.description,
            category,
            status: reported(parcel.status),
            sender: Location::new(parcel.sender_commune, parcel.sender_quartier),
            recipient: Location::new(parcel.delivery_commune, parcel.delivery_quartier),
            recipient_name: non_empty(parcel.recipient_name),
            recipient_phone: non_empty(parcel.recipient_phone),
        })
    }
}

impl TryFrom<WireOrder> for Order {
    type Error = AppError;

    fn try_from(order: WireOrder) -> Result<Self, Self::Error> {
        Ok(Order {
            created_at: parse_timestamp(&order.created_at)?,
            id: order.id,
            amount: Money::from_f64(order.amount),
            status: reported(order.status),
        })
    }
}

impl From<WireDeliveredParcel> for DeliveredParcel {
    fn from(parcel: WireDeliveredParcel) -> Self {
        DeliveredParcel {
            door_fee: door_fee(parcel.is_fee_at_door, parcel.fee_at_door),
            items: flatten_items(parcel.parcels_in_multiple),
            id: parcel.id,
            tracking_number: parcel.tracking_number,
            name: parcel.name,
        }
    }
}

impl TryFrom<WireDelivery> for Delivery {
    type Error = AppError;

    fn try_from(delivery: WireDelivery) -> Result<Self, Self::Error> {
        Ok(Delivery {
            created_at: parse_timestamp(&delivery.created_at)?,
            parcel: delivery
                .parcel
                .or(delivery.parcel_capitalized)
                .map(DeliveredParcel::from),
            id: delivery.id,
            status: reported(delivery.status),
        })
    }
}

/// Convert a list one record at a time. A record that cannot be read is
/// logged and left out; the others are kept.
pub(crate) fn convert_all<W, T>(records: Vec<Value>) -> Vec<T>
where
    W: DeserializeOwned,
    T: TryFrom<W, Error = AppError>,
{
    let received = records.len();
    let converted: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let id = record.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value::<W>(record)
                .map_err(AppError::from)
                .and_then(T::try_from)
            {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!("Skipping backend record {} (id {}): {}", index, id, e);
                    None
                }
            }
        })
        .collect();

    if converted.len() < received {
        tracing::warn!("Kept {} of {} backend records", converted.len(), received);
    }
    converted
}

impl<'a> RequestPayload<'a> {
    pub fn new(request: &'a NewRequest, user: &'a User) -> Self {
        let door_fee = request.door_fee.unwrap_or_default();
        Self {
            name: &request.name,
            description: &request.description,
            parcel_type: request.category.as_str(),
            sender_commune: &request.pickup.zone,
            sender_quartier: &request.pickup.sub_zone,
            pickup_date: to_backend_timestamp(request.pickup_at),
            pickup_time: clock_time(request.pickup_at),
            delivery_commune: &request.delivery.zone,
            delivery_quartier: &request.delivery.sub_zone,
            dropoff_date: to_backend_timestamp(request.dropoff_at),
            dropoff_time: clock_time(request.dropoff_at),
            is_fee_at_door: request.door_fee.is_some(),
            fee_at_door: door_fee.amount(),
            recipient_name: &request.recipient_name,
            recipient_phone: &request.recipient_phone,
            shop_id: user.primary_shop().map(|s| s.id.as_str()).unwrap_or(""),
            user_id: &user.id,
        }
    }
}

impl<'a> MultipleRequestPayload<'a> {
    pub fn new(request: &'a NewMultipleRequest, user: &'a User) -> Self {
        Self {
            sender_commune: &request.pickup.zone,
            sender_quartier: &request.pickup.sub_zone,
            pickup_date: to_backend_timestamp(request.pickup_at),
            pickup_time: clock_time(request.pickup_at),
            parcels_in_multiple: request
                .destinations
                .iter()
                .map(|destination| DestinationPayload {
                    delivery_commune: &destination.location.zone,
                    delivery_quartier: &destination.location.sub_zone,
                    packages: destination
                        .packages
                        .iter()
                        .map(|pkg| PackagePayload {
                            recipient_name: &pkg.recipient_name,
                            recipient_phone: &pkg.recipient_phone,
                            is_fee_at_door: pkg.door_fee.is_some(),
                            fee_at_door: pkg.door_fee.unwrap_or_default().amount(),
                        })
                        .collect(),
                })
                .collect(),
            user_id: &user.id,
            shop_id: user.primary_shop().map(|s| s.id.as_str()).unwrap_or(""),
        }
    }
}

impl<'a> ShopPayload<'a> {
    pub fn new(update: &'a ShopUpdate) -> Self {
        Self {
            id: &update.id,
            name: &update.name,
            commune: &update.location.zone,
            quartier: &update.location.sub_zone,
            address: &update.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::status::{DeliveryStatus, OrderStatus, ParcelStatus};
    use crate::testing::ts;
    use serde_json::json;

    fn local(raw: &str) -> NaiveDateTime {
        DateTime::parse_from_rfc3339(raw)
            .unwrap()
            .with_timezone(&Local)
            .naive_local()
    }

    #[test]
    fn test_both_parcel_casings_are_accepted() {
        let lower: WireDelivery = serde_json::from_value(json!({
            "id": "d1",
            "status": "COMPLETED",
            "parcel": { "isFeeAtDoor": true, "feeAtDoor": 5000 },
            "createdAt": "2024-10-02T09:00:00.000Z"
        }))
        .unwrap();
        let upper: WireDelivery = serde_json::from_value(json!({
            "id": "d2",
            "status": "COMPLETED",
            "Parcel": { "isFeeAtDoor": true, "feeAtDoor": 5000 },
            "createdAt": "2024-10-02T09:00:00.000Z"
        }))
        .unwrap();

        for wire in [lower, upper] {
            let delivery = Delivery::try_from(wire).unwrap();
            assert!(delivery.status.is(DeliveryStatus::Completed));
            assert_eq!(
                delivery.parcel.unwrap().door_fee,
                Some(Money::gnf(5_000))
            );
        }
    }

    #[test]
    fn test_parcel_conversion() {
        let wire: WireParcel = serde_json::from_value(json!({
            "id": "p1",
            "trackingNumber": "JKLO25496",
            "name": "MacBook Pro",
            "description": "",
            "parcelType": "MULTIPLE",
            "status": "IN_TRANSIT",
            "senderCommune": "Ratoma",
            "senderQuartier": "Kipé",
            "deliveryCommune": "",
            "deliveryQuartier": "",
            "pickupDate": "2024-10-02T08:00:00.000Z",
            "isFeeAtDoor": false,
            "feeAtDoor": 0,
            "parcelsInMultiple": [
                {
                    "deliveryCommune": "Matoto",
                    "deliveryQuartier": "Kissosso",
                    "packages": [
                        { "recipientName": "A", "isFeeAtDoor": true, "feeAtDoor": 2000 },
                        { "recipientName": "B", "isFeeAtDoor": false, "feeAtDoor": 0 }
                    ]
                },
                { "isFeeAtDoor": true, "feeAtDoor": 1500.0 }
            ],
            "createdAt": "2024-10-02T09:00:00.000Z"
        }))
        .unwrap();

        let parcel = Parcel::try_from(wire).unwrap();
        assert_eq!(parcel.category, Some(ParcelCategory::Multiple));
        assert!(parcel.status.is(ParcelStatus::InTransit));
        assert_eq!(parcel.created_at, local("2024-10-02T09:00:00.000Z"));
        assert_eq!(parcel.pickup_at, Some(local("2024-10-02T08:00:00.000Z")));
        assert_eq!(parcel.dropoff_at, None);
        assert_eq!(parcel.door_fee, None);
        assert_eq!(parcel.items.len(), 3);
        assert_eq!(
            parcel.items[0].destination,
            Some(Location::new("Matoto", "Kissosso"))
        );
        assert_eq!(parcel.door_fees(), Money::gnf(3_500));
    }

    #[test]
    fn test_unzoned_timestamp_is_taken_as_local() {
        assert_eq!(
            parse_timestamp("2024-10-02T09:30:00").unwrap(),
            ts(2024, 10, 2, 9, 30, 0)
        );
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(AppError::Serialization(_))
        ));
    }

    #[test]
    fn test_order_amount_accepts_floats() {
        let wire: WireOrder = serde_json::from_value(json!({
            "id": "o1",
            "amount": 15000.0,
            "status": "PAID",
            "createdAt": "2024-10-02T09:00:00Z"
        }))
        .unwrap();
        assert_eq!(Order::try_from(wire).unwrap().amount, Money::gnf(15_000));
    }

    #[test]
    fn test_backend_timestamp_round_trips_through_local_time() {
        let at = ts(2024, 10, 2, 9, 30, 0);
        assert_eq!(parse_timestamp(&to_backend_timestamp(at)).unwrap(), at);
        assert!(to_backend_timestamp(at).ends_with('Z'));
    }

    #[test]
    fn test_null_or_missing_status_is_kept_as_unrecognized() {
        let records = vec![
            json!({ "id": "p1", "status": "DELIVERED", "createdAt": "2024-10-02T09:00:00Z" }),
            json!({ "id": "p2", "status": null, "createdAt": "2024-10-02T10:00:00Z" }),
            json!({ "id": "p3", "createdAt": "2024-10-02T11:00:00Z" }),
        ];

        let parcels: Vec<Parcel> = convert_all::<WireParcel, _>(records);
        assert_eq!(parcels.len(), 3);
        assert!(parcels[0].status.is(ParcelStatus::Delivered));
        assert_eq!(parcels[1].status, Reported::Unrecognized(String::new()));
        assert_eq!(parcels[2].status.known(), None);

        let counts = aggregate(&parcels);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.unrecognized, 2);
        assert_eq!(counts.get(ParcelStatus::Delivered), 1);
    }

    #[test]
    fn test_unreadable_records_are_skipped() {
        let orders: Vec<Order> = convert_all::<WireOrder, _>(vec![
            json!({ "id": "o1", "amount": 1000, "status": "PAID", "createdAt": "2024-10-02T09:00:00Z" }),
            json!({ "id": "o2", "amount": 2000, "status": "PAID", "createdAt": "" }),
            json!({ "id": "o3", "amount": 3000, "status": "PENDING" }),
            json!({ "id": "o4", "amount": "lots", "status": "PAID", "createdAt": "2024-10-02T09:00:00Z" }),
            json!({ "id": "o5", "amount": 5000, "status": null, "createdAt": "2024-10-03T09:00:00Z" }),
        ]);

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["o1", "o5"]);
        assert!(orders[0].status.is(OrderStatus::Paid));
        assert_eq!(orders[1].status.known(), None);
    }

    #[test]
    fn test_delivery_without_status_keeps_its_parcel() {
        let deliveries: Vec<Delivery> = convert_all::<WireDelivery, _>(vec![json!({
            "id": "d1",
            "Parcel": { "isFeeAtDoor": true, "feeAtDoor": 5000 },
            "createdAt": "2024-10-02T09:00:00.000Z"
        })]);

        assert_eq!(deliveries.len(), 1);
        assert!(!deliveries[0].status.is(DeliveryStatus::Completed));
        assert_eq!(
            deliveries[0].parcel.as_ref().unwrap().door_fees(),
            Money::gnf(5_000)
        );
    }
}
