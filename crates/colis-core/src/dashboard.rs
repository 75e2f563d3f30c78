// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Screen summaries
//
// Pure functions over collection snapshots. Each screen recomputes its
// summary from the current list whenever the list or the range changes.

use crate::aggregate::{aggregate_iter, StatusCounts};
use crate::models::{Delivery, Money, Order, Parcel};
use crate::range::{within, RangeSelector, Timestamped};
use crate::status::{DeliveryStatus, OrderStatus, ParcelStatus, Reported};
use chrono::Datelike;
use serde::Serialize;

/// How many parcels the home screen lists per section
pub const HOME_LIST_LEN: usize = 3;

/// The `n` newest entities, newest first
pub fn most_recent<T: Timestamped + Clone>(entities: &[T], n: usize) -> Vec<T> {
    let mut sorted: Vec<&T> = entities.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.created_at()));
    sorted.into_iter().take(n).cloned().collect()
}

pub fn latest_in_transit(parcels: &[Parcel]) -> Option<Parcel> {
    parcels
        .iter()
        .filter(|p| p.status.is(ParcelStatus::InTransit))
        .max_by_key(|p| p.created_at)
        .cloned()
}

pub fn recent_delivered(parcels: &[Parcel], n: usize) -> Vec<Parcel> {
    let delivered: Vec<Parcel> = parcels
        .iter()
        .filter(|p| p.status.is(ParcelStatus::Delivered))
        .cloned()
        .collect();
    most_recent(&delivered, n)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub recent: Vec<Parcel>,
    pub in_transit: Option<Parcel>,
    pub delivered: Vec<Parcel>,
}

impl HomeSummary {
    pub fn new(parcels: &[Parcel]) -> Self {
        Self {
            recent: most_recent(parcels, HOME_LIST_LEN),
            in_transit: latest_in_transit(parcels),
            delivered: recent_delivered(parcels, HOME_LIST_LEN),
        }
    }
}

/// Parcels of one range together with their counts
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub parcels: Vec<Parcel>,
    pub counts: StatusCounts<ParcelStatus>,
}

impl HistoryView {
    pub fn new(parcels: &[Parcel], range: RangeSelector, anchor: chrono::NaiveDate) -> Self {
        let parcels: Vec<Parcel> = within(parcels, range, anchor).cloned().collect();
        let counts = aggregate_iter(&parcels);
        Self { parcels, counts }
    }
}

/// Progress bar fill for a parcel status
pub fn progress_percent(status: &Reported<ParcelStatus>) -> u8 {
    match status.known() {
        Some(ParcelStatus::Pending | ParcelStatus::InTransit) => 50,
        Some(ParcelStatus::Delivered | ParcelStatus::Returned) => 100,
        None => 0,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub paid: Money,
    pub unpaid: Money,
    /// Every order in range, cancelled ones included
    pub total: Money,
    pub in_transit: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl FinanceSummary {
    pub fn new(
        orders: &[Order],
        deliveries: &[Delivery],
        range: RangeSelector,
        anchor: chrono::NaiveDate,
    ) -> Self {
        let mut summary = Self::default();

        for order in within(orders, range, anchor) {
            summary.total += order.amount;
            match order.status.known() {
                Some(OrderStatus::Paid) => summary.paid += order.amount,
                Some(OrderStatus::Pending) => summary.unpaid += order.amount,
                _ => {}
            }
        }

        let counts = aggregate_iter(within(deliveries, range, anchor));
        summary.in_transit = counts.get(DeliveryStatus::InTransit);
        summary.completed = counts.get(DeliveryStatus::Completed);
        summary.cancelled = counts.get(DeliveryStatus::Cancelled);
        summary
    }
}

/// Order amounts per calendar month of `year`, January first
pub fn monthly_order_amounts(orders: &[Order], year: i32) -> [Money; 12] {
    let mut months = [Money::ZERO; 12];
    for order in orders.iter().filter(|o| o.created_at.year() == year) {
        months[order.created_at.month0() as usize] += order.amount;
    }
    months
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDashboard {
    pub counts: StatusCounts<DeliveryStatus>,
    /// Collected from recipients on completed deliveries
    pub door_fees_collected: Money,
}

impl DeliveryDashboard {
    pub fn new(deliveries: &[Delivery], range: RangeSelector, anchor: chrono::NaiveDate) -> Self {
        let in_range: Vec<&Delivery> = within(deliveries, range, anchor).collect();

        let door_fees_collected = in_range
            .iter()
            .filter(|d| d.status.is(DeliveryStatus::Completed))
            .filter_map(|d| d.parcel.as_ref())
            .map(|p| p.door_fees())
            .sum::<Money>();

        Self {
            counts: aggregate_iter(in_range),
            door_fees_collected,
        }
    }
}

/// Number of deliveries created per calendar month of `year`
pub fn monthly_delivery_counts(deliveries: &[Delivery], year: i32) -> [usize; 12] {
    let mut months = [0; 12];
    for delivery in deliveries.iter().filter(|d| d.created_at.year() == year) {
        months[delivery.created_at.month0() as usize] += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParcelItem;
    use crate::testing::{date, delivered_parcel, delivery, order, parcel, ts};

    fn ids(parcels: &[Parcel]) -> Vec<&str> {
        parcels.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_home_summary() {
        let parcels = vec![
            parcel("a", "DELIVERED", ts(2024, 10, 1, 8, 0, 0)),
            parcel("b", "IN_TRANSIT", ts(2024, 10, 2, 8, 0, 0)),
            parcel("c", "PENDING", ts(2024, 10, 5, 8, 0, 0)),
            parcel("d", "IN_TRANSIT", ts(2024, 10, 3, 8, 0, 0)),
            parcel("e", "DELIVERED", ts(2024, 9, 1, 8, 0, 0)),
        ];

        let home = HomeSummary::new(&parcels);
        assert_eq!(ids(&home.recent), ["c", "d", "b"]);
        assert_eq!(home.in_transit.map(|p| p.id), Some("d".to_string()));
        assert_eq!(ids(&home.delivered), ["a", "e"]);

        let empty = HomeSummary::new(&[]);
        assert!(empty.recent.is_empty());
        assert!(empty.in_transit.is_none());
    }

    #[test]
    fn test_history_view_counts_only_range() {
        let parcels = vec![
            parcel("a", "PENDING", ts(2024, 10, 2, 8, 0, 0)),
            parcel("b", "DELIVERED", ts(2024, 10, 2, 18, 0, 0)),
            parcel("c", "DELIVERED", ts(2024, 10, 3, 8, 0, 0)),
        ];

        let view = HistoryView::new(&parcels, RangeSelector::Day, date(2024, 10, 2));
        assert_eq!(ids(&view.parcels), ["a", "b"]);
        assert_eq!(view.counts.total, 2);
        assert_eq!(view.counts.get(ParcelStatus::Delivered), 1);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(&Reported::parse("PENDING")), 50);
        assert_eq!(progress_percent(&Reported::parse("IN_TRANSIT")), 50);
        assert_eq!(progress_percent(&Reported::parse("RETURNED")), 100);
        assert_eq!(progress_percent(&Reported::parse("LOST")), 0);
    }

    #[test]
    fn test_finance_summary() {
        let anchor = date(2024, 10, 2);
        let orders = vec![
            order("o1", 10_000, "PAID", ts(2024, 10, 1, 9, 0, 0)),
            order("o2", 15_000, "PENDING", ts(2024, 10, 2, 9, 0, 0)),
            order("o3", 5_000, "CANCELLED", ts(2024, 10, 3, 9, 0, 0)),
            order("o4", 99_000, "PAID", ts(2024, 9, 29, 9, 0, 0)),
        ];
        let deliveries = vec![
            delivery("d1", "IN_TRANSIT", ts(2024, 10, 2, 9, 0, 0), None),
            delivery("d2", "COMPLETED", ts(2024, 10, 2, 10, 0, 0), None),
            delivery("d3", "COMPLETED", ts(2024, 10, 4, 10, 0, 0), None),
            delivery("d4", "PENDING", ts(2024, 10, 4, 10, 0, 0), None),
        ];

        let summary = FinanceSummary::new(&orders, &deliveries, RangeSelector::Week, anchor);
        assert_eq!(summary.paid, Money::gnf(10_000));
        assert_eq!(summary.unpaid, Money::gnf(15_000));
        assert_eq!(summary.total, Money::gnf(30_000));
        assert_eq!(summary.in_transit, 1);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.cancelled, 0);
    }

    #[test]
    fn test_monthly_series_ignore_other_years() {
        let orders = vec![
            order("o1", 10_000, "PAID", ts(2024, 1, 15, 9, 0, 0)),
            order("o2", 5_000, "PENDING", ts(2024, 1, 31, 23, 0, 0)),
            order("o3", 7_000, "PAID", ts(2024, 12, 1, 0, 0, 0)),
            order("o4", 1_000, "PAID", ts(2023, 1, 15, 9, 0, 0)),
        ];
        let months = monthly_order_amounts(&orders, 2024);
        assert_eq!(months[0], Money::gnf(15_000));
        assert_eq!(months[11], Money::gnf(7_000));
        assert_eq!(months.iter().copied().sum::<Money>(), Money::gnf(22_000));

        let deliveries = vec![
            delivery("d1", "COMPLETED", ts(2024, 3, 1, 9, 0, 0), None),
            delivery("d2", "PENDING", ts(2024, 3, 9, 9, 0, 0), None),
            delivery("d3", "PENDING", ts(2025, 3, 9, 9, 0, 0), None),
        ];
        let counts = monthly_delivery_counts(&deliveries, 2024);
        assert_eq!(counts[2], 2);
        assert_eq!(counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_door_fees_only_on_completed_deliveries() {
        let at = ts(2024, 10, 2, 9, 0, 0);
        let mut multiple = delivered_parcel(None);
        multiple.items = vec![
            ParcelItem {
                destination: None,
                recipient_name: None,
                recipient_phone: None,
                door_fee: Some(Money::gnf(3_000)),
            },
            ParcelItem {
                destination: None,
                recipient_name: None,
                recipient_phone: None,
                door_fee: None,
            },
        ];
        let deliveries = vec![
            delivery("d1", "COMPLETED", at, Some(delivered_parcel(Some(12_000)))),
            delivery("d2", "COMPLETED", at, Some(multiple)),
            delivery("d3", "IN_TRANSIT", at, Some(delivered_parcel(Some(50_000)))),
            delivery("d4", "COMPLETED", at, None),
        ];

        let dashboard = DeliveryDashboard::new(&deliveries, RangeSelector::AllTime, at.date());
        assert_eq!(dashboard.door_fees_collected, Money::gnf(15_000));
        assert_eq!(dashboard.counts.get(DeliveryStatus::Completed), 3);
        assert_eq!(dashboard.counts.total, 4);
    }
}
