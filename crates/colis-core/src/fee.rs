// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Delivery fee estimate
//
// Shown to the user before submitting a request. The backend computes the
// fee that is actually billed.

use crate::models::{Money, ParcelCategory};

pub const SAME_ZONE_FEE: Money = Money::gnf(10_000);
pub const ADJACENT_ZONE_FEE: Money = Money::gnf(15_000);
pub const DISTANT_ZONE_FEE: Money = Money::gnf(25_000);
pub const EXPRESS_FEE: Money = Money::gnf(20_000);

/// Neighbouring communes. Lookups check both directions.
const ADJACENT_ZONES: &[(&str, &[&str])] = &[
    ("Ratoma", &["Lambanyi", "Sonfonia"]),
    ("Lambanyi", &["Ratoma", "Sonfonia"]),
    ("Sonfonia", &["Ratoma", "Lambanyi"]),
    ("Gbessia", &["Matoto", "Tombolia"]),
    ("Matoto", &["Gbessia", "Tombolia"]),
    ("Tombolia", &["Matoto", "Gbessia"]),
];

fn neighbours(zone: &str) -> &'static [&'static str] {
    ADJACENT_ZONES
        .iter()
        .find(|(name, _)| *name == zone)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

pub fn are_adjacent(a: &str, b: &str) -> bool {
    neighbours(a).contains(&b) || neighbours(b).contains(&a)
}

pub fn estimate_fee(origin: &str, destination: &str, category: ParcelCategory) -> Money {
    let zone_fee = if origin == destination {
        SAME_ZONE_FEE
    } else if are_adjacent(origin, destination) {
        ADJACENT_ZONE_FEE
    } else {
        DISTANT_ZONE_FEE
    };

    // Express is flat regardless of distance
    if category == ParcelCategory::Express {
        return EXPRESS_FEE;
    }
    zone_fee
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::COMMUNES;

    #[test]
    fn test_same_zone() {
        for commune in COMMUNES {
            assert_eq!(
                estimate_fee(commune.name, commune.name, ParcelCategory::Single),
                Money::gnf(10_000)
            );
        }
        // Zones outside the table still count as the same zone
        assert_eq!(
            estimate_fee("Kaloum", "Kaloum", ParcelCategory::Cargo),
            SAME_ZONE_FEE
        );
    }

    #[test]
    fn test_adjacent_and_distant() {
        assert_eq!(
            estimate_fee("Ratoma", "Lambanyi", ParcelCategory::Single),
            Money::gnf(15_000)
        );
        assert_eq!(
            estimate_fee("Ratoma", "Tombolia", ParcelCategory::Single),
            Money::gnf(25_000)
        );
        assert_eq!(
            estimate_fee("Kaloum", "Ratoma", ParcelCategory::Multiple),
            DISTANT_ZONE_FEE
        );
    }

    #[test]
    fn test_express_is_flat() {
        for (a, b) in [
            ("Ratoma", "Ratoma"),
            ("Ratoma", "Lambanyi"),
            ("Ratoma", "Tombolia"),
        ] {
            assert_eq!(estimate_fee(a, b, ParcelCategory::Express), Money::gnf(20_000));
        }
    }

    #[test]
    fn test_adjacency_checked_both_ways() {
        for (zone, list) in ADJACENT_ZONES {
            for other in *list {
                assert!(are_adjacent(zone, other));
                assert!(are_adjacent(other, zone));
            }
        }
        assert!(!are_adjacent("Sonfonia", "Matoto"));
    }
}
