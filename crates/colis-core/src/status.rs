// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Status enums for parcels, orders and deliveries
//
// The backend owns every status transition. The client only reads the
// reported value, which may be one it does not know.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A closed set of statuses for one entity kind
pub trait StatusKind: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Every known status, in lifecycle order
    const ALL: &'static [Self];

    /// Wire name, as sent by the backend
    fn as_str(&self) -> &'static str;

    /// French label shown on screen
    fn label(&self) -> &'static str;

    /// Position in the lifecycle. Terminal states share the last stage.
    fn stage(&self) -> u8;

    fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParcelStatus {
    Pending,
    InTransit,
    Delivered,
    Returned,
}

impl StatusKind for ParcelStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::InTransit,
        Self::Delivered,
        Self::Returned,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Returned => "RETURNED",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::InTransit => "En transit",
            Self::Delivered => "Livré",
            Self::Returned => "Retourné",
        }
    }

    fn stage(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InTransit => 1,
            Self::Delivered | Self::Returned => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl StatusKind for OrderStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::Paid, Self::Cancelled];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Impayé",
            Self::Paid => "Payé",
            Self::Cancelled => "Annulé",
        }
    }

    fn stage(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Paid | Self::Cancelled => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeliveryStatus {
    Pending,
    InTransit,
    Completed,
    Cancelled,
}

impl StatusKind for DeliveryStatus {
    const ALL: &'static [Self] = &[
        Self::Pending,
        Self::InTransit,
        Self::Completed,
        Self::Cancelled,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InTransit => "IN_TRANSIT",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Pending => "En attente",
            Self::InTransit => "En transit",
            Self::Completed => "Terminé",
            Self::Cancelled => "Annulé",
        }
    }

    fn stage(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::InTransit => 1,
            Self::Completed | Self::Cancelled => 2,
        }
    }
}

/// A status as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported<S> {
    Known(S),
    Unrecognized(String),
}

impl<S: StatusKind> Reported<S> {
    pub fn parse(raw: &str) -> Self {
        match S::parse(raw) {
            Some(status) => Self::Known(status),
            None => Self::Unrecognized(raw.to_string()),
        }
    }

    pub fn known(&self) -> Option<S> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is(&self, status: S) -> bool {
        self.known() == Some(status)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Known(status) => status.label(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl<S: StatusKind> From<S> for Reported<S> {
    fn from(status: S) -> Self {
        Self::Known(status)
    }
}

impl<S: StatusKind> fmt::Display for Reported<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<S: StatusKind> Serialize for Reported<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de, S: StatusKind> Deserialize<'de> for Reported<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
