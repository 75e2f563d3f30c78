// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Shared logic for all frontends
//
// This crate provides:
// - Parcel, order and delivery models with their status sets
// - Status counts, date-range filtering and the fee estimate
// - Collections with fetch sequencing and the session state
// - The HTTP backend adapter and the synchronizer driving it
// - Screen summaries, form validation and settings persistence
//
// Frontend-specific code lives in separate crates.

pub mod aggregate;
pub mod api;
pub mod collection;
pub mod dashboard;
pub mod display;
pub mod fee;
pub mod forms;
pub mod models;
pub mod range;
pub mod settings;
pub mod state;
pub mod status;
pub mod sync;
pub mod types;
pub mod zones;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use aggregate::{aggregate, StatusCounts, Tracked};
pub use api::{ApiClient, Backend};
pub use collection::{Collection, RefreshOutcome};
pub use fee::estimate_fee;
pub use forms::ValidationError;
pub use models::{Delivery, Location, Money, Order, Parcel, ParcelCategory, User};
pub use range::{filter_by_range, RangeKind, RangeSelector, Timestamped};
pub use settings::SettingsStore;
pub use state::AppState;
pub use status::{DeliveryStatus, OrderStatus, ParcelStatus, Reported, StatusKind};
pub use sync::Synchronizer;
pub use types::{AppError, AppSettings};
