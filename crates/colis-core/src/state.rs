// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Application state
//
// One container per signed-in session, shared by reference with every
// screen. Signing out drops the user and every collection.

use crate::collection::Collection;
use crate::models::{Delivery, Order, Parcel, User};
use crate::types::AppError;
use std::sync::{PoisonError, RwLock};

pub struct AppState {
    session: RwLock<Option<User>>,
    pub parcels: Collection<Parcel>,
    pub orders: Collection<Order>,
    pub deliveries: Collection<Delivery>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
            parcels: Collection::new("parcels"),
            orders: Collection::new("orders"),
            deliveries: Collection::new("deliveries"),
        }
    }

    /// Start a session for `user`. Data from any previous session is dropped.
    pub fn sign_in(&self, user: User) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(user.clone());

        if previous.is_some_and(|p| p.id != user.id) {
            self.clear_collections();
        }
        tracing::info!("Signed in as {}", user.id);
    }

    pub fn sign_out(&self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.clear_collections();
        tracing::info!("Signed out");
    }

    /// Replace the stored profile after a successful update
    pub fn update_user(&self, user: User) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
    }

    pub fn user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn require_user(&self) -> Result<User, AppError> {
        self.user().ok_or(AppError::NotSignedIn)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop every cached collection, e.g. on navigation away
    pub fn clear_collections(&self) {
        self.parcels.clear();
        self.orders.clear();
        self.deliveries.clear();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
