// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Keeps the local collections in step with the backend
//
// Every refresh takes a ticket before the request goes out. A failed fetch
// leaves the current collection as it was.

use crate::aggregate::Tracked;
use crate::api::Backend;
use crate::collection::{Collection, RefreshOutcome};
use crate::forms::{
    validate_name, validate_phone, CargoRequestForm, MultipleRequestForm, NewMultipleRequest,
    NewRequest, ShopUpdate, SingleRequestForm,
};
use crate::models::{Parcel, User};
use crate::state::AppState;
use crate::types::AppError;
use std::future::Future;
use std::sync::Arc;

pub struct Synchronizer<B: Backend> {
    backend: B,
    state: Arc<AppState>,
}

impl<B: Backend> Synchronizer<B> {
    pub fn new(backend: B, state: Arc<AppState>) -> Self {
        Self { backend, state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Look up the account for `phone` and start a session with it
    pub async fn sign_in(&self, phone: &str) -> Result<User, AppError> {
        let phone = phone.trim();
        let user = self.backend.fetch_user(phone).await.map_err(|e| {
            tracing::warn!("Sign-in failed for {}: {}", phone, e);
            e
        })?;
        self.state.sign_in(user.clone());
        Ok(user)
    }

    pub fn sign_out(&self) {
        self.state.sign_out();
    }

    pub async fn refresh_parcels(&self) -> Result<RefreshOutcome, AppError> {
        let user = self.state.require_user()?;
        refresh(&self.state.parcels, self.backend.fetch_parcels(&user.id)).await
    }

    pub async fn refresh_orders(&self) -> Result<RefreshOutcome, AppError> {
        let user = self.state.require_user()?;
        refresh(&self.state.orders, self.backend.fetch_orders(&user.id)).await
    }

    pub async fn refresh_deliveries(&self) -> Result<RefreshOutcome, AppError> {
        let user = self.state.require_user()?;
        refresh(&self.state.deliveries, self.backend.fetch_deliveries(&user.id)).await
    }

    /// Orders and deliveries together, as the finance screen shows them.
    /// Stops at the first failure.
    pub async fn refresh_finances(&self) -> Result<(RefreshOutcome, RefreshOutcome), AppError> {
        let orders = self.refresh_orders().await?;
        let deliveries = self.refresh_deliveries().await?;
        Ok((orders, deliveries))
    }

    /// Fetch one parcel fresh from the backend. The cached list is not touched.
    pub async fn parcel_details(&self, parcel_id: &str) -> Result<Parcel, AppError> {
        self.state.require_user()?;
        self.backend.fetch_parcel(parcel_id).await
    }

    pub async fn submit_single(&self, form: &SingleRequestForm) -> Result<NewRequest, AppError> {
        let request = form.validate()?;
        self.file_request(request).await
    }

    pub async fn submit_cargo(&self, form: &CargoRequestForm) -> Result<NewRequest, AppError> {
        let request = form.validate()?;
        self.file_request(request).await
    }

    pub async fn submit_multiple(
        &self,
        form: &MultipleRequestForm,
    ) -> Result<NewMultipleRequest, AppError> {
        let request = form.validate()?;
        let user = self.state.require_user()?;

        self.backend.create_multiple(&user, &request).await?;
        tracing::info!(
            "Filed multiple request with {} destination(s)",
            request.destinations.len()
        );
        Ok(request)
    }

    /// Change the signed-in user's display name
    pub async fn rename(&self, name: &str) -> Result<User, AppError> {
        let name = validate_name(name)?;
        let mut user = self.state.require_user()?;

        self.backend.update_profile(&user, &name).await?;
        user.name = name;
        self.state.update_user(user.clone());
        Ok(user)
    }

    /// Store a new phone number once the identity provider has verified it.
    /// The session keeps the same account.
    pub async fn change_phone(&self, phone: &str) -> Result<User, AppError> {
        let phone = validate_phone(phone)?;
        let mut user = self.state.require_user()?;

        self.backend.update_phone(&user, &phone).await?;
        tracing::info!("Phone number of user {} changed", user.id);
        user.phone_number = phone;
        self.state.update_user(user.clone());
        Ok(user)
    }

    pub async fn update_shop(&self, update: &ShopUpdate) -> Result<User, AppError> {
        update.validate()?;
        let mut user = self.state.require_user()?;
        let Some(shop) = user.shops.iter_mut().find(|s| s.id == update.id) else {
            return Err(AppError::NotFound(format!("shop {}", update.id)));
        };

        self.backend.update_shop(update).await?;
        shop.name = update.name.trim().to_string();
        shop.location = update.location.clone();
        shop.address = update.address.trim().to_string();
        self.state.update_user(user.clone());
        Ok(user)
    }

    async fn file_request(&self, request: NewRequest) -> Result<NewRequest, AppError> {
        let user = self.state.require_user()?;
        if user.primary_shop().is_none() {
            tracing::warn!("User {} has no shop; filing without one", user.id);
        }

        self.backend.create_request(&user, &request).await?;
        tracing::info!("Filed {} request {:?}", request.category, request.name);
        Ok(request)
    }
}

async fn refresh<E, F>(collection: &Collection<E>, fetch: F) -> Result<RefreshOutcome, AppError>
where
    E: Tracked + Clone,
    F: Future<Output = Result<Vec<E>, AppError>>,
{
    let ticket = collection.begin_fetch();
    match fetch.await {
        Ok(items) => Ok(collection.apply(ticket, items)),
        Err(e) => {
            tracing::error!("Failed to load {}: {}", collection.name(), e);
            Err(e)
        }
    }
}
