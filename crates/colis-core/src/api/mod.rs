// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Delivery backend access
//
// The backend owns persistence, status transitions and billing. This module
// only reads collections and files requests on the user's behalf.

mod wire;

use crate::forms::{NewMultipleRequest, NewRequest, ShopUpdate};
use crate::models::{Delivery, Order, Parcel, User};
use crate::types::{AppError, AppSettings};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use wire::{
    convert_all, MultipleRequestPayload, PhonePayload, ProfilePayload, RequestPayload,
    ShopPayload, WireDelivery, WireOrder, WireParcel, WireUser,
};

/// Operations the client needs from the delivery backend
pub trait Backend: Send + Sync {
    /// Look up the account registered for a phone number
    fn fetch_user(&self, phone: &str) -> impl Future<Output = Result<User, AppError>> + Send;

    /// Every request filed by a user, newest first
    fn fetch_parcels(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Parcel>, AppError>> + Send;

    fn fetch_parcel(&self, parcel_id: &str)
        -> impl Future<Output = Result<Parcel, AppError>> + Send;

    fn fetch_orders(&self, user_id: &str)
        -> impl Future<Output = Result<Vec<Order>, AppError>> + Send;

    fn fetch_deliveries(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Delivery>, AppError>> + Send;

    /// File a SINGLE, EXPRESS or CARGO request
    fn create_request(
        &self,
        user: &User,
        request: &NewRequest,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn create_multiple(
        &self,
        user: &User,
        request: &NewMultipleRequest,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Change the display name of `user`
    fn update_profile(
        &self,
        user: &User,
        name: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Store a phone number the identity provider has already verified
    fn update_phone(
        &self,
        user: &User,
        phone: &str,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn update_shop(&self, update: &ShopUpdate) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// HTTP client for the delivery backend
pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &AppSettings) -> Result<Self, AppError> {
        settings.validate()?;

        let http_client = Client::builder()
            .connect_timeout(settings.connect_timeout())
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: settings.api_base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let response = check_status(response, &url).await?;

        response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse {}: {}", url, e)))
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), AppError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let response = self
            .http_client
            .request(method, &url)
            .json(body)
            .send()
            .await?;
        check_status(response, &url).await?;
        Ok(())
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(url.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Api {
        status: status.as_u16(),
        message: if body.is_empty() {
            status.to_string()
        } else {
            body
        },
    })
}

impl Backend for ApiClient {
    async fn fetch_user(&self, phone: &str) -> Result<User, AppError> {
        let user: WireUser = self.get_json(&format!("/users/{}", phone)).await?;
        Ok(user.into())
    }

    async fn fetch_parcels(&self, user_id: &str) -> Result<Vec<Parcel>, AppError> {
        let parcels: Vec<Value> = self.get_json(&format!("/requests/{}", user_id)).await?;
        Ok(convert_all::<WireParcel, _>(parcels))
    }

    async fn fetch_parcel(&self, parcel_id: &str) -> Result<Parcel, AppError> {
        let parcel: WireParcel = self.get_json(&format!("/parcels/{}", parcel_id)).await?;
        Parcel::try_from(parcel)
    }

    async fn fetch_orders(&self, user_id: &str) -> Result<Vec<Order>, AppError> {
        let orders: Vec<Value> = self.get_json(&format!("/orders/{}", user_id)).await?;
        Ok(convert_all::<WireOrder, _>(orders))
    }

    async fn fetch_deliveries(&self, user_id: &str) -> Result<Vec<Delivery>, AppError> {
        let deliveries: Vec<Value> = self.get_json(&format!("/deliveries/{}", user_id)).await?;
        Ok(convert_all::<WireDelivery, _>(deliveries))
    }

    async fn create_request(&self, user: &User, request: &NewRequest) -> Result<(), AppError> {
        let payload = RequestPayload::new(request, user);
        self.send_json(Method::POST, "/requests", &payload).await
    }

    async fn create_multiple(
        &self,
        user: &User,
        request: &NewMultipleRequest,
    ) -> Result<(), AppError> {
        let payload = MultipleRequestPayload::new(request, user);
        self.send_json(Method::POST, "/requests/multiple", &payload)
            .await
    }

    async fn update_profile(&self, user: &User, name: &str) -> Result<(), AppError> {
        let payload = ProfilePayload {
            id: &user.id,
            name,
            phone_number: &user.phone_number,
        };
        self.send_json(Method::PATCH, "/users/update", &payload).await
    }

    async fn update_phone(&self, user: &User, phone: &str) -> Result<(), AppError> {
        let payload = PhonePayload {
            id: &user.id,
            phone_number: phone,
        };
        self.send_json(Method::PATCH, "/users/update", &payload).await
    }

    async fn update_shop(&self, update: &ShopUpdate) -> Result<(), AppError> {
        self.send_json(Method::PATCH, "/shops/update", &ShopPayload::new(update))
            .await
    }
}
