// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Settings and error types

use crate::forms::ValidationError;
use crate::range::RangeKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application settings (frontend-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Base URL of the delivery backend, without trailing slash
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Read timeout for a single backend call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Connect timeout for a single backend call
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Range preselected on the history, finances and dashboard screens
    #[serde(default)]
    pub default_range: RangeKind,
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            default_range: RangeKind::default(),
        }
    }
}

impl AppSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Check that the base URL is usable by the HTTP client
    pub fn validate(&self) -> Result<(), AppError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::InvalidConfig(format!(
                "API base URL must start with http:// or https://, got {:?}",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidConfig(
                "Request timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    #[error("Backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No user is signed in")]
    NotSignedIn,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// Message shown inline by a screen when an operation fails
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) | AppError::ConnectionRefused(_) => {
                "Impossible de joindre le serveur. Vérifiez votre connexion.".to_string()
            }
            AppError::NotFound(_) => "Élément introuvable.".to_string(),
            AppError::NotSignedIn => "Veuillez vous connecter.".to_string(),
            AppError::Validation(err) => err.to_string(),
            AppError::Api { .. }
            | AppError::Serialization(_)
            | AppError::FileIo(_)
            | AppError::InvalidConfig(_) => {
                "Une erreur est survenue. Veuillez réessayer.".to_string()
            }
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            AppError::ConnectionRefused(err.to_string())
        } else if err.is_decode() {
            AppError::Serialization(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            AppError::Network(err.to_string())
        }
    }
}
