//! # Geocoding Adapter
//!
//! Resolves postal codes and free-text addresses to coordinates. Providers
//! return every candidate they find; callers decide what an empty answer
//! means.

mod fixed;
mod mapquest;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::GeoPoint;

pub use fixed::StaticGeocoder;
pub use mapquest::MapQuestGeocoder;

/// A resolved location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            formatted_address: None,
            street: None,
            city: None,
            state: None,
            zipcode: None,
            country: None,
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// GeoJSON point enriched with the address parts, as stored on bootcamps
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Point",
            "coordinates": [self.longitude, self.latitude],
            "formattedAddress": self.formatted_address,
            "street": self.street,
            "city": self.city,
            "state": self.state,
            "zipcode": self.zipcode,
            "country": self.country,
        })
    }
}

/// Geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeocodeError {
    /// Provider could not be reached
    #[error("geocoding request failed: {0}")]
    Request(String),

    /// Provider answered with an error status
    #[error("geocoding provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// Provider answer could not be decoded
    #[error("unexpected geocoding response: {0}")]
    Decode(String),

    /// Provider is misconfigured
    #[error("geocoder misconfigured: {0}")]
    Config(String),
}

/// Postal code / address resolution
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Vec<GeoLocation>, GeocodeError>;
}

/// Provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    Mapquest,
    Static,
}

/// A fixed answer for the static provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticEntry {
    pub query: String,
    #[serde(flatten)]
    pub location: GeoLocation,
}

/// Geocoder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_provider")]
    pub provider: GeocoderProvider,

    /// API key (mapquest)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Answers for the static provider
    #[serde(default)]
    pub entries: Vec<StaticEntry>,
}

fn default_provider() -> GeocoderProvider {
    GeocoderProvider::Static
}

fn default_base_url() -> String {
    "https://www.mapquestapi.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            entries: Vec::new(),
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Build the configured geocoder
pub fn from_config(config: &GeocoderConfig) -> Result<Arc<dyn Geocoder>, GeocodeError> {
    match config.provider {
        GeocoderProvider::Mapquest => {
            let api_key = config
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| GeocodeError::Config("mapquest requires an api_key".to_string()))?;
            let geocoder = MapQuestGeocoder::new(&config.base_url, api_key, config.timeout())?;
            Ok(Arc::new(geocoder))
        }
        GeocoderProvider::Static => Ok(Arc::new(StaticGeocoder::from_entries(&config.entries))),
    }
}
