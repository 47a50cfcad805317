//! MapQuest geocoding provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{GeoLocation, GeocodeError, Geocoder};

/// Client for the MapQuest `geocoding/v1/address` endpoint
pub struct MapQuestGeocoder {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl MapQuestGeocoder {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, GeocodeError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AddressResponse {
    info: Info,
    #[serde(default)]
    results: Vec<AddressResult>,
}

#[derive(Debug, Deserialize)]
struct Info {
    statuscode: i64,
    #[serde(default)]
    messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AddressResult {
    #[serde(default)]
    locations: Vec<MapQuestLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapQuestLocation {
    lat_lng: LatLng,
    #[serde(default)]
    street: String,
    /// City
    #[serde(default)]
    admin_area5: String,
    /// State
    #[serde(default)]
    admin_area3: String,
    /// Country
    #[serde(default)]
    admin_area1: String,
    #[serde(default)]
    postal_code: String,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<MapQuestLocation> for GeoLocation {
    fn from(loc: MapQuestLocation) -> Self {
        let state_zip = [loc.admin_area3.trim(), loc.postal_code.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let formatted = [loc.street.trim(), loc.admin_area5.trim(), state_zip.as_str(), loc.admin_area1.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        GeoLocation {
            latitude: loc.lat_lng.lat,
            longitude: loc.lat_lng.lng,
            formatted_address: non_empty(formatted),
            street: non_empty(loc.street),
            city: non_empty(loc.admin_area5),
            state: non_empty(loc.admin_area3),
            zipcode: non_empty(loc.postal_code),
            country: non_empty(loc.admin_area1),
        }
    }
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeoLocation>, GeocodeError> {
        let url = format!("{}/geocoding/v1/address", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("location", query)])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: AddressResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;

        if body.info.statuscode != 0 {
            return Err(GeocodeError::Provider {
                status: status.as_u16(),
                message: body.info.messages.join("; "),
            });
        }

        let locations: Vec<GeoLocation> = body
            .results
            .into_iter()
            .flat_map(|result| result.locations)
            .map(GeoLocation::from)
            .collect();

        tracing::debug!(query, found = locations.len(), "mapquest geocode");
        Ok(locations)
    }
}
