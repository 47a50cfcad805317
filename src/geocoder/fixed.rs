//! Table-driven geocoder for offline runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{GeoLocation, GeocodeError, Geocoder, StaticEntry};

/// Answers from a fixed query table; unknown queries resolve to nothing
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, GeoLocation>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[StaticEntry]) -> Self {
        entries
            .iter()
            .fold(Self::new(), |geocoder, entry| geocoder.with(&entry.query, entry.location.clone()))
    }

    pub fn with(mut self, query: &str, location: GeoLocation) -> Self {
        self.entries.insert(normalize(query), location);
        self
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeoLocation>, GeocodeError> {
        Ok(self.entries.get(&normalize(query)).cloned().into_iter().collect())
    }
}
