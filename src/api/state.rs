//! Shared handles carried by every request.

use std::sync::Arc;

use crate::geocoder::Geocoder;
use crate::store::{DocumentStore, InMemoryStore};

/// Application state injected through axum `State`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    /// Fresh in-memory store with the given geocoder
    pub fn in_memory(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), geocoder)
    }
}
