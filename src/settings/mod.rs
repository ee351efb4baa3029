//! User preferences persisted next to the session token.

use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::session::SecretStore;

/// Store key holding the search radius in meters.
pub const RADIUS_KEY: &str = "radius";

pub const DEFAULT_RADIUS_METERS: u32 = 5000;

/// Upper bound accepted by the place-search provider.
pub const MAX_RADIUS_METERS: u32 = 50_000;

/// Reads and writes the user-configurable search radius.
#[derive(Clone)]
pub struct SearchSettings {
    store: Arc<dyn SecretStore>,
}

impl SearchSettings {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// The persisted radius, or the default when unset or unreadable.
    pub async fn radius(&self) -> u32 {
        match self.store.get(RADIUS_KEY).await {
            Ok(Some(raw)) => match raw.trim().parse::<u32>() {
                Ok(meters) if meters > 0 => meters.min(MAX_RADIUS_METERS),
                _ => {
                    tracing::warn!("Ignoring invalid stored radius {:?}", raw);
                    DEFAULT_RADIUS_METERS
                }
            },
            Ok(None) => DEFAULT_RADIUS_METERS,
            Err(e) => {
                tracing::warn!("Could not read search radius: {}", e);
                DEFAULT_RADIUS_METERS
            }
        }
    }

    pub async fn set_radius(&self, meters: u32) -> Result<()> {
        if meters == 0 || meters > MAX_RADIUS_METERS {
            return Err(Error::Validation(format!(
                "Radius must be between 1 and {} meters",
                MAX_RADIUS_METERS
            )));
        }
        self.store.set(RADIUS_KEY, &meters.to_string()).await
    }
}
