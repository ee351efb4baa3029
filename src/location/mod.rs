//! Device positioning.
//!
//! The sensor itself belongs to the host platform; the core only sees a [`LocationProvider`].
//! A missing fix is never fatal: callers treat it as "cannot refresh yet".

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::LocationError;
use crate::models::Coordinates;

/// Options for a single position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    /// How long to wait for the sensor before giving up
    pub timeout: Duration,
    /// A cached fix younger than this is returned without asking the sensor
    pub max_age: Duration,
}

impl PositionOptions {
    /// Options used when locating the user for the nearby-shelter listing.
    pub fn map_screen() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
            max_age: Duration::from_secs(10),
        }
    }

    /// Options used when the user explicitly asks for their current GPS position.
    pub fn settings_screen() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(20),
            max_age: Duration::from_secs(1),
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::map_screen()
    }
}

/// Source of the user's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError>;
}

/// A location pinned by the user in settings instead of read from GPS.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

/// Wraps a sensor-backed provider with `timeout` enforcement and `max_age` caching.
pub struct CachedLocation<P> {
    inner: P,
    last_fix: Mutex<Option<(Coordinates, Instant)>>,
}

impl<P: LocationProvider> CachedLocation<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            last_fix: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<P: LocationProvider> LocationProvider for CachedLocation<P> {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        if let Some((coordinates, taken_at)) = *self.last_fix.lock().await {
            if taken_at.elapsed() <= options.max_age {
                tracing::debug!("Using cached location fix");
                return Ok(coordinates);
            }
        }

        let fix = tokio::time::timeout(options.timeout, self.inner.current_position(options))
            .await
            .map_err(|_| LocationError::Timeout)??;

        *self.last_fix.lock().await = Some((fix, Instant::now()));
        Ok(fix)
    }
}
