//! External place-search provider.
//!
//! Provider results are read-only and best-effort. They are normalized into [`Shelter`] values
//! with `source = external`, which are approved by convention.

use async_trait::async_trait;
use serde::Deserialize;

use crate::client::RetryPolicy;
use crate::config::ClientConfig;
use crate::errors::{Error, Result};
use crate::models::{Coordinates, Shelter};

/// Read-only access to an external place-search provider.
#[async_trait]
pub trait PlaceSearchAdapter: Send + Sync {
    /// Candidate shelters within `radius_meters` of `center`.
    async fn nearby_search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<Vec<Shelter>>;

    /// Human-readable address for a coordinate, if the provider knows one.
    async fn reverse_geocode(&self, at: Coordinates, language: &str) -> Result<Option<String>>;
}

/// A nearby-search result as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalPlace {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub vicinity: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl ExternalPlace {
    /// Normalize into the common shelter shape.
    pub fn into_shelter(self, label: &str, description_fallback: &str) -> Shelter {
        let description = self
            .vicinity
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| description_fallback.to_string());
        Shelter::external(
            self.place_id,
            label,
            Coordinates::new(self.geometry.location.lat, self.geometry.location.lng),
            description,
        )
    }
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    results: Vec<ExternalPlace>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

/// Google Places / Geocoding client.
pub struct GooglePlacesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    shelter_label: String,
    description_fallback: String,
    retry: RetryPolicy,
}

impl GooglePlacesClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        if config.places_api_key.is_empty() {
            tracing::warn!("No places API key configured (SHELTER_PLACES_API_KEY)");
        }

        Ok(Self {
            client,
            base_url: config.places_base_url.trim_end_matches('/').to_string(),
            api_key: config.places_api_key.clone(),
            shelter_label: config.shelter_label.clone(),
            description_fallback: config.external_description_fallback.clone(),
            retry: RetryPolicy::new(config.read_retries),
        })
    }

    async fn fetch_nearby(
        &self,
        center: Coordinates,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<NearbySearchResponse> {
        let response = self
            .client
            .get(format!("{}/maps/api/place/nearbysearch/json", self.base_url))
            .query(&[
                ("location", center.to_query()),
                ("radius", radius_meters.to_string()),
                ("keyword", keyword.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Network(format!("Place search failed: {}", e)))?;

        Ok(response.json().await?)
    }
}

/// Provider statuses that still carry a usable (possibly empty) result set.
fn check_status(status: Option<&str>, error_message: Option<&str>) -> Result<()> {
    match status {
        None | Some("OK") | Some("ZERO_RESULTS") => Ok(()),
        Some(other) => Err(Error::Network(format!(
            "Provider returned {}{}",
            other,
            error_message
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        ))),
    }
}

#[async_trait]
impl PlaceSearchAdapter for GooglePlacesClient {
    async fn nearby_search(
        &self,
        center: Coordinates,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<Vec<Shelter>> {
        let response = self
            .retry
            .run("nearby search", move || {
                self.fetch_nearby(center, radius_meters, keyword)
            })
            .await?;
        check_status(response.status.as_deref(), response.error_message.as_deref())?;

        let shelters: Vec<Shelter> = response
            .results
            .into_iter()
            .map(|place| place.into_shelter(&self.shelter_label, &self.description_fallback))
            .filter(|shelter| match shelter.coordinates.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Dropping provider place {}: {}", shelter.id, e);
                    false
                }
            })
            .collect();

        tracing::debug!(
            "Provider returned {} places within {}m",
            shelters.len(),
            radius_meters
        );
        Ok(shelters)
    }

    async fn reverse_geocode(&self, at: Coordinates, language: &str) -> Result<Option<String>> {
        let response: GeocodeResponse = self
            .client
            .get(format!("{}/maps/api/geocode/json", self.base_url))
            .query(&[
                ("latlng", at.to_query()),
                ("key", self.api_key.clone()),
                ("language", language.to_string()),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Network(format!("Reverse geocode failed: {}", e)))?
            .json()
            .await?;
        check_status(response.status.as_deref(), response.error_message.as_deref())?;

        Ok(response
            .results
            .into_iter()
            .next()
            .map(|r| r.formatted_address))
    }
}
