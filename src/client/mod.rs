//! Backend client for the shelter registry.

mod retry;

pub use retry::*;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::errors::{Error, Result};
use crate::models::{Coordinates, CreateShelterRequest, ModerationStatus, Shelter, Source};
use crate::session::{BearerToken, SessionManager};

/// Operations the core performs against the shelter registry.
#[async_trait]
pub trait ShelterRepository: Send + Sync {
    /// Approved backend shelters. Filtering is the backend's responsibility.
    async fn list_approved(&self) -> Result<Vec<Shelter>>;

    /// Submit a new shelter; it starts out pending.
    async fn submit(&self, name: &str, coordinates: Option<Coordinates>) -> Result<Shelter>;

    async fn list_pending(&self, token: &BearerToken) -> Result<Vec<Shelter>>;

    async fn approve(&self, id: &str, token: &BearerToken) -> Result<()>;

    async fn reject(&self, id: &str, token: &BearerToken) -> Result<()>;
}

/// [`ShelterRepository`] over the backend REST API.
pub struct HttpShelterRepository {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpShelterRepository {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.api_url).with_retry(RetryPolicy::new(
            config.read_retries,
        )))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(Error::from_status(status, &body))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        Ok(self.send(request).await?.json().await?)
    }
}

#[async_trait]
impl ShelterRepository for HttpShelterRepository {
    async fn list_approved(&self) -> Result<Vec<Shelter>> {
        let mut shelters: Vec<Shelter> = self
            .retry
            .run("list approved shelters", move || {
                self.fetch_list(self.client.get(self.url("/api/shelters")))
            })
            .await?;
        // The endpoint only serves approved shelters, whatever status field the payload carries
        for shelter in &mut shelters {
            shelter.source = Source::Backend;
            shelter.moderation_status = ModerationStatus::Approved;
        }
        tracing::debug!("Backend returned {} approved shelters", shelters.len());
        Ok(shelters)
    }

    async fn submit(&self, name: &str, coordinates: Option<Coordinates>) -> Result<Shelter> {
        let Some(coordinates) = coordinates else {
            return Err(Error::Validation("Coordinates are required".to_string()));
        };
        let request = CreateShelterRequest::new(name, coordinates);
        request.validate().map_err(Error::Validation)?;

        let response = self
            .send(self.client.post(self.url("/api/shelters")).json(&request))
            .await?;
        let shelter: Shelter = response.json().await?;
        tracing::info!("Submitted shelter {} for moderation", shelter.id);
        Ok(shelter)
    }

    async fn list_pending(&self, token: &BearerToken) -> Result<Vec<Shelter>> {
        let request = SessionManager::attach(
            self.client.get(self.url("/api/admin/shelters/pending")),
            token,
        );
        self.fetch_list(request).await
    }

    async fn approve(&self, id: &str, token: &BearerToken) -> Result<()> {
        let request = SessionManager::attach(
            self.client
                .patch(self.url(&format!("/api/admin/shelters/approve/{}", id))),
            token,
        );
        self.send(request).await?;
        Ok(())
    }

    async fn reject(&self, id: &str, token: &BearerToken) -> Result<()> {
        let request = SessionManager::attach(
            self.client
                .delete(self.url(&format!("/api/admin/shelters/reject/{}", id))),
            token,
        );
        self.send(request).await?;
        Ok(())
    }
}
