//! Admin session lifecycle.
//!
//! [`SessionManager`] is the only writer of the persisted admin token. Every privileged call reads
//! it through [`SessionManager::bearer`], which fails with [`Error::Auth`] before any request is
//! built when no token is stored. Tokens do not expire on the client; the backend decides.

mod store;

pub use store::*;

use std::sync::Arc;

use reqwest::RequestBuilder;

use crate::config::ClientConfig;
use crate::errors::{Error, Result};
use crate::models::{Credentials, LoginResponse};

/// Store key holding the admin bearer token.
pub const TOKEN_KEY: &str = "adminToken";

/// An admin bearer token read from the session store.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Acquires, persists, attaches and clears the admin token.
pub struct SessionManager {
    client: reqwest::Client,
    base_url: String,
    store: Arc<dyn SecretStore>,
}

impl SessionManager {
    pub fn new(config: &ClientConfig, store: Arc<dyn SecretStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.api_url, store))
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        store: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Load the persisted token at startup, if any.
    pub async fn initialize(&self) -> Result<Option<BearerToken>> {
        let token = self.stored_token().await?;
        tracing::info!(
            "Session initialized ({})",
            if token.is_some() { "admin token present" } else { "no admin token" }
        );
        Ok(token)
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// On any failure the previously stored token, or its absence, is left untouched.
    pub async fn login(&self, credentials: &Credentials) -> Result<BearerToken> {
        if !credentials.is_complete() {
            return Err(Error::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let response = self
            .client
            .post(format!("{}/api/admin/login", self.base_url))
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Admin login failed with {}", status);
            return Err(Error::from_status(status, &body));
        }

        let LoginResponse { token } = response.json().await?;
        if token.trim().is_empty() {
            return Err(Error::Auth("Login response carried no token".to_string()));
        }

        self.store.set(TOKEN_KEY, &token).await?;
        tracing::info!("Admin session established");
        Ok(BearerToken(token))
    }

    /// The stored token, or [`Error::Auth`] when there is none.
    pub async fn bearer(&self) -> Result<BearerToken> {
        self.stored_token()
            .await?
            .ok_or_else(|| Error::Auth("No admin token stored".to_string()))
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.stored_token().await?.is_some())
    }

    /// Add the bearer header to a privileged request.
    pub fn attach(request: RequestBuilder, token: &BearerToken) -> RequestBuilder {
        request.bearer_auth(token.as_str())
    }

    /// Clear the stored token unconditionally.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear(TOKEN_KEY).await?;
        tracing::info!("Admin session cleared");
        Ok(())
    }

    async fn stored_token(&self) -> Result<Option<BearerToken>> {
        Ok(self
            .store
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty())
            .map(BearerToken))
    }
}
