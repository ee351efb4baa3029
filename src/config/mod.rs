//! Configuration for the shelter backend and the client core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5001";

/// Backend configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Admin username; login is disabled when either credential is unset
    pub admin_username: Option<String>,
    /// Admin password
    pub admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("SHELTER_DB_PATH")
            .unwrap_or_else(|_| "./data/shelters.sqlite".to_string())
            .into();

        let bind_addr = env::var("SHELTER_BIND_ADDR")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Ignoring invalid SHELTER_BIND_ADDR {:?}: {}", raw, e);
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 5001)));

        let log_level = env::var("SHELTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            db_path,
            bind_addr,
            log_level,
            admin_username: env::var("SHELTER_ADMIN_USERNAME").ok(),
            admin_password: env::var("SHELTER_ADMIN_PASSWORD").ok(),
        }
    }

    /// Admin credentials, if both halves are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

/// Configuration for the client core.
///
/// Built once at startup and handed to the components that need it. The display language lives
/// here rather than in a global so the core never depends on ambient state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the shelter backend
    pub api_url: String,
    /// Key for the external place-search provider
    pub places_api_key: String,
    /// Base URL of the place-search provider
    pub places_base_url: String,
    /// Keyword sent with nearby searches
    pub places_keyword: String,
    /// Display language (`en`, `he`, ...)
    pub language: String,
    /// Durable key-value file holding the admin token and search radius
    pub store_path: PathBuf,
    /// Per-request timeout for backend and provider calls
    pub http_timeout: Duration,
    /// Extra attempts for idempotent reads; zero disables retries
    pub read_retries: u32,
    /// Label shown for shelters without a provider-supplied name
    pub shelter_label: String,
    /// Description used when a provider result carries no locality text
    pub external_description_fallback: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: format!("http://{}", DEFAULT_BIND_ADDR),
            places_api_key: String::new(),
            places_base_url: "https://maps.googleapis.com".to_string(),
            places_keyword: "bomb shelter".to_string(),
            language: "en".to_string(),
            store_path: "./data/client-store.json".into(),
            http_timeout: Duration::from_secs(15),
            read_retries: 0,
            shelter_label: "Bomb shelter".to_string(),
            external_description_fallback: "Google place".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            api_url: env::var("SHELTER_API_URL").unwrap_or(defaults.api_url),
            places_api_key: env::var("SHELTER_PLACES_API_KEY").unwrap_or(defaults.places_api_key),
            places_base_url: env::var("SHELTER_PLACES_BASE_URL")
                .unwrap_or(defaults.places_base_url),
            places_keyword: env::var("SHELTER_PLACES_KEYWORD").unwrap_or(defaults.places_keyword),
            language: env::var("SHELTER_LANGUAGE").unwrap_or(defaults.language),
            store_path: env::var("SHELTER_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            http_timeout: parse_var("SHELTER_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            read_retries: parse_var("SHELTER_READ_RETRIES").unwrap_or(defaults.read_retries),
            shelter_label: defaults.shelter_label,
            external_description_fallback: defaults.external_description_fallback,
        }
    }

    /// Switch the display language at runtime (user selection).
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn is_rtl(&self) -> bool {
        self.language == "he"
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {} value {:?}", name, raw);
            None
        }
    }
}
