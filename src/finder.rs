//! Wiring of the client core from a [`ClientConfig`].

use std::sync::Arc;

use crate::client::{HttpShelterRepository, ShelterRepository};
use crate::config::ClientConfig;
use crate::errors::Result;
use crate::location::LocationProvider;
use crate::models::{Coordinates, Shelter};
use crate::moderation::ModerationWorkflow;
use crate::places::GooglePlacesClient;
use crate::reconcile::{RefreshOutcome, ReconciliationEngine};
use crate::session::{FileSecretStore, SecretStore, SessionManager};
use crate::settings::SearchSettings;

/// All core components, sharing one session store and one backend client.
pub struct ShelterFinder {
    config: ClientConfig,
    repository: Arc<dyn ShelterRepository>,
    session: Arc<SessionManager>,
    settings: SearchSettings,
    engine: ReconciliationEngine,
    moderation: ModerationWorkflow,
}

impl ShelterFinder {
    /// Build the core with a durable file store at `config.store_path`.
    pub fn new(config: ClientConfig, location: Arc<dyn LocationProvider>) -> Result<Self> {
        let store: Arc<dyn SecretStore> = Arc::new(FileSecretStore::new(&config.store_path));
        Self::with_store(config, location, store)
    }

    pub fn with_store(
        config: ClientConfig,
        location: Arc<dyn LocationProvider>,
        store: Arc<dyn SecretStore>,
    ) -> Result<Self> {
        let repository: Arc<dyn ShelterRepository> = Arc::new(HttpShelterRepository::new(&config)?);
        let session = Arc::new(SessionManager::new(&config, store.clone())?);
        let settings = SearchSettings::new(store);
        let engine = ReconciliationEngine::new(
            repository.clone(),
            Arc::new(GooglePlacesClient::new(&config)?),
            location,
            settings.clone(),
            config.places_keyword.clone(),
        );
        let moderation = ModerationWorkflow::new(repository.clone(), session.clone());

        Ok(Self {
            config,
            repository,
            session,
            settings,
            engine,
            moderation,
        })
    }

    /// Restore the session and load the first listing.
    pub async fn initialize(&self) -> Result<RefreshOutcome> {
        self.session.initialize().await?;
        self.engine.initialize().await
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Switch the display language used for provider lookups.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.config.set_language(language);
    }

    pub fn repository(&self) -> &Arc<dyn ShelterRepository> {
        &self.repository
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn listing(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn moderation(&self) -> &ModerationWorkflow {
        &self.moderation
    }

    /// Submit a shelter picked by the user.
    pub async fn submit(&self, name: &str, coordinates: Option<Coordinates>) -> Result<Shelter> {
        self.repository.submit(name, coordinates).await
    }

    /// Address of a selected shelter in the current display language.
    pub async fn address_of(&self, shelter: &Shelter) -> Option<String> {
        self.engine
            .address_of(shelter.coordinates, &self.config.language)
            .await
    }
}
