//! Reconciliation of backend and external shelters into one listing.
//!
//! A refresh fans out to the backend registry and, once a position is known, to the place-search
//! provider. Both branches are awaited jointly; a failing branch contributes nothing and is
//! reported alongside the listing. Each refresh takes a generation number and a result is only
//! applied if no newer refresh has been applied first.
//!
//! Backend and external entries describing the same physical shelter are both kept. There is no
//! identity or proximity deduplication.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::ShelterRepository;
use crate::errors::{Error, Result};
use crate::location::{LocationProvider, PositionOptions};
use crate::models::{Coordinates, Shelter, Source};
use crate::places::PlaceSearchAdapter;
use crate::settings::SearchSettings;

/// The ordered list of shelters handed to presentation. Rebuilt on every refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedListing {
    shelters: Vec<Shelter>,
}

impl MergedListing {
    pub fn shelters(&self) -> &[Shelter] {
        &self.shelters
    }

    pub fn len(&self) -> usize {
        self.shelters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shelter> {
        self.shelters.iter()
    }

    pub fn count_from(&self, source: Source) -> usize {
        self.shelters.iter().filter(|s| s.source == source).count()
    }
}

/// Concatenate backend then external shelters, keeping each source's order.
///
/// Both inputs are approved by contract: the backend list endpoint filters, and provider places
/// are approved on construction. Nothing is dropped here.
pub fn merge(backend: Vec<Shelter>, external: Vec<Shelter>) -> MergedListing {
    let shelters: Vec<Shelter> = backend.into_iter().chain(external).collect();
    MergedListing { shelters }
}

/// A source branch that failed during a refresh.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: Source,
    pub error: Error,
}

/// Result of a refresh that was applied to the listing.
#[derive(Debug)]
pub struct RefreshReport {
    pub generation: u64,
    pub listing: MergedListing,
    pub failures: Vec<SourceFailure>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub enum RefreshOutcome {
    Applied(RefreshReport),
    /// A newer refresh was applied first; this result was discarded.
    Stale { generation: u64 },
}

#[derive(Debug, Default)]
struct ListingState {
    applied_generation: u64,
    listing: MergedListing,
}

/// Drives refreshes and holds the current listing.
pub struct ReconciliationEngine {
    repository: Arc<dyn ShelterRepository>,
    places: Arc<dyn PlaceSearchAdapter>,
    location: Arc<dyn LocationProvider>,
    settings: SearchSettings,
    keyword: String,
    position_options: PositionOptions,
    generation: AtomicU64,
    state: RwLock<ListingState>,
}

impl ReconciliationEngine {
    pub fn new(
        repository: Arc<dyn ShelterRepository>,
        places: Arc<dyn PlaceSearchAdapter>,
        location: Arc<dyn LocationProvider>,
        settings: SearchSettings,
        keyword: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            places,
            location,
            settings,
            keyword: keyword.into(),
            position_options: PositionOptions::map_screen(),
            generation: AtomicU64::new(0),
            state: RwLock::new(ListingState::default()),
        }
    }

    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.position_options = options;
        self
    }

    /// First load, equivalent to a refresh.
    pub async fn initialize(&self) -> Result<RefreshOutcome> {
        tracing::info!("Initializing shelter listing");
        self.refresh().await
    }

    /// Rebuild the listing from both sources.
    ///
    /// Fails only when no position could be obtained, in which case the listing is unchanged.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let radius = self.settings.radius().await;

        let (backend, external) = tokio::join!(
            self.repository.list_approved(),
            self.fetch_external(radius)
        );

        let external = match external {
            Err(Error::Location(e)) => {
                tracing::warn!("Refresh {} skipped, no location: {}", generation, e);
                return Err(Error::Location(e));
            }
            other => other,
        };

        let mut failures = Vec::new();
        let backend = unwrap_branch(Source::Backend, backend, &mut failures);
        let external = unwrap_branch(Source::External, external, &mut failures);

        let mut state = self.state.write().await;
        if generation < state.applied_generation {
            tracing::debug!(
                "Discarding refresh {} (generation {} already applied)",
                generation,
                state.applied_generation
            );
            return Ok(RefreshOutcome::Stale { generation });
        }

        // With both branches down, keep showing what we had
        if backend.is_some() || external.is_some() {
            state.listing = merge(backend.unwrap_or_default(), external.unwrap_or_default());
        }
        state.applied_generation = generation;

        tracing::info!(
            "Refresh {} applied: {} shelters ({} failed sources)",
            generation,
            state.listing.len(),
            failures.len()
        );

        Ok(RefreshOutcome::Applied(RefreshReport {
            generation,
            listing: state.listing.clone(),
            failures,
        }))
    }

    async fn fetch_external(&self, radius: u32) -> Result<Vec<Shelter>> {
        let center = self
            .location
            .current_position(&self.position_options)
            .await?;
        self.places
            .nearby_search(center, radius, &self.keyword)
            .await
    }

    /// The listing as of the last applied refresh.
    pub async fn listing(&self) -> MergedListing {
        self.state.read().await.listing.clone()
    }

    /// Address for a selected shelter, or `None` if the provider cannot resolve it.
    pub async fn address_of(&self, at: Coordinates, language: &str) -> Option<String> {
        match self.places.reverse_geocode(at, language).await {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!("Reverse geocode failed: {}", e);
                None
            }
        }
    }
}

fn unwrap_branch(
    source: Source,
    result: Result<Vec<Shelter>>,
    failures: &mut Vec<SourceFailure>,
) -> Option<Vec<Shelter>> {
    match result {
        Ok(shelters) => Some(shelters),
        Err(error) => {
            tracing::error!("Fetching {} shelters failed: {}", source, error);
            failures.push(SourceFailure { source, error });
            None
        }
    }
}
