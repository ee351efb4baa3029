//! Integration tests: the real backend router plus a fake place-search provider, driven through
//! the client core.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::{self, Next},
    routing::get,
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::client::{HttpShelterRepository, ShelterRepository};
use crate::config::{ClientConfig, Config};
use crate::db::{init_database, Repository};
use crate::errors::{Error, LocationError};
use crate::location::{FixedLocation, LocationProvider, PositionOptions};
use crate::models::{Coordinates, Credentials, ModerationStatus, Shelter, Source};
use crate::moderation::ModerationWorkflow;
use crate::places::{GooglePlacesClient, PlaceSearchAdapter};
use crate::reconcile::{RefreshOutcome, RefreshReport, ReconciliationEngine};
use crate::session::{FileSecretStore, MemorySecretStore, SecretStore, SessionManager, TOKEN_KEY};
use crate::settings::SearchSettings;
use crate::{create_router, AppState};

const ADMIN_USER: &str = "admin@example.com";
const ADMIN_PASS: &str = "correct horse";

/// Requests seen by the backend.
#[derive(Default)]
struct BackendLog {
    hits: AtomicUsize,
    authorization: Mutex<Vec<Option<String>>>,
}

/// Behaviour of the fake place-search provider.
struct FakeProvider {
    places: Vec<Value>,
    delay: Duration,
    status: &'static str,
    address: Option<&'static str>,
    queries: Mutex<Vec<HashMap<String, String>>>,
}

impl FakeProvider {
    fn with_places(places: Vec<Value>) -> Self {
        Self {
            places,
            delay: Duration::ZERO,
            status: "OK",
            address: Some("Herzl St 5, Tel Aviv"),
            queries: Mutex::new(Vec::new()),
        }
    }
}

async fn fake_nearby(
    State(provider): State<Arc<FakeProvider>>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    provider.queries.lock().unwrap().push(query);
    tokio::time::sleep(provider.delay).await;
    Json(json!({ "status": provider.status, "results": provider.places }))
}

async fn fake_geocode(State(provider): State<Arc<FakeProvider>>) -> Json<Value> {
    match provider.address {
        Some(address) => Json(json!({
            "status": "OK",
            "results": [{ "formatted_address": address }]
        })),
        None => Json(json!({ "status": "ZERO_RESULTS", "results": [] })),
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    places_url: String,
    repo: Arc<Repository>,
    log: Arc<BackendLog>,
    provider: Arc<FakeProvider>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_provider(FakeProvider::with_places(Vec::new())).await
    }

    async fn with_provider(provider: FakeProvider) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        let config = Config {
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            admin_username: Some(ADMIN_USER.to_string()),
            admin_password: Some(ADMIN_PASS.to_string()),
        };

        let state = AppState {
            repo: repo.clone(),
            config: Arc::new(config),
        };

        let log = Arc::new(BackendLog::default());
        let recorder = log.clone();
        let app = create_router(state).layer(middleware::from_fn(
            move |req: Request, next: Next| {
                let recorder = recorder.clone();
                async move {
                    recorder.hits.fetch_add(1, Ordering::SeqCst);
                    let auth = req
                        .headers()
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string());
                    recorder.authorization.lock().unwrap().push(auth);
                    next.run(req).await
                }
            },
        ));
        let base_url = serve(app).await;

        let provider = Arc::new(provider);
        let places_app = Router::new()
            .route("/maps/api/place/nearbysearch/json", get(fake_nearby))
            .route("/maps/api/geocode/json", get(fake_geocode))
            .with_state(provider.clone());
        let places_url = serve(places_app).await;

        TestFixture {
            client: Client::new(),
            base_url,
            places_url,
            repo,
            log,
            provider,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.base_url.clone(),
            places_base_url: self.places_url.clone(),
            places_api_key: "test-key".to_string(),
            http_timeout: Duration::from_millis(500),
            ..ClientConfig::default()
        }
    }

    fn shelter_repo(&self) -> Arc<HttpShelterRepository> {
        Arc::new(HttpShelterRepository::new(&self.client_config()).unwrap())
    }

    fn session(&self, store: Arc<dyn SecretStore>) -> Arc<SessionManager> {
        Arc::new(SessionManager::new(&self.client_config(), store).unwrap())
    }

    fn engine(
        &self,
        repository: Arc<dyn ShelterRepository>,
        location: Arc<dyn LocationProvider>,
        store: Arc<dyn SecretStore>,
    ) -> ReconciliationEngine {
        let config = self.client_config();
        ReconciliationEngine::new(
            repository,
            Arc::new(GooglePlacesClient::new(&config).unwrap()),
            location,
            SearchSettings::new(store),
            config.places_keyword,
        )
    }

    async fn seed_approved(&self, name: &str, at: Coordinates) -> Shelter {
        let shelter = self.repo.create_shelter(name, at).await.unwrap();
        self.repo.approve_shelter(&shelter.id).await.unwrap();
        shelter
    }

    fn hits(&self) -> usize {
        self.log.hits.load(Ordering::SeqCst)
    }
}

fn place(id: &str, lat: f64, lng: f64) -> Value {
    json!({
        "place_id": id,
        "name": "Public shelter",
        "vicinity": "Herzl St 5",
        "geometry": { "location": { "lat": lat, "lng": lng } }
    })
}

fn here() -> Arc<dyn LocationProvider> {
    Arc::new(FixedLocation::new(Coordinates::new(32.0, 34.0)))
}

fn applied(outcome: RefreshOutcome) -> RefreshReport {
    match outcome {
        RefreshOutcome::Applied(report) => report,
        RefreshOutcome::Stale { generation } => panic!("refresh {} was stale", generation),
    }
}

// ==================== BACKEND ====================

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_submit_wire_shape() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/shelters"))
        .json(&json!({ "name": "Community hall", "latitude": 32.1, "longitude": 34.8 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert!(body["_id"].is_string());
    assert_eq!(body["name"], "Community hall");
    assert_eq!(body["moderationStatus"], "pending");
    assert_eq!(body["source"], "backend");

    // Pending shelters are not public
    let list: Value = fixture
        .client
        .get(fixture.url("/api/shelters"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_submit_validation_server_side() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/shelters"))
        .json(&json!({ "name": "No coordinates" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(fixture.repo.list_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_moderation_routes_require_bearer() {
    let fixture = TestFixture::new().await;
    let shelter = fixture
        .repo
        .create_shelter("Hall", Coordinates::new(32.0, 34.0))
        .await
        .unwrap();

    let missing = fixture
        .client
        .get(fixture.url("/api/admin/shelters/pending"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 401);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let forged = fixture
        .client
        .patch(fixture.url(&format!("/api/admin/shelters/approve/{}", shelter.id)))
        .bearer_auth("not-a-session")
        .send()
        .await
        .unwrap();
    assert_eq!(forged.status(), 401);

    let stored = fixture.repo.get_shelter(&shelter.id).await.unwrap().unwrap();
    assert_eq!(stored.moderation_status, ModerationStatus::Pending);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/admin/login"))
        .json(&json!({ "username": ADMIN_USER, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

// ==================== SESSION ====================

#[tokio::test]
async fn test_login_persists_token_and_attaches_it() {
    let fixture = TestFixture::new().await;
    let store = Arc::new(MemorySecretStore::new());
    let session = fixture.session(store.clone());

    let token = session
        .login(&Credentials::new(ADMIN_USER, ADMIN_PASS))
        .await
        .unwrap();
    assert_eq!(
        store.get(TOKEN_KEY).await.unwrap().as_deref(),
        Some(token.as_str())
    );

    let workflow = ModerationWorkflow::new(fixture.shelter_repo(), session.clone());
    workflow.load_pending().await.unwrap();

    let last_auth = fixture.log.authorization.lock().unwrap().last().cloned();
    assert_eq!(last_auth, Some(Some(format!("Bearer {}", token.as_str()))));
}

#[tokio::test]
async fn test_failed_login_keeps_previous_token() {
    let fixture = TestFixture::new().await;
    let store = Arc::new(MemorySecretStore::new());
    let session = fixture.session(store.clone());

    // No prior token: still none afterwards
    let err = session
        .login(&Credentials::new(ADMIN_USER, "wrong"))
        .await
        .unwrap_err();
    assert!(err.is_auth());
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);

    // Prior token: left untouched
    store.set(TOKEN_KEY, "earlier-token").await.unwrap();
    let err = session
        .login(&Credentials::new("intruder", ADMIN_PASS))
        .await
        .unwrap_err();
    assert!(err.is_auth());
    assert_eq!(
        store.get(TOKEN_KEY).await.unwrap().as_deref(),
        Some("earlier-token")
    );
}

#[tokio::test]
async fn test_token_survives_restart_with_file_store() {
    let fixture = TestFixture::new().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client-store.json");

    let token = fixture
        .session(Arc::new(FileSecretStore::new(&path)))
        .login(&Credentials::new(ADMIN_USER, ADMIN_PASS))
        .await
        .unwrap();

    let restarted = fixture.session(Arc::new(FileSecretStore::new(&path)));
    assert_eq!(restarted.initialize().await.unwrap(), Some(token));

    restarted.logout().await.unwrap();
    let after_logout = fixture.session(Arc::new(FileSecretStore::new(&path)));
    assert!(after_logout.bearer().await.unwrap_err().is_auth());
}

#[tokio::test]
async fn test_privileged_call_without_token_sends_nothing() {
    let fixture = TestFixture::new().await;
    let session = fixture.session(Arc::new(MemorySecretStore::new()));
    let workflow = ModerationWorkflow::new(fixture.shelter_repo(), session);
    let before = fixture.hits();

    assert!(workflow.load_pending().await.unwrap_err().is_auth());
    assert!(workflow.approve("anything").await.unwrap_err().is_auth());
    assert!(workflow.reject("anything").await.unwrap_err().is_auth());

    assert_eq!(fixture.hits(), before);
}

// ==================== MODERATION ====================

#[tokio::test]
async fn test_approve_moves_shelter_to_public_list() {
    let fixture = TestFixture::new().await;
    let repo = fixture.shelter_repo();
    let session = fixture.session(Arc::new(MemorySecretStore::new()));
    session
        .login(&Credentials::new(ADMIN_USER, ADMIN_PASS))
        .await
        .unwrap();

    let submitted = repo
        .submit("Community hall", Some(Coordinates::new(32.1, 34.8)))
        .await
        .unwrap();
    assert_eq!(submitted.moderation_status, ModerationStatus::Pending);

    let workflow = ModerationWorkflow::new(repo.clone(), session);
    let pending = workflow.initialize().await.unwrap();
    assert!(pending.iter().any(|s| s.id == submitted.id));

    let status = workflow.approve(&submitted.id).await.unwrap();
    assert_eq!(status, ModerationStatus::Approved);
    assert!(workflow.pending().await.is_empty());

    let approved = repo.list_approved().await.unwrap();
    assert!(approved.iter().any(|s| s.id == submitted.id));
    assert!(approved.iter().all(Shelter::is_approved));
    assert!(!workflow
        .load_pending()
        .await
        .unwrap()
        .iter()
        .any(|s| s.id == submitted.id));

    // Terminal: a second approval is NotFound, not a silent success
    assert!(matches!(
        workflow.approve(&submitted.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_reject_removes_shelter_everywhere() {
    let fixture = TestFixture::new().await;
    let repo = fixture.shelter_repo();
    let session = fixture.session(Arc::new(MemorySecretStore::new()));
    session
        .login(&Credentials::new(ADMIN_USER, ADMIN_PASS))
        .await
        .unwrap();

    let submitted = repo
        .submit("Parking garage", Some(Coordinates::new(31.77, 35.21)))
        .await
        .unwrap();

    let workflow = ModerationWorkflow::new(repo.clone(), session);
    workflow.load_pending().await.unwrap();
    let status = workflow.reject(&submitted.id).await.unwrap();
    assert_eq!(status, ModerationStatus::Rejected);

    for _ in 0..2 {
        assert!(!workflow
            .load_pending()
            .await
            .unwrap()
            .iter()
            .any(|s| s.id == submitted.id));
        assert!(!repo
            .list_approved()
            .await
            .unwrap()
            .iter()
            .any(|s| s.id == submitted.id));
    }
    assert!(fixture.repo.get_shelter(&submitted.id).await.unwrap().is_none());
    assert!(matches!(
        workflow.reject(&submitted.id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_moderation_surfaces_not_found() {
    let fixture = TestFixture::new().await;
    let repo = fixture.shelter_repo();
    let submitted = repo
        .submit("Hall", Some(Coordinates::new(32.0, 34.0)))
        .await
        .unwrap();

    let first = fixture.session(Arc::new(MemorySecretStore::new()));
    let second = fixture.session(Arc::new(MemorySecretStore::new()));
    for session in [&first, &second] {
        session
            .login(&Credentials::new(ADMIN_USER, ADMIN_PASS))
            .await
            .unwrap();
    }

    let admin_a = ModerationWorkflow::new(repo.clone(), first);
    let admin_b = ModerationWorkflow::new(repo.clone(), second);
    admin_a.load_pending().await.unwrap();
    admin_b.load_pending().await.unwrap();

    admin_a.approve(&submitted.id).await.unwrap();
    assert!(matches!(
        admin_b.reject(&submitted.id).await,
        Err(Error::NotFound(_))
    ));
    // The stale entry is dropped from the second admin's queue
    assert!(admin_b.pending().await.is_empty());
    assert!(fixture.repo.get_shelter(&submitted.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_client_side_submit_validation() {
    let fixture = TestFixture::new().await;
    let repo = fixture.shelter_repo();
    let before = fixture.hits();

    assert!(matches!(
        repo.submit("Hall", None).await,
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        repo.submit("", Some(Coordinates::new(32.0, 34.0))).await,
        Err(Error::Validation(_))
    ));
    assert_eq!(fixture.hits(), before);
}

// ==================== RECONCILIATION ====================

#[tokio::test]
async fn test_merge_keeps_backend_and_nearby_external() {
    let fixture =
        TestFixture::with_provider(FakeProvider::with_places(vec![place("ChIJ1", 32.0008, 34.0008)]))
            .await;
    let seeded = fixture
        .seed_approved("Shelter 1", Coordinates::new(32.0, 34.0))
        .await;

    let engine = fixture.engine(
        fixture.shelter_repo(),
        here(),
        Arc::new(MemorySecretStore::new()),
    );
    let report = applied(engine.initialize().await.unwrap());

    assert!(report.is_complete());
    assert_eq!(report.listing.len(), 2);
    let shelters = report.listing.shelters();
    assert_eq!(shelters[0].id, seeded.id);
    assert_eq!(shelters[0].source, Source::Backend);
    assert_eq!(shelters[1].id, "ChIJ1");
    assert_eq!(shelters[1].source, Source::External);
    assert_eq!(shelters[1].description, "Herzl St 5");
    assert!(shelters.iter().all(Shelter::is_approved));
    assert_eq!(engine.listing().await, report.listing);
}

#[tokio::test]
async fn test_backend_records_without_status_field_are_listed() {
    let fixture =
        TestFixture::with_provider(FakeProvider::with_places(vec![place("ChIJ1", 32.0008, 34.0008)]))
            .await;
    let legacy_backend = Router::new().route(
        "/api/shelters",
        get(|| async {
            Json(json!([
                { "_id": "1", "name": "Hall", "lat": 32.0, "lng": 34.0, "approved": true }
            ]))
        }),
    );
    let config = ClientConfig {
        api_url: serve(legacy_backend).await,
        ..fixture.client_config()
    };
    let repository = Arc::new(HttpShelterRepository::new(&config).unwrap());

    let backend = repository.list_approved().await.unwrap();
    assert_eq!(backend.len(), 1);
    assert_eq!(backend[0].moderation_status, ModerationStatus::Approved);
    assert_eq!(backend[0].coordinates, Coordinates::new(32.0, 34.0));

    let engine = fixture.engine(repository, here(), Arc::new(MemorySecretStore::new()));
    let report = applied(engine.refresh().await.unwrap());
    let ids: Vec<&str> = report.listing.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "ChIJ1"]);
}

#[tokio::test]
async fn test_provider_timeout_degrades_to_backend_only() {
    let mut provider = FakeProvider::with_places(vec![place("slow", 32.0, 34.0)]);
    provider.delay = Duration::from_secs(3);
    let fixture = TestFixture::with_provider(provider).await;
    let seeded = fixture
        .seed_approved("Shelter 1", Coordinates::new(32.0, 34.0))
        .await;

    let engine = fixture.engine(
        fixture.shelter_repo(),
        here(),
        Arc::new(MemorySecretStore::new()),
    );
    let report = applied(engine.refresh().await.unwrap());

    assert_eq!(report.listing.len(), 1);
    assert_eq!(report.listing.shelters()[0].id, seeded.id);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, Source::External);
    assert!(report.failures[0].error.is_network());
}

#[tokio::test]
async fn test_provider_error_status_is_a_failed_branch() {
    let mut provider = FakeProvider::with_places(Vec::new());
    provider.status = "REQUEST_DENIED";
    let fixture = TestFixture::with_provider(provider).await;
    fixture
        .seed_approved("Shelter 1", Coordinates::new(32.0, 34.0))
        .await;

    let engine = fixture.engine(
        fixture.shelter_repo(),
        here(),
        Arc::new(MemorySecretStore::new()),
    );
    let report = applied(engine.refresh().await.unwrap());
    assert_eq!(report.listing.count_from(Source::Backend), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, Source::External);
}

#[tokio::test]
async fn test_backend_down_keeps_external_results() {
    let fixture =
        TestFixture::with_provider(FakeProvider::with_places(vec![place("p1", 32.0, 34.0)]))
            .await;
    let unreachable: Arc<dyn ShelterRepository> = Arc::new(HttpShelterRepository::with_client(
        Client::new(),
        "http://127.0.0.1:9",
    ));

    let engine = fixture.engine(unreachable, here(), Arc::new(MemorySecretStore::new()));
    let report = applied(engine.refresh().await.unwrap());

    assert_eq!(report.listing.len(), 1);
    assert_eq!(report.listing.shelters()[0].source, Source::External);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, Source::Backend);
}

#[tokio::test]
async fn test_refresh_without_location_leaves_listing() {
    struct NoFix;

    #[async_trait]
    impl LocationProvider for NoFix {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    let fixture = TestFixture::new().await;
    fixture
        .seed_approved("Shelter 1", Coordinates::new(32.0, 34.0))
        .await;

    let engine = fixture.engine(
        fixture.shelter_repo(),
        Arc::new(NoFix),
        Arc::new(MemorySecretStore::new()),
    );
    let err = engine.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Location(LocationError::PermissionDenied)
    ));
    assert!(engine.listing().await.is_empty());
    assert!(fixture.provider.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_radius_setting_bounds_provider_query() {
    let fixture = TestFixture::new().await;
    let store = Arc::new(MemorySecretStore::new());
    SearchSettings::new(store.clone())
        .set_radius(1500)
        .await
        .unwrap();

    let engine = fixture.engine(fixture.shelter_repo(), here(), store);
    applied(engine.refresh().await.unwrap());

    let queries = fixture.provider.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0]["radius"], "1500");
    assert_eq!(queries[0]["location"], "32,34");
    assert_eq!(queries[0]["keyword"], "bomb shelter");
    assert_eq!(queries[0]["key"], "test-key");
}

#[tokio::test]
async fn test_reverse_geocode_for_selected_shelter() {
    let fixture = TestFixture::new().await;
    let engine = fixture.engine(
        fixture.shelter_repo(),
        here(),
        Arc::new(MemorySecretStore::new()),
    );
    assert_eq!(
        engine
            .address_of(Coordinates::new(32.0, 34.0), "he")
            .await
            .as_deref(),
        Some("Herzl St 5, Tel Aviv")
    );

    let mut provider = FakeProvider::with_places(Vec::new());
    provider.address = None;
    let unknown = TestFixture::with_provider(provider).await;
    let places = GooglePlacesClient::new(&unknown.client_config()).unwrap();
    assert_eq!(
        places
            .reverse_geocode(Coordinates::new(32.0, 34.0), "en")
            .await
            .unwrap(),
        None
    );
}

// ==================== WIRING ====================

#[tokio::test]
async fn test_shelter_finder_end_to_end() {
    let fixture =
        TestFixture::with_provider(FakeProvider::with_places(vec![place("p1", 32.001, 34.001)]))
            .await;
    let dir = TempDir::new().unwrap();
    let config = ClientConfig {
        store_path: dir.path().join("store.json"),
        ..fixture.client_config()
    };

    let mut finder = crate::ShelterFinder::new(config, here()).unwrap();
    let report = applied(finder.initialize().await.unwrap());
    assert_eq!(report.listing.len(), 1);

    let submitted = finder
        .submit("Basement", Some(Coordinates::new(32.0, 34.0)))
        .await
        .unwrap();
    finder
        .session()
        .login(&Credentials::new(ADMIN_USER, ADMIN_PASS))
        .await
        .unwrap();
    finder.moderation().initialize().await.unwrap();
    finder.moderation().approve(&submitted.id).await.unwrap();

    let report = applied(finder.listing().refresh().await.unwrap());
    assert_eq!(report.listing.len(), 2);
    assert_eq!(report.listing.shelters()[0].id, submitted.id);

    finder.set_language("he");
    assert!(finder.config().is_rtl());
    assert_eq!(
        finder.address_of(&submitted).await.as_deref(),
        Some("Herzl St 5, Tel Aviv")
    );

    finder.settings().set_radius(800).await.unwrap();
    finder.listing().refresh().await.unwrap();
    let queries = fixture.provider.queries.lock().unwrap();
    assert_eq!(queries.last().unwrap()["radius"], "800");
}
