//! Common test utilities for growth-points integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use growth_points_core::{GenerationMode, UserId};
use growth_points_service::{
    auth::issue_token, create_router, AppState, Generate, GeneratedContent, GenerationError,
    ServiceConfig,
};
use growth_points_store::RocksStore;

pub const JWT_SECRET: &str = "test-secret";
pub const SERVICE_API_KEY: &str = "test-service-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct handle on the ledger for assertions.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test user for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a harness with no generation backend configured.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a harness with the given generation backend stub.
    pub fn with_generator(generator: Arc<dyn Generate>) -> Self {
        Self::build(Some(generator))
    }

    fn build(generator: Option<Arc<dyn Generate>>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: JWT_SECRET.into(),
            service_api_key: Some(SERVICE_API_KEY.into()),
            ..ServiceConfig::default()
        };

        let mut state = AppState::new(Arc::clone(&store), config);
        if let Some(generator) = generator {
            state = state.with_generator(generator);
        }
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
            test_user_id: UserId::generate(),
        }
    }

    /// Authorization header value for the harness test user.
    pub fn user_auth_header(&self) -> String {
        Self::auth_header_for(&self.test_user_id)
    }

    /// Authorization header value for an arbitrary user.
    pub fn auth_header_for(user_id: &UserId) -> String {
        let token =
            issue_token(user_id, JWT_SECRET, chrono::Duration::hours(1)).expect("token encode");
        format!("Bearer {token}")
    }

    /// Grant points to a user through the service API.
    pub async fn grant(&self, user_id: &UserId, amount: i64) {
        self.server
            .post("/v1/points/grant")
            .add_header("x-api-key", SERVICE_API_KEY)
            .json(&serde_json::json!({
                "user_id": user_id.to_string(),
                "amount": amount,
            }))
            .await
            .assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Generation stub that always succeeds and counts its calls.
pub struct StubGenerator {
    pub content: String,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            content: content.into(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl Generate for StubGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _mode: GenerationMode,
    ) -> Result<GeneratedContent, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedContent {
            content: self.content.clone(),
        })
    }
}

/// Generation stub that always fails.
pub struct FailingGenerator;

#[async_trait::async_trait]
impl Generate for FailingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _mode: GenerationMode,
    ) -> Result<GeneratedContent, GenerationError> {
        Err(GenerationError::Api {
            status: 500,
            message: "model backend exploded".into(),
        })
    }
}
