pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use dashboard::hooks::use_auth;
use dashboard::{AUTH_TOKEN_KEY, AppContext, CredentialStore, MemoryStorage};
use dashboard::telemetry;
use payloads::{MockTransport, User, requests};
use reqwest::Method;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub const STALE_TIME: Duration = Duration::from_secs(60);

/// A dashboard context over an in-memory mock backend.
///
/// The transport and storage are kept alongside the context so tests can
/// count requests and inspect the stored session.
pub struct TestApp {
    pub ctx: AppContext,
    pub transport: Arc<MockTransport>,
    pub storage: Arc<MemoryStorage>,
}

impl TestApp {
    /// Number of requests the backend has seen for `method` and `path`.
    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.transport.call_count(&method, path)
    }

    pub fn total_calls(&self) -> usize {
        self.transport.total_calls()
    }

    pub fn stored_token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY)
    }

    /// Sign in through the auth hook with [`admin_credentials`].
    pub async fn login(&self) -> anyhow::Result<User> {
        Ok(use_auth(&self.ctx).login(&admin_credentials()).await?)
    }
}

pub fn admin_credentials() -> requests::LoginCredentials {
    requests::LoginCredentials {
        email: "a@b.com".into(),
        password: "password".into(),
    }
}

/// Spawn a fresh app over the default mock: one second of latency and
/// request parameters ignored.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(MockTransport::new()).await
}

pub async fn spawn_app_with(transport: MockTransport) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    let transport = Arc::new(transport);
    let storage = Arc::new(MemoryStorage::new());
    let ctx = AppContext::new(transport.clone(), storage.clone(), STALE_TIME);

    TestApp {
        ctx,
        transport,
        storage,
    }
}
