pub mod config;
pub mod hooks;
pub mod pages;
pub mod query;
pub mod routes;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use payloads::{APIClient, ClientError, HttpTransport, MockTransport, Transport};
use secrecy::SecretString;

pub use config::{Config, ConfigError};
pub use query::{QueryClient, QueryError, QueryKey, QueryState, QueryStatus};
pub use routes::{Navigator, Route};
pub use session::SessionTransport;
pub use storage::{
    AUTH_TOKEN_KEY, CredentialStore, FileStorage, MemoryStorage, StorageError,
};

/// Everything the hooks and pages share: the API client, the read cache, the
/// credential store and the navigator.
///
/// Created once at start-up and passed around explicitly. Clones share the
/// same state.
#[derive(Clone)]
pub struct AppContext {
    pub client: APIClient,
    pub queries: QueryClient,
    pub storage: Arc<dyn CredentialStore>,
    pub navigator: Navigator,
}

impl AppContext {
    /// Wire a context around `transport`. Requests carry the token held in
    /// `storage`.
    pub fn new(
        transport: Arc<dyn Transport>,
        storage: Arc<dyn CredentialStore>,
        stale_time: Duration,
    ) -> Self {
        let navigator = Navigator::new();
        let session =
            SessionTransport::new(transport, storage.clone(), navigator.clone());
        Self {
            client: APIClient::new(Arc::new(session)),
            queries: QueryClient::new(stale_time),
            storage,
            navigator,
        }
    }

    /// Build the context described by `config`: the mock or HTTP transport,
    /// and a file-backed or in-memory credential store.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        let transport: Arc<dyn Transport> = if config.use_mock {
            tracing::info!(delay = ?config.mock_delay, "using mock transport");
            Arc::new(MockTransport::with_delay(config.mock_delay))
        } else {
            let base_url = config.base_url();
            tracing::info!(%base_url, "using http transport");
            Arc::new(HttpTransport::new(base_url, config.timeout)?)
        };

        let storage: Arc<dyn CredentialStore> = match &config.storage_path {
            Some(path) => Arc::new(FileStorage::open(path)?),
            None => Arc::new(MemoryStorage::new()),
        };

        Ok(Self::new(transport, storage, config.stale_time))
    }

    /// The stored session token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.storage.get(AUTH_TOKEN_KEY).map(SecretString::from)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to build the http client")]
    Client(#[from] ClientError),
}
