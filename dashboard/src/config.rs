use std::path::PathBuf;
use std::time::Duration;

/// Settings read once at start-up. There is no hot reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the backend API, without the version segment.
    pub api_url: String,
    pub api_version: String,
    /// Request timeout for the real HTTP transport. The mock ignores it.
    pub timeout: Duration,
    /// Answer every request from the in-memory mock instead of the network.
    pub use_mock: bool,
    /// Simulated latency of the mock transport.
    pub mock_delay: Duration,
    /// How long a successful read is served from cache before refetching.
    pub stale_time: Duration,
    /// Where the credential store is persisted. In-memory when unset.
    pub storage_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001/api".into(),
            api_version: "v1".into(),
            timeout: Duration::from_millis(10_000),
            use_mock: true,
            mock_delay: payloads::mock::DEFAULT_DELAY,
            stale_time: Duration::from_millis(60_000),
            storage_path: None,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Recognized variables (all optional):
    /// - API_URL: backend root (default http://localhost:3001/api)
    /// - API_VERSION: version path segment (default v1)
    /// - API_TIMEOUT_MS: request timeout (default 10000)
    /// - USE_MOCK_API: true/false (default true)
    /// - MOCK_DELAY_MS: simulated latency (default 1000)
    /// - QUERY_STALE_TIME_MS: cache freshness window (default 60000)
    /// - STORAGE_PATH: JSON file for the persisted session token
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Config {
            api_url: var("API_URL").unwrap_or(defaults.api_url),
            api_version: var("API_VERSION").unwrap_or(defaults.api_version),
            timeout: parse_millis("API_TIMEOUT_MS", var("API_TIMEOUT_MS"))?
                .unwrap_or(defaults.timeout),
            use_mock: parse_bool("USE_MOCK_API", var("USE_MOCK_API"))?
                .unwrap_or(defaults.use_mock),
            mock_delay: parse_millis("MOCK_DELAY_MS", var("MOCK_DELAY_MS"))?
                .unwrap_or(defaults.mock_delay),
            stale_time: parse_millis(
                "QUERY_STALE_TIME_MS",
                var("QUERY_STALE_TIME_MS"),
            )?
            .unwrap_or(defaults.stale_time),
            storage_path: var("STORAGE_PATH").map(PathBuf::from),
        })
    }

    /// The versioned API root requests are sent to.
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a whole number of milliseconds, got {value:?}")]
    InvalidMillis { name: &'static str, value: String },
    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },
}

fn parse_millis(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|value| match value.parse::<u64>() {
            Ok(millis) => Ok(Duration::from_millis(millis)),
            Err(_) => Err(ConfigError::InvalidMillis { name, value }),
        })
        .transpose()
}

fn parse_bool(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<bool>, ConfigError> {
    value
        .map(|value| match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidBool { name, value }),
        })
        .transpose()
}
