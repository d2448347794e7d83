use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::ClientError;

/// A logical request against the dashboard backend.
///
/// `path` is relative to the versioned API root, e.g. `/users/3`.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<SecretString>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The seam between resource clients and whatever answers their requests.
///
/// Implementations resolve to the decoded JSON body of the response. Swapping
/// the mock for a real backend only means handing a different transport to
/// the [`crate::APIClient`].
pub trait Transport: Send + Sync {
    fn fetch(&self, request: Request) -> BoxFuture<'_, Result<Value, ClientError>>;
}

/// Transport backed by a real HTTP API.
pub struct HttpTransport {
    base_url: String,
    inner_client: reqwest::Client,
}

impl HttpTransport {
    /// `base_url` is the versioned API root, e.g.
    /// `http://localhost:3001/api/v1`.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            inner_client,
        })
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, request: Request) -> BoxFuture<'_, Result<Value, ClientError>> {
        Box::pin(async move {
            let url = self.format_url(&request.path);
            tracing::debug!(method = %request.method, %url, "sending request");

            let mut builder = self
                .inner_client
                .request(request.method, url)
                .query(&request.query);
            if let Some(token) = &request.bearer {
                builder = builder.bearer_auth(token.expose_secret());
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await?;
            ok_json(response).await
        })
    }
}

/// Decode a response body as JSON, mapping failure statuses onto
/// [`ClientError`]. An empty body decodes as `null`.
async fn ok_json(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    if !status.is_success() {
        return Err(ClientError::APIError(status, response.text().await?));
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
