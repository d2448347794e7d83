mod auth;
mod bookings;
mod users;

use std::sync::Arc;

use dashboard::{AppContext, CredentialStore, MemoryStorage, StorageError};
use futures::FutureExt;
use futures::future::BoxFuture;
use payloads::{ClientError, MockTransport, Request, Transport};
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Backend that answers reads like the mock but refuses every write with
/// `status`.
pub struct RefusingWrites {
    pub reads: MockTransport,
    pub status: StatusCode,
}

impl RefusingWrites {
    pub fn new(status: StatusCode) -> Self {
        Self {
            reads: MockTransport::new(),
            status,
        }
    }
}

impl Transport for RefusingWrites {
    fn fetch(
        &self,
        request: Request,
    ) -> BoxFuture<'_, Result<Value, ClientError>> {
        if request.method == Method::GET {
            return self.reads.fetch(request);
        }
        let status = self.status;
        async move {
            if status == StatusCode::UNAUTHORIZED {
                Err(ClientError::Unauthorized)
            } else {
                Err(ClientError::APIError(status, "request refused".into()))
            }
        }
        .boxed()
    }
}

/// Backend that is down: every request fails with 503.
pub struct Unavailable;

impl Transport for Unavailable {
    fn fetch(
        &self,
        _request: Request,
    ) -> BoxFuture<'_, Result<Value, ClientError>> {
        async {
            Err(ClientError::APIError(
                StatusCode::SERVICE_UNAVAILABLE,
                "service unavailable".into(),
            ))
        }
        .boxed()
    }
}

/// Credential store on a read-only disk: it still serves the token it was
/// opened with, but every write fails.
pub struct ReadOnlyStore {
    pub token: Option<String>,
}

impl ReadOnlyStore {
    fn refuse() -> StorageError {
        StorageError::Io {
            path: "session.json".into(),
            source: std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            ),
        }
    }
}

impl CredentialStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Option<String> {
        self.token.clone()
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(Self::refuse())
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(Self::refuse())
    }
}

pub fn context_over(transport: impl Transport + 'static) -> AppContext {
    AppContext::new(
        Arc::new(transport),
        Arc::new(MemoryStorage::new()),
        test_helpers::STALE_TIME,
    )
}
