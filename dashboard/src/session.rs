use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use payloads::{ClientError, Request, Transport};
use secrecy::SecretString;
use serde_json::Value;

use crate::routes::{Navigator, Route};
use crate::storage::{AUTH_TOKEN_KEY, CredentialStore};
use crate::telemetry::log_error;

/// Transport wrapper that carries the stored session.
///
/// Attaches the stored token as a bearer credential to every request. When
/// the backend answers 401 the token is forgotten and the app is sent back
/// to the login page before the error is passed on.
pub struct SessionTransport {
    inner: Arc<dyn Transport>,
    storage: Arc<dyn CredentialStore>,
    navigator: Navigator,
}

impl SessionTransport {
    pub fn new(
        inner: Arc<dyn Transport>,
        storage: Arc<dyn CredentialStore>,
        navigator: Navigator,
    ) -> Self {
        Self {
            inner,
            storage,
            navigator,
        }
    }

    fn end_session(&self) {
        tracing::warn!("session rejected by the backend, signing out");
        if let Err(e) = self.storage.remove(AUTH_TOKEN_KEY) {
            log_error(e);
        }
        self.navigator.push(Route::Login);
    }
}

impl Transport for SessionTransport {
    fn fetch(
        &self,
        mut request: Request,
    ) -> BoxFuture<'_, Result<Value, ClientError>> {
        if request.bearer.is_none()
            && let Some(token) = self.storage.get(AUTH_TOKEN_KEY)
        {
            request.bearer = Some(SecretString::from(token));
        }

        async move {
            let result = self.inner.fetch(request).await;
            if let Err(e) = &result
                && e.is_unauthorized()
            {
                self.end_session();
            }
            result
        }
        .boxed()
    }
}
