//! Cache of read results keyed by resource and request parameters.
//!
//! Each key moves through `Idle -> Loading -> Success | Error`. Invalidation
//! marks an entry stale, and the next read of a stale entry goes back to
//! `Loading`. Reads of a key that is already loading join the request in
//! flight instead of issuing another one.
//!
//! Results that arrive after their entry was invalidated, or after the whole
//! cache was cleared, are handed to the callers that waited for them but are
//! not written back.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use payloads::ClientError;
use serde::Serialize;
use tokio::time::Instant;

use crate::storage::StorageError;

type AnyValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<AnyValue, QueryError>>>;

/// Identifies a cached read: a resource name plus the canonical JSON of the
/// parameters it was read with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: &'static str,
    params: String,
}

impl QueryKey {
    pub fn new(resource: &'static str, params: &impl Serialize) -> Self {
        // Object keys come out sorted, so equal parameters give equal keys.
        let params = serde_json::to_value(params)
            .map(|value| value.to_string())
            .unwrap_or_default();
        Self { resource, params }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.resource, self.params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Error value surfaced by hooks. Cheap to clone so every caller that shared
/// a request gets it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Client(Arc<ClientError>),
    #[error("request task for {key} failed: {message}")]
    Task { key: QueryKey, message: String },
    #[error("cached value for {0} has an unexpected type")]
    TypeMismatch(QueryKey),
    #[error(transparent)]
    Storage(Arc<StorageError>),
}

impl From<ClientError> for QueryError {
    fn from(e: ClientError) -> Self {
        Self::Client(Arc::new(e))
    }
}

impl From<StorageError> for QueryError {
    fn from(e: StorageError) -> Self {
        Self::Storage(Arc::new(e))
    }
}

impl QueryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_unauthorized())
    }
}

/// Snapshot of one cached read.
#[derive(Debug)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    /// Last successful result. Kept through invalidation and failed
    /// refetches.
    pub data: Option<Arc<T>>,
    pub error: Option<QueryError>,
    pub is_stale: bool,
}

impl<T> QueryState<T> {
    /// Loading with nothing to show yet.
    pub fn is_initial_loading(&self) -> bool {
        self.status == QueryStatus::Loading && self.data.is_none()
    }

    pub fn is_fetching(&self) -> bool {
        self.status == QueryStatus::Loading
    }
}

#[derive(Default)]
struct Entry {
    data: Option<AnyValue>,
    error: Option<QueryError>,
    updated_at: Option<Instant>,
    stale: bool,
    /// Bumped whenever an in-flight result must no longer be written back.
    generation: u64,
    in_flight: Option<SharedFetch>,
}

impl Entry {
    fn fresh(&self, stale_time: Duration) -> Option<AnyValue> {
        if self.stale || self.error.is_some() {
            return None;
        }
        let updated_at = self.updated_at?;
        if updated_at.elapsed() >= stale_time {
            return None;
        }
        self.data.clone()
    }

    fn status(&self) -> QueryStatus {
        if self.in_flight.is_some() {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    fn is_stale(&self, stale_time: Duration) -> bool {
        self.stale
            || self
                .updated_at
                .is_some_and(|updated_at| updated_at.elapsed() >= stale_time)
    }

    /// Detach any request in flight so its result is not written back.
    fn detach(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }
}

#[derive(Default)]
struct Cache {
    /// Bumped by [`QueryClient::clear`].
    epoch: u64,
    entries: HashMap<QueryKey, Entry>,
}

/// Shared handle to the read cache. Clones refer to the same cache.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<Mutex<Cache>>,
    stale_time: Duration,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            cache: Arc::new(Mutex::new(Cache::default())),
            stale_time,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read `key`, calling `fetcher` only when there is no fresh cached value
    /// and no request for the key already in flight.
    ///
    /// Must be called from within a tokio runtime: the request runs as its
    /// own task so that it completes even if every caller stops waiting.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let request = {
            let mut cache = self.lock();
            let epoch = cache.epoch;
            let entry = cache.entries.entry(key.clone()).or_default();

            if let Some(data) = entry.fresh(self.stale_time) {
                tracing::debug!(%key, "cache hit");
                return downcast(&key, data);
            }

            match &entry.in_flight {
                Some(request) => {
                    tracing::debug!(%key, "joining request in flight");
                    request.clone()
                }
                None => {
                    tracing::debug!(%key, "cache miss, fetching");
                    let request = self.spawn_request(
                        key.clone(),
                        epoch,
                        entry.generation,
                        fetcher(),
                    );
                    entry.in_flight = Some(request.clone());
                    request
                }
            }
        };

        downcast(&key, request.await?)
    }

    /// Mark `key` stale and read it again.
    pub async fn refetch<T, F, Fut>(
        &self,
        key: QueryKey,
        fetcher: F,
    ) -> Result<Arc<T>, QueryError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        if let Some(entry) = self.lock().entries.get_mut(&key) {
            entry.stale = true;
            entry.detach();
        }
        self.fetch(key, fetcher).await
    }

    fn spawn_request<T, Fut>(
        &self,
        key: QueryKey,
        epoch: u64,
        generation: u64,
        request: Fut,
    ) -> SharedFetch
    where
        T: Send + Sync + 'static,
        Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let result = request
                .await
                .map(|value| Arc::new(value) as AnyValue)
                .map_err(QueryError::from);
            settle(&cache, &task_key, epoch, generation, &result);
            result
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                Err(QueryError::Task {
                    key,
                    message: e.to_string(),
                })
            })
        }
        .boxed()
        .shared()
    }

    /// Cached value for `key`, stale or not.
    pub fn get_query_data<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
    ) -> Option<Arc<T>> {
        let data = self.lock().entries.get(key)?.data.clone()?;
        data.downcast::<T>().ok()
    }

    /// Seed `key` with a value as if it had just been fetched.
    pub fn set_query_data<T: Send + Sync + 'static>(
        &self,
        key: QueryKey,
        value: T,
    ) {
        tracing::debug!(%key, "seeding cache");
        let mut cache = self.lock();
        let entry = cache.entries.entry(key).or_default();
        entry.detach();
        entry.data = Some(Arc::new(value));
        entry.error = None;
        entry.stale = false;
        entry.updated_at = Some(Instant::now());
    }

    /// Mark every entry of `resource` stale, whatever its parameters.
    ///
    /// Requests in flight for those entries are detached so a result that
    /// predates the invalidation is never cached. Returns the number of
    /// entries touched.
    pub fn invalidate(&self, resource: &str) -> usize {
        let mut cache = self.lock();
        let mut count = 0;
        for (_, entry) in cache
            .entries
            .iter_mut()
            .filter(|(key, _)| key.resource == resource)
        {
            entry.stale = true;
            entry.detach();
            count += 1;
        }
        tracing::debug!(resource, count, "invalidated queries");
        count
    }

    /// Drop every cached read. Requests still in flight will not repopulate
    /// the cache.
    pub fn clear(&self) {
        let mut cache = self.lock();
        cache.epoch += 1;
        cache.entries.clear();
        tracing::debug!("cleared query cache");
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.lock()
            .entries
            .get(key)
            .map_or(QueryStatus::Idle, Entry::status)
    }

    pub fn state<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
    ) -> QueryState<T> {
        let cache = self.lock();
        let Some(entry) = cache.entries.get(key) else {
            return QueryState {
                status: QueryStatus::Idle,
                data: None,
                error: None,
                is_stale: false,
            };
        };
        QueryState {
            status: entry.status(),
            data: entry
                .data
                .clone()
                .and_then(|data| data.downcast::<T>().ok()),
            error: entry.error.clone(),
            is_stale: entry.is_stale(self.stale_time),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn settle(
    cache: &Mutex<Cache>,
    key: &QueryKey,
    epoch: u64,
    generation: u64,
    result: &Result<AnyValue, QueryError>,
) {
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    if cache.epoch != epoch {
        tracing::debug!(%key, "cache was cleared, discarding result");
        return;
    }
    let Some(entry) = cache.entries.get_mut(key) else {
        return;
    };
    if entry.generation != generation {
        tracing::debug!(%key, "entry was invalidated, discarding result");
        return;
    }

    entry.in_flight = None;
    match result {
        Ok(value) => {
            entry.data = Some(value.clone());
            entry.error = None;
            entry.stale = false;
            entry.updated_at = Some(Instant::now());
        }
        Err(e) => {
            tracing::debug!(%key, error = %e, "fetch failed");
            entry.error = Some(e.clone());
        }
    }
}

fn downcast<T: Send + Sync + 'static>(
    key: &QueryKey,
    value: AnyValue,
) -> Result<Arc<T>, QueryError> {
    value
        .downcast::<T>()
        .map_err(|_| QueryError::TypeMismatch(key.clone()))
}
