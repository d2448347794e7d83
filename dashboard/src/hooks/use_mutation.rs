use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::QueryError;

/// Pending flag and last error of one kind of write.
///
/// Clones share state, so a flag raised by one handle is seen by every
/// other.
#[derive(Clone, Default)]
pub struct MutationState {
    pending: Arc<AtomicUsize>,
    error: Arc<Mutex<Option<QueryError>>>,
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Error of the most recent settled call, cleared by the next success.
    pub fn error(&self) -> Option<QueryError> {
        self.error_mut().clone()
    }

    pub fn reset(&self) {
        *self.error_mut() = None;
    }

    fn error_mut(&self) -> MutexGuard<'_, Option<QueryError>> {
        self.error.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drive `request`, keeping the pending flag raised until it settles.
    pub async fn run<T, E, Fut>(&self, request: Fut) -> Result<T, QueryError>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Into<QueryError>,
    {
        let _pending = Pending::raise(&self.pending);
        let result: Result<T, QueryError> = request.await.map_err(Into::into);
        *self.error_mut() = result.as_ref().err().cloned();
        result
    }
}

/// Lowers the flag again even if the caller stops waiting.
struct Pending<'a>(&'a AtomicUsize);

impl<'a> Pending<'a> {
    fn raise(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
