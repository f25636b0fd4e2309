//! TTL snapshot cache with single-flight refresh and stale fallback.
//!
//! At most one refresh runs per cache. Callers that find the cache cold or expired
//! while a refresh is in flight wait for its outcome instead of starting another.
//! The refresh itself runs on its own task with its own cancellation token, so it
//! completes even if every caller that was waiting on it goes away.
//!
//! When a refresh fails and a previous snapshot exists, that snapshot keeps being
//! served and the next attempt is scheduled after a short retry window rather than
//! the full TTL. Without a previous snapshot the error reaches every waiter.

use super::clock::{Clock, SystemClock};
use super::loader::SnapshotLoader;
use super::snapshot::Snapshot;
use crate::error::CatalogError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// TTL used when a non-positive one is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Upper bound of the retry window after a failed refresh.
const STALE_RETRY_WINDOW: Duration = Duration::from_secs(2);

/// Lower bound of the retry window after a failed refresh.
const MIN_RETRY_WINDOW: Duration = Duration::from_secs(1);

type RefreshOutcome = Result<Arc<Snapshot>, CatalogError>;

/// Completion signal of an in-flight refresh; `None` until it finishes.
type RefreshSignal = watch::Receiver<Option<RefreshOutcome>>;

#[derive(Default)]
struct CacheState {
    cached: Option<Arc<Snapshot>>,
    expires_at: Option<Instant>,
    in_flight: Option<RefreshSignal>,
}

impl CacheState {
    fn fresh(&self, now: Instant) -> Option<Arc<Snapshot>> {
        match (&self.cached, self.expires_at) {
            (Some(snapshot), Some(expires_at)) if now < expires_at => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }
}

struct Inner {
    loader: SnapshotLoader,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

/// Shared handle to one snapshot cache. Cloning shares the same cache.
#[derive(Clone)]
pub struct SnapshotCache {
    inner: Arc<Inner>,
}

impl SnapshotCache {
    /// Creates a cache using the system clock.
    pub fn new(loader: SnapshotLoader, ttl: Duration) -> Self {
        Self::with_clock(loader, ttl, Arc::new(SystemClock))
    }

    /// Creates a cache with an injected clock.
    pub fn with_clock(loader: SnapshotLoader, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        Self {
            inner: Arc::new(Inner { loader, ttl, clock, state: Mutex::new(CacheState::default()) }),
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Returns the current snapshot, refreshing it first if it is cold or expired.
    ///
    /// `cancel` only abandons this caller's wait; an in-flight refresh keeps going.
    pub async fn snapshot(&self, cancel: &CancellationToken) -> Result<Arc<Snapshot>, CatalogError> {
        let signal = {
            let mut state = self.inner.state.lock().await;

            if let Some(snapshot) = state.fresh(self.inner.clock.now()) {
                debug!("Snapshot cache hit");
                return Ok(snapshot);
            }

            match state.in_flight.as_ref().filter(|signal| !is_abandoned(signal)) {
                Some(signal) => {
                    debug!("Refresh already in flight, waiting");
                    signal.clone()
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    state.in_flight = Some(rx.clone());
                    self.spawn_refresh(tx);
                    rx
                }
            }
        };

        wait_for_refresh(signal, cancel).await
    }

    fn spawn_refresh(&self, tx: watch::Sender<Option<RefreshOutcome>>) {
        debug!("Starting snapshot refresh");
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            // Detached from every caller: nobody can cancel a running refresh.
            // The load gets its own task so a panic in a source still completes the refresh.
            let load = {
                let inner = Arc::clone(&inner);
                tokio::spawn(async move { inner.loader.load(&CancellationToken::new()).await })
            };
            let result = match load.await {
                Ok(result) => result,
                Err(err) => Err(CatalogError::Refresh(format!("snapshot load aborted: {}", err))),
            };
            let outcome = inner.complete_refresh(result).await;
            tx.send_replace(Some(outcome));
        });
    }
}

impl Inner {
    async fn complete_refresh(&self, result: Result<Snapshot, CatalogError>) -> RefreshOutcome {
        let mut state = self.state.lock().await;
        state.in_flight = None;
        let now = self.clock.now();

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                info!("Snapshot refreshed with {} products", snapshot.len());
                state.cached = Some(Arc::clone(&snapshot));
                state.expires_at = Some(now + self.ttl);
                Ok(snapshot)
            }
            Err(err) => match &state.cached {
                Some(stale) => {
                    warn!("Products refresh failed, serving stale cache: {}", err);
                    let stale = Arc::clone(stale);
                    state.expires_at = Some(now + stale_retry_window(self.ttl));
                    Ok(stale)
                }
                None => {
                    warn!("Products refresh failed with no cached snapshot: {}", err);
                    Err(err)
                }
            },
        }
    }
}

/// Retry window after a failed refresh: the TTL capped at 2s, at least 1s.
fn stale_retry_window(ttl: Duration) -> Duration {
    ttl.min(STALE_RETRY_WINDOW).max(MIN_RETRY_WINDOW)
}

/// A refresh whose task ended without reporting, e.g. dropped at runtime shutdown.
fn is_abandoned(signal: &RefreshSignal) -> bool {
    signal.has_changed().is_err() && signal.borrow().is_none()
}

async fn wait_for_refresh(mut signal: RefreshSignal, cancel: &CancellationToken) -> RefreshOutcome {
    let outcome = async { signal.wait_for(Option::is_some).await.ok().and_then(|value| (*value).clone()) };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CatalogError::Cancelled),
        outcome = outcome => outcome.unwrap_or_else(|| {
            Err(CatalogError::Refresh("refresh task ended without a result".to_string()))
        }),
    }
}
