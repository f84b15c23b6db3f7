//! A cached feed: its slot, its optional source and the cold-read path.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::observability::metrics;
use crate::sync::slot::{FeedSlot, Snapshot};
use crate::sync::types::FeedKind;
use crate::upstream::UpstreamError;

/// Why a refresh attempt produced no value.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport, status or decode failure from an upstream.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The daemon answered but is not synced with the network.
    #[error("daemon consensus not synced (height {height})")]
    NotSynced { height: u64 },
}

/// Something that can produce a fresh value for a feed.
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    type Output: Send + Sync + 'static;

    /// One fetch attempt; no retries.
    async fn fetch(&self) -> Result<Self::Output, FeedError>;
}

pub type SharedSource<T> = Arc<dyn FeedSource<Output = T>>;

/// One of the three cached feeds.
///
/// A feed without a source is permanently unavailable: reads return `None`
/// and no fetch is ever attempted.
pub struct Feed<T> {
    kind: FeedKind,
    slot: FeedSlot<T>,
    source: Option<SharedSource<T>>,
    cold_gate: Mutex<()>,
    cold_attempts: AtomicU64,
}

impl<T: Send + Sync + 'static> Feed<T> {
    pub fn new(kind: FeedKind, source: Option<SharedSource<T>>) -> Self {
        Self {
            kind,
            slot: FeedSlot::new(),
            source,
            cold_gate: Mutex::new(()),
            cold_attempts: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn slot(&self) -> &FeedSlot<T> {
        &self.slot
    }

    pub fn source(&self) -> Option<&SharedSource<T>> {
        self.source.as_ref()
    }

    /// Whether a source is configured for this feed.
    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Read the latest value, fetching once if nothing was published yet.
    ///
    /// Concurrent cold readers queue on a gate. A reader that waited behind
    /// an attempt takes that attempt's outcome, success or failure, instead
    /// of fetching again. A cold fetch only fills an empty slot and never
    /// replaces a scheduler publish.
    pub async fn read(&self) -> Option<Arc<Snapshot<T>>> {
        if let Some(snapshot) = self.slot.load() {
            return Some(snapshot);
        }
        let source = self.source.as_ref()?;

        let seen = self.cold_attempts.load(Ordering::Acquire);
        let _gate = self.cold_gate.lock().await;
        if self.cold_attempts.load(Ordering::Acquire) != seen {
            return self.slot.load();
        }
        if let Some(snapshot) = self.slot.load() {
            return Some(snapshot);
        }

        tracing::debug!(feed = %self.kind, "Cold read, fetching feed");
        let outcome = source.fetch().await;
        self.cold_attempts.fetch_add(1, Ordering::AcqRel);

        match outcome {
            Ok(value) => {
                self.slot.publish_if_empty(value);
                metrics::record_feed_refresh(self.kind, true);
                metrics::record_feed_failures(self.kind, self.slot.consecutive_failures());
                self.slot.load()
            }
            Err(e) => {
                let failures = self.slot.record_failure();
                metrics::record_feed_refresh(self.kind, false);
                metrics::record_feed_failures(self.kind, failures);
                tracing::warn!(feed = %self.kind, error = %e, failures, "Cold fetch failed");
                None
            }
        }
    }

    /// Latest published snapshot without triggering a fetch.
    pub fn peek(&self) -> Option<Arc<Snapshot<T>>> {
        self.slot.load()
    }
}

impl<T> std::fmt::Debug for Feed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed")
            .field("kind", &self.kind)
            .field("configured", &self.source.is_some())
            .field("failures", &self.slot.consecutive_failures())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unconfigured_feed_never_fetches() {
        let feed: Feed<u64> = Feed::new(FeedKind::Quote, None);
        for _ in 0..5 {
            assert!(feed.read().await.is_none());
        }
        assert!(!feed.is_configured());
        assert_eq!(feed.slot().consecutive_failures(), 0);
    }

    #[tokio::test]
    async fn test_cold_read_fetches_exactly_once() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(7u64)]));
        let feed = Feed::new(FeedKind::ChainSummary, Some(source.clone() as SharedSource<u64>));

        assert_eq!(feed.read().await.unwrap().value, 7);
        assert_eq!(source.calls(), 1);

        // Warm reads are served from the slot.
        assert_eq!(feed.read().await.unwrap().value, 7);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_cold_read_returns_none() {
        let source = Arc::new(ScriptedSource::<u64>::new(vec![Err(5)]));
        let feed = Feed::new(FeedKind::ChainSummary, Some(source.clone() as SharedSource<u64>));

        assert!(feed.read().await.is_none());
        assert_eq!(source.calls(), 1);
        assert_eq!(feed.slot().consecutive_failures(), 1);

        // Each read while cold makes one new attempt.
        assert!(feed.read().await.is_none());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_cold_reads_share_fetch() {
        let source = Arc::new(
            ScriptedSource::new(vec![Ok(1u64)]).with_delay(Duration::from_millis(50)),
        );
        let feed = Arc::new(Feed::new(
            FeedKind::Rates,
            Some(source.clone() as SharedSource<u64>),
        ));

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let feed = feed.clone();
                tokio::spawn(async move { feed.read().await.map(|s| s.value) })
            })
            .collect();
        for reader in readers {
            assert_eq!(reader.await.unwrap(), Some(1));
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_cold_reads_share_failed_fetch() {
        let source = Arc::new(
            ScriptedSource::<u64>::new(vec![Err(0)]).with_delay(Duration::from_millis(200)),
        );
        let feed = Arc::new(Feed::new(
            FeedKind::Quote,
            Some(source.clone() as SharedSource<u64>),
        ));

        let started = std::time::Instant::now();
        let readers: Vec<_> = (0..8)
            .map(|_| {
                let feed = feed.clone();
                tokio::spawn(async move { feed.read().await.map(|s| s.value) })
            })
            .collect();
        for reader in readers {
            assert_eq!(reader.await.unwrap(), None);
        }
        assert_eq!(source.calls(), 1);
        assert_eq!(feed.slot().consecutive_failures(), 1);
        assert!(started.elapsed() < Duration::from_millis(1000));

        // A later read, after the shared attempt finished, tries again.
        assert!(feed.read().await.is_none());
        assert_eq!(source.calls(), 2);
    }

    #[test]
    fn test_failed_cold_read_updates_failure_gauge() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let source = Arc::new(ScriptedSource::<u64>::new(vec![Err(0)]));
        let feed = Feed::new(FeedKind::Quote, Some(source as SharedSource<u64>));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        ::metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                feed.read().await;
                feed.read().await;
            })
        });

        let rendered = handle.render();
        assert!(
            rendered.contains(r#"feed_consecutive_failures{feed="usd_quote"} 2"#),
            "{rendered}"
        );
    }

    #[tokio::test]
    async fn test_cold_fetch_does_not_overwrite_published_value() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(1u64)]));
        let feed = Feed::new(FeedKind::Quote, Some(source.clone() as SharedSource<u64>));
        feed.slot().publish(99);

        assert_eq!(feed.read().await.unwrap().value, 99);
        assert_eq!(source.calls(), 0);
    }
}
