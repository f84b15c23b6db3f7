//! Background refresh loop for one feed.
//!
//! # States
//! ```text
//! Idle ──▶ Fetching ──ok──▶ publish ──▶ Cooldown(interval) ──▶ Idle
//!              │
//!              └──err──▶ keep stale ──▶ Cooldown(error_interval) ──▶ Idle
//! ```
//!
//! The loop has no terminal state of its own; it only exits when the
//! shutdown signal fires, either mid-fetch or mid-cooldown.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::{RefreshPolicy, SyncConfig};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::sync::cache::CacheStore;
use crate::sync::feed::{Feed, FeedError, SharedSource};
use crate::sync::types::ChainSummary;

/// Called with `(previous, current)` after a publish that replaced a value.
pub type ChangeHook<T> = Box<dyn Fn(&T, &T) + Send + Sync>;

/// Periodically refreshes one feed; the only periodic writer of its slot.
pub struct FeedScheduler<T> {
    feed: Arc<Feed<T>>,
    source: SharedSource<T>,
    policy: RefreshPolicy,
    on_change: Option<ChangeHook<T>>,
}

impl<T: Send + Sync + 'static> FeedScheduler<T> {
    /// Create a scheduler, or `None` if the feed has no source.
    pub fn new(feed: Arc<Feed<T>>, policy: RefreshPolicy) -> Option<Self> {
        let source = feed.source()?.clone();
        Some(Self {
            feed,
            source,
            policy,
            on_change: None,
        })
    }

    /// Register a hook fired when a publish replaces an existing value.
    ///
    /// The first publish into an empty slot does not fire it.
    pub fn on_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T, &T) + Send + Sync + 'static,
    {
        self.on_change = Some(Box::new(hook));
        self
    }

    /// Run one Fetching step: publish on success, count the failure otherwise.
    pub async fn refresh_once(&self) -> Result<(), FeedError> {
        let kind = self.feed.kind();
        let slot = self.feed.slot();

        match self.source.fetch().await {
            Ok(value) => {
                let previous = slot.publish(value);
                metrics::record_feed_refresh(kind, true);
                metrics::record_feed_failures(kind, 0);
                tracing::debug!(feed = %kind, "Feed refreshed");

                if let (Some(hook), Some(previous)) = (&self.on_change, previous) {
                    if let Some(current) = slot.load() {
                        hook(&previous.value, &current.value);
                    }
                }
                Ok(())
            }
            Err(e) => {
                let failures = slot.record_failure();
                metrics::record_feed_refresh(kind, false);
                metrics::record_feed_failures(kind, failures);
                tracing::warn!(
                    feed = %kind,
                    error = %e,
                    failures,
                    retry_in = ?self.policy.error_interval,
                    "Feed refresh failed, keeping last value"
                );
                Err(e)
            }
        }
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let kind = self.feed.kind();
        tracing::info!(
            feed = %kind,
            interval = ?self.policy.interval,
            error_interval = ?self.policy.error_interval,
            "Feed scheduler starting"
        );

        loop {
            let outcome = tokio::select! {
                outcome = self.refresh_once() => outcome,
                _ = shutdown.recv() => break,
            };

            let cooldown = self.policy.cooldown(outcome.is_ok());
            tokio::select! {
                _ = tokio::time::sleep(cooldown) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(feed = %kind, "Feed scheduler stopped");
    }
}

impl FeedScheduler<ChainSummary> {
    /// Fire `f(previous_height, new_height)` when the chain advances.
    pub fn on_height_change<F>(self, f: F) -> Self
    where
        F: Fn(u64, u64) + Send + Sync + 'static,
    {
        self.on_change(move |previous: &ChainSummary, current: &ChainSummary| {
            if current.height > previous.height {
                f(previous.height, current.height);
            }
        })
    }
}

/// Spawn one scheduler per configured feed.
///
/// Feeds without a source get no task at all.
pub fn spawn_schedulers(
    cache: &CacheStore,
    sync: &SyncConfig,
    shutdown: &Shutdown,
    on_height_change: Option<Box<dyn Fn(u64, u64) + Send + Sync>>,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    if let Some(mut chain) = FeedScheduler::new(cache.chain_feed().clone(), sync.chain_policy()) {
        if let Some(hook) = on_height_change {
            chain = chain.on_height_change(hook);
        }
        handles.push(tokio::spawn(chain.run(shutdown.subscribe())));
    }

    match FeedScheduler::new(cache.quote_feed().clone(), sync.quote_policy()) {
        Some(quote) => handles.push(tokio::spawn(quote.run(shutdown.subscribe()))),
        None => tracing::info!("No CoinMarketCap API key, USD quote will not be available"),
    }

    match FeedScheduler::new(cache.rates_feed().clone(), sync.rates_policy()) {
        Some(rates) => handles.push(tokio::spawn(rates.run(shutdown.subscribe()))),
        None => tracing::info!("No getgeoapi key, USD exchange rates will not be available"),
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::feed::testing::ScriptedSource;
    use crate::sync::types::FeedKind;
    use std::sync::Mutex;
    use std::time::Duration;

    fn summary(height: u64) -> ChainSummary {
        ChainSummary {
            height,
            min_fee: "1".to_string(),
            max_fee: "2".to_string(),
        }
    }

    type ChainFeed = (Arc<Feed<ChainSummary>>, Arc<ScriptedSource<ChainSummary>>);

    fn chain_feed(script: Vec<Result<ChainSummary, u64>>) -> ChainFeed {
        let source = Arc::new(ScriptedSource::new(script));
        let feed = Arc::new(Feed::new(
            FeedKind::ChainSummary,
            Some(source.clone() as SharedSource<ChainSummary>),
        ));
        (feed, source)
    }

    #[test]
    fn test_no_scheduler_without_source() {
        let feed: Arc<Feed<ChainSummary>> = Arc::new(Feed::new(FeedKind::Quote, None));
        assert!(FeedScheduler::new(feed, RefreshPolicy::from_secs(1, 1)).is_none());
    }

    #[tokio::test]
    async fn test_unsynced_fetch_keeps_previous_value() {
        let (feed, _) = chain_feed(vec![Ok(summary(100)), Err(100), Ok(summary(101))]);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let recorded = changes.clone();
        let scheduler = FeedScheduler::new(feed.clone(), RefreshPolicy::from_secs(10, 60))
            .unwrap()
            .on_height_change(move |old, new| recorded.lock().unwrap().push((old, new)));

        scheduler.refresh_once().await.unwrap();
        assert_eq!(feed.peek().unwrap().value.height, 100);

        let err = scheduler.refresh_once().await.unwrap_err();
        assert!(matches!(err, FeedError::NotSynced { .. }));
        assert_eq!(feed.peek().unwrap().value.height, 100);
        assert_eq!(feed.slot().consecutive_failures(), 1);

        scheduler.refresh_once().await.unwrap();
        assert_eq!(feed.peek().unwrap().value.height, 101);
        assert_eq!(*changes.lock().unwrap(), vec![(100, 101)]);
    }

    #[tokio::test]
    async fn test_height_hook_only_on_strict_increase() {
        let (feed, _) = chain_feed(vec![
            Ok(summary(50)),
            Ok(summary(50)),
            Ok(summary(49)),
            Ok(summary(52)),
        ]);
        let changes = Arc::new(Mutex::new(Vec::new()));
        let recorded = changes.clone();
        let scheduler = FeedScheduler::new(feed, RefreshPolicy::from_secs(10, 60))
            .unwrap()
            .on_height_change(move |old, new| recorded.lock().unwrap().push((old, new)));

        for _ in 0..4 {
            scheduler.refresh_once().await.unwrap();
        }
        // First publish is silent, equal and lower heights are ignored.
        assert_eq!(*changes.lock().unwrap(), vec![(49, 52)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_uses_error_interval_after_failure() {
        let (feed, source) = chain_feed(vec![Ok(summary(100)), Err(100), Ok(summary(101))]);
        let shutdown = Shutdown::new();
        let scheduler = FeedScheduler::new(feed.clone(), RefreshPolicy::from_secs(10, 60)).unwrap();
        let handle = tokio::spawn(scheduler.run(shutdown.subscribe()));

        // t=1: first fetch happened immediately.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);
        assert_eq!(feed.peek().unwrap().value.height, 100);

        // t=11: second fetch (unsynced) after the normal interval.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(source.calls(), 2);
        assert_eq!(feed.peek().unwrap().value.height, 100);

        // t=65: still cooling down on the error interval.
        tokio::time::sleep(Duration::from_secs(54)).await;
        assert_eq!(source.calls(), 2);

        // t=71: recovered.
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(source.calls(), 3);
        assert_eq!(feed.peek().unwrap().value.height, 101);
        assert_eq!(feed.slot().consecutive_failures(), 0);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_never_stop_the_loop() {
        let (feed, source) = chain_feed(vec![Err(0)]);
        let shutdown = Shutdown::new();
        let scheduler = FeedScheduler::new(feed.clone(), RefreshPolicy::from_secs(10, 60)).unwrap();
        let handle = tokio::spawn(scheduler.run(shutdown.subscribe()));

        tokio::time::sleep(Duration::from_secs(60 * 5 + 1)).await;
        assert_eq!(source.calls(), 6);
        assert!(feed.peek().is_none());
        assert_eq!(feed.slot().consecutive_failures(), 6);

        shutdown.trigger();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_cooldown() {
        let (feed, source) = chain_feed(vec![Ok(summary(1))]);
        let shutdown = Shutdown::new();
        let scheduler = FeedScheduler::new(feed, RefreshPolicy::from_secs(1000, 1000)).unwrap();
        let handle = tokio::spawn(scheduler.run(shutdown.subscribe()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_skips_unconfigured_feeds() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(summary(7))]));
        let cache = CacheStore::new(source.clone(), None, None);
        let shutdown = Shutdown::new();

        let handles = spawn_schedulers(&cache, &SyncConfig::default(), &shutdown, None);
        assert_eq!(handles.len(), 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(cache.chain_feed().peek().unwrap().value.height, 7);

        shutdown.trigger();
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
