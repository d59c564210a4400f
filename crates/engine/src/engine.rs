//! Polling monitor engine.
//!
//! Owns the sample window and the aggregate snapshot. Each tick fans out
//! concurrent reads to every configured source, assembles one immutable
//! sample, appends it to the window, and recomputes the aggregate in full.
//! Snapshots are published through a watch channel; the engine has an
//! explicit start/stop lifecycle and never blocks a tick on a slow venue.
//!
//! Poll results are tagged with a tick sequence number; if a newer tick
//! completes before an older one, the older completion is discarded
//! (last-tick-wins) so metrics never flicker backward.

use crate::aggregate::{AggregateMetrics, VenueMetrics, aggregate};
use crate::source::{PriceSource, read_with_timeout};
use crate::window::{Sample, SampleWindow};
use chrono::{DateTime, TimeDelta, Utc};
use pegwatch_domain::Venue;
use pegwatch_domain::constants::WINDOW_HORIZON_HOURS;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Notify, mpsc, watch};
use tracing::{debug, info};

/// Engine timing configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cadence of live venue polls.
    pub poll_interval: Duration,
    /// Cadence of history refreshes (eviction plus recompute, no new poll).
    pub refresh_interval: Duration,
    /// Per-read deadline at the source boundary.
    pub read_timeout: Duration,
    /// Sample window horizon.
    pub horizon: TimeDelta,
}

impl EngineConfig {
    /// Sets the live poll cadence.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the history refresh cadence.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the per-read deadline.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            refresh_interval: Duration::from_secs(300),
            read_timeout: Duration::from_secs(10),
            horizon: TimeDelta::hours(WINDOW_HORIZON_HOURS),
        }
    }
}

/// Handle for stopping a running engine from another task.
#[derive(Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl StopHandle {
    /// Requests the engine loop to stop.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    /// Whether the engine loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Depeg monitor engine.
pub struct MonitorEngine {
    sources: Vec<Arc<dyn PriceSource>>,
    config: EngineConfig,
    window: SampleWindow,
    snapshot: AggregateMetrics,
    metrics_tx: watch::Sender<AggregateMetrics>,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl MonitorEngine {
    /// Creates an engine over the given sources.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn PriceSource>>, config: EngineConfig) -> Self {
        let (metrics_tx, _) = watch::channel(AggregateMetrics::empty());
        let window = SampleWindow::new(config.horizon);
        Self {
            sources,
            config,
            window,
            snapshot: AggregateMetrics::empty(),
            metrics_tx,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Subscribes to published aggregate snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AggregateMetrics> {
        self.metrics_tx.subscribe()
    }

    /// Handle for stopping the engine from another task.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Requests the engine loop to stop.
    pub fn stop(&self) {
        self.stop_handle().stop();
    }

    /// Current aggregate snapshot.
    ///
    /// Repeated calls against an unchanged window return identical values.
    #[must_use]
    pub fn aggregate_metrics(&self) -> AggregateMetrics {
        self.snapshot.clone()
    }

    /// Current metrics for one venue.
    #[must_use]
    pub fn venue_metrics(&self, venue: Venue) -> Option<VenueMetrics> {
        self.snapshot.venues.get(&venue).copied()
    }

    /// Retained window size, in samples.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Performs one polling tick and returns the new snapshot.
    pub async fn poll_once(&mut self) -> AggregateMetrics {
        let sample = collect_sample(&self.sources, self.config.read_timeout).await;
        self.apply_sample(sample);
        self.snapshot.clone()
    }

    /// Runs the polling loop until [`StopHandle::stop`] is called.
    pub async fn run(&mut self) {
        self.running.store(true, Ordering::SeqCst);
        info!(
            sources = self.sources.len(),
            poll_interval = ?self.config.poll_interval,
            "Starting monitor engine"
        );

        let (tx, mut rx) = mpsc::channel::<(u64, Sample)>(8);
        let shutdown = Arc::clone(&self.shutdown);
        let mut poll_tick = tokio::time::interval(self.config.poll_interval);
        let mut refresh_tick = tokio::time::interval(self.config.refresh_interval);
        let mut seq: u64 = 0;
        let mut last_applied: u64 = 0;

        while self.running.load(Ordering::SeqCst) {
            tokio::select! {
                _ = poll_tick.tick() => {
                    seq += 1;
                    let tick = seq;
                    let sources = self.sources.clone();
                    let limit = self.config.read_timeout;
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let sample = collect_sample(&sources, limit).await;
                        let _ = tx.send((tick, sample)).await;
                    });
                }
                Some((tick, sample)) = rx.recv() => {
                    self.apply_if_fresh(tick, &mut last_applied, sample);
                }
                _ = refresh_tick.tick() => {
                    self.refresh(Utc::now());
                }
                _ = shutdown.notified() => break,
            }
        }

        info!("Monitor engine stopped");
    }

    /// Applies a completed poll unless a newer tick already landed.
    fn apply_if_fresh(&mut self, tick: u64, last_applied: &mut u64, sample: Sample) -> bool {
        if tick <= *last_applied {
            debug!(tick, last_applied = *last_applied, "Discarding stale poll result");
            return false;
        }
        *last_applied = tick;
        self.apply_sample(sample);
        true
    }

    fn apply_sample(&mut self, sample: Sample) {
        let now = sample.captured_at;
        self.window.append(sample);
        self.publish(now);
    }

    /// Re-evicts and recomputes without polling, so long-idle metrics such
    /// as the sample period keep tracking wall-clock time.
    fn refresh(&mut self, now: DateTime<Utc>) {
        self.window.evict_older_than(now);
        self.publish(now);
    }

    fn publish(&mut self, now: DateTime<Utc>) {
        self.snapshot = aggregate(&self.window, now);
        self.metrics_tx.send_replace(self.snapshot.clone());
    }
}

/// Fans out one concurrent read per source and assembles the tick sample.
///
/// Slow or failing venues resolve as unavailable; they never block the
/// other reads.
pub async fn collect_sample(sources: &[Arc<dyn PriceSource>], limit: Duration) -> Sample {
    let captured_at = Utc::now();

    let mut handles = Vec::with_capacity(sources.len());
    for source in sources {
        let source = Arc::clone(source);
        handles.push(tokio::spawn(async move {
            read_with_timeout(source.as_ref(), limit).await
        }));
    }

    let mut observations = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Ok(observation) = handle.await {
            observations.push(observation);
        }
    }

    Sample::from_observations(captured_at, observations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use async_trait::async_trait;
    use pegwatch_domain::PegStatus;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct FixedSource {
        venue: Venue,
        price: Option<Decimal>,
    }

    #[async_trait]
    impl PriceSource for FixedSource {
        fn venue(&self) -> Venue {
            self.venue
        }

        async fn read_price(&self) -> Result<Decimal, SourceError> {
            self.price.ok_or(SourceError::Unavailable)
        }
    }

    fn fixed_sources() -> Vec<Arc<dyn PriceSource>> {
        vec![
            Arc::new(FixedSource {
                venue: Venue::Coingecko,
                price: Some(dec!(0.9998)),
            }),
            Arc::new(FixedSource {
                venue: Venue::Orca,
                price: Some(dec!(0.9990)),
            }),
            Arc::new(FixedSource {
                venue: Venue::Raydium,
                price: None,
            }),
        ]
    }

    #[tokio::test]
    async fn test_poll_once_builds_snapshot() {
        let mut engine = MonitorEngine::new(fixed_sources(), EngineConfig::default());
        let metrics = engine.poll_once().await;

        assert_eq!(engine.window_len(), 1);
        assert!(metrics.any_depegged);
        assert_eq!(metrics.max_depeg_bps, dec!(10.0));
        assert_eq!(
            engine.venue_metrics(Venue::Raydium).map(|m| m.status),
            Some(PegStatus::Unavailable)
        );
    }

    #[tokio::test]
    async fn test_snapshot_reads_are_idempotent() {
        let mut engine = MonitorEngine::new(fixed_sources(), EngineConfig::default());
        engine.poll_once().await;
        assert_eq!(engine.aggregate_metrics(), engine.aggregate_metrics());
    }

    #[tokio::test]
    async fn test_stale_tick_is_discarded() {
        let mut engine = MonitorEngine::new(Vec::new(), EngineConfig::default());
        let mut last_applied = 0;

        let newer = Sample::new(Utc::now()).with_price(Venue::Orca, Some(dec!(1.0)));
        assert!(engine.apply_if_fresh(2, &mut last_applied, newer));

        // An older tick completing late must not overwrite the newer one.
        let stale = Sample::new(Utc::now()).with_price(Venue::Orca, Some(dec!(0.5)));
        assert!(!engine.apply_if_fresh(1, &mut last_applied, stale));

        assert_eq!(engine.window_len(), 1);
        assert_eq!(
            engine.venue_metrics(Venue::Orca).map(|m| m.status),
            Some(PegStatus::Pegged)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_and_stop_lifecycle() {
        let mut engine = MonitorEngine::new(fixed_sources(), EngineConfig::default());
        let stopper = engine.stop_handle();
        let mut rx = engine.subscribe();

        let handle = tokio::spawn(async move {
            engine.run().await;
            engine
        });

        // First published snapshot proves a full tick completed.
        rx.changed().await.unwrap();
        assert!(rx.borrow().venues.contains_key(&Venue::Orca));

        stopper.stop();
        let engine = handle.await.unwrap();
        assert!(!stopper.is_running());
        assert!(engine.window_len() >= 1);
    }
}
