//! Depeg monitoring engine.
//!
//! Polls configured price venues on a fixed cadence, maintains a rolling
//! 24-hour sample window, and derives live and historical depeg metrics.
//! The engine owns an explicit start/stop lifecycle and publishes each new
//! aggregate snapshot through a watch channel, so it carries no dependency
//! on any presentation layer.

/// Cross-venue metric aggregation.
pub mod aggregate;
/// Polling monitor engine and lifecycle.
pub mod engine;
/// Venue price-source trait and read hardening.
pub mod source;
/// Rolling sample window.
pub mod window;

pub use aggregate::{AggregateMetrics, HistoricalMetrics, VenueMetrics, aggregate};
pub use engine::{EngineConfig, MonitorEngine, StopHandle, collect_sample};
pub use source::{PriceSource, SourceError, read_with_timeout};
pub use window::{PriceObservation, Sample, SampleWindow};
