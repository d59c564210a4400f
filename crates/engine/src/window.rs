//! Rolling sample window.
//!
//! Multi-venue snapshots bounded by a wall-clock horizon rather than a
//! count. Every append evicts entries that have aged out, so queries only
//! ever see live entries.

use chrono::{DateTime, TimeDelta, Utc};
use pegwatch_domain::Venue;
use pegwatch_domain::constants::WINDOW_HORIZON_HOURS;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// A single venue read taken during one polling tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceObservation {
    /// The venue that was read.
    pub venue: Venue,
    /// Observed price, or `None` when the venue was unavailable.
    pub price: Option<Decimal>,
    /// When the read resolved.
    pub observed_at: DateTime<Utc>,
}

/// All venue prices captured at one polling tick.
///
/// Failed reads are recorded as `None` so the historical denominator only
/// counts samples the venue actually produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Tick timestamp.
    pub captured_at: DateTime<Utc>,
    /// Per-venue price, `None` for unavailable venues.
    pub prices: BTreeMap<Venue, Option<Decimal>>,
}

impl Sample {
    /// Creates an empty sample at the given tick time.
    #[must_use]
    pub fn new(captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            prices: BTreeMap::new(),
        }
    }

    /// Records one venue price.
    #[must_use]
    pub fn with_price(mut self, venue: Venue, price: Option<Decimal>) -> Self {
        self.prices.insert(venue, price);
        self
    }

    /// Assembles a sample from resolved observations.
    #[must_use]
    pub fn from_observations(
        captured_at: DateTime<Utc>,
        observations: impl IntoIterator<Item = PriceObservation>,
    ) -> Self {
        let mut sample = Self::new(captured_at);
        for obs in observations {
            sample.prices.insert(obs.venue, obs.price);
        }
        sample
    }

    /// Price recorded for a venue, flattened over missing entries.
    #[must_use]
    pub fn price(&self, venue: Venue) -> Option<Decimal> {
        self.prices.get(&venue).copied().flatten()
    }
}

/// Time-ordered sequence of samples bounded by a fixed horizon.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    horizon: TimeDelta,
    samples: VecDeque<Sample>,
}

impl SampleWindow {
    /// Creates a window with the given horizon.
    #[must_use]
    pub fn new(horizon: TimeDelta) -> Self {
        Self {
            horizon,
            samples: VecDeque::new(),
        }
    }

    /// Window horizon.
    #[must_use]
    pub fn horizon(&self) -> TimeDelta {
        self.horizon
    }

    /// Appends a sample and evicts entries that aged out as of its tick time.
    pub fn append(&mut self, sample: Sample) {
        let now = sample.captured_at;
        self.samples.push_back(sample);
        self.evict_older_than(now);
    }

    /// Drops entries whose age as of `now` has reached the horizon.
    ///
    /// A negative computed age (clock moved backward) counts as zero, so a
    /// skewed clock never flushes the whole window.
    pub fn evict_older_than(&mut self, now: DateTime<Utc>) {
        while let Some(front) = self.samples.front() {
            let age = (now - front.captured_at).max(TimeDelta::zero());
            if age >= self.horizon {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Retained samples, oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Most recent sample.
    #[must_use]
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Oldest retained sample.
    #[must_use]
    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Number of retained samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(TimeDelta::hours(WINDOW_HORIZON_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_append_preserves_order() {
        let mut window = SampleWindow::default();
        for minute in 0..5 {
            window.append(Sample::new(base_time() + TimeDelta::minutes(minute)));
        }

        let timestamps: Vec<_> = window.iter().map(|s| s.captured_at).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted);
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn test_window_bounded_by_horizon_not_count() {
        let mut window = SampleWindow::default();

        // One sample per minute from t=0 through t=30h.
        for minute in 0..=(30 * 60) {
            let sample = Sample::new(base_time() + TimeDelta::minutes(minute))
                .with_price(Venue::Orca, Some(dec!(0.9997)));
            window.append(sample);
        }

        assert!(window.len() <= 24 * 60);
        let now = base_time() + TimeDelta::minutes(30 * 60);
        for sample in window.iter() {
            assert!(now - sample.captured_at < TimeDelta::hours(24));
        }
    }

    #[test]
    fn test_clock_moving_backward_does_not_flush() {
        let mut window = SampleWindow::default();
        window.append(Sample::new(base_time() + TimeDelta::minutes(100)));

        // Clock jumps back; the earlier entry's age computes negative.
        window.append(Sample::new(base_time() + TimeDelta::minutes(50)));
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn test_price_lookup_flattens_unavailable() {
        let sample = Sample::new(base_time())
            .with_price(Venue::Orca, Some(dec!(0.999)))
            .with_price(Venue::Raydium, None);

        assert_eq!(sample.price(Venue::Orca), Some(dec!(0.999)));
        assert_eq!(sample.price(Venue::Raydium), None);
        assert_eq!(sample.price(Venue::Coingecko), None);
    }

    #[test]
    fn test_from_observations() {
        let obs = vec![
            PriceObservation {
                venue: Venue::Coingecko,
                price: Some(dec!(1.0001)),
                observed_at: base_time(),
            },
            PriceObservation {
                venue: Venue::Orca,
                price: None,
                observed_at: base_time(),
            },
        ];

        let sample = Sample::from_observations(base_time(), obs);
        assert_eq!(sample.price(Venue::Coingecko), Some(dec!(1.0001)));
        assert_eq!(sample.price(Venue::Orca), None);
    }
}
