//! Cross-venue metric aggregation.
//!
//! Derives live and historical depeg metrics from the current sample
//! window. Everything here is recomputed in full from the window on each
//! change rather than patched incrementally, so the live and historical
//! views can never drift apart.

use crate::window::SampleWindow;
use chrono::{DateTime, Utc};
use pegwatch_domain::{PegStatus, Venue, classify};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Depeg history of one venue over the sample window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalMetrics {
    /// Samples classified as depegged.
    pub depegged_samples: u64,
    /// Samples where the venue produced a price.
    pub total_samples: u64,
    /// depegged / total as a percentage; zero when the venue has no samples.
    pub depeg_percent: Decimal,
    /// Hours covered by the window, measured from its oldest sample.
    pub sample_period_hours: Decimal,
}

/// Live and historical metrics for one venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueMetrics {
    /// Status derived from the latest sample.
    pub status: PegStatus,
    /// Live spread below peg in basis points.
    pub depeg_bps: Decimal,
    /// Window history for the venue.
    pub history: HistoricalMetrics,
}

impl VenueMetrics {
    /// Whether the venue is currently depegged.
    #[must_use]
    pub fn is_depegged(&self) -> bool {
        self.status == PegStatus::Depegged
    }
}

/// Cross-venue aggregate snapshot.
///
/// The cross-venue fields exclude the off-chain reference aggregator; its
/// per-venue metrics are still present in the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    /// Per-venue metrics, keyed by venue.
    pub venues: BTreeMap<Venue, VenueMetrics>,
    /// Whether any non-reference venue is currently depegged.
    pub any_depegged: bool,
    /// Largest live spread among venues below peg, zero when none are.
    pub max_depeg_bps: Decimal,
    /// Unweighted mean of per-venue historical depeg percentages.
    ///
    /// A venue with zero historical samples contributes 0% to this mean
    /// rather than being excluded; the smoothing is deliberate.
    pub avg_depeg_percent: Decimal,
    /// Non-reference venues currently depegged.
    pub depegged_venues: BTreeSet<Venue>,
}

impl AggregateMetrics {
    /// An empty snapshot, as published before the first poll completes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            venues: BTreeMap::new(),
            any_depegged: false,
            max_depeg_bps: Decimal::ZERO,
            avg_depeg_percent: Decimal::ZERO,
            depegged_venues: BTreeSet::new(),
        }
    }
}

/// Computes the full aggregate snapshot from the window as of `now`.
#[must_use]
pub fn aggregate(window: &SampleWindow, now: DateTime<Utc>) -> AggregateMetrics {
    let mut venues = BTreeMap::new();
    for venue in Venue::ALL {
        venues.insert(venue, venue_metrics(window, venue, now));
    }

    let mut any_depegged = false;
    let mut max_depeg_bps = Decimal::ZERO;
    let mut depeg_percent_sum = Decimal::ZERO;
    let mut pool_venues: u64 = 0;
    let mut depegged_venues = BTreeSet::new();

    for (venue, metrics) in &venues {
        if venue.is_reference() {
            continue;
        }
        pool_venues += 1;
        depeg_percent_sum += metrics.history.depeg_percent;

        if metrics.is_depegged() {
            any_depegged = true;
            depegged_venues.insert(*venue);
        }
        if metrics.depeg_bps > Decimal::ZERO && metrics.depeg_bps > max_depeg_bps {
            max_depeg_bps = metrics.depeg_bps;
        }
    }

    let avg_depeg_percent = if pool_venues == 0 {
        Decimal::ZERO
    } else {
        depeg_percent_sum / Decimal::from(pool_venues)
    };

    AggregateMetrics {
        venues,
        any_depegged,
        max_depeg_bps,
        avg_depeg_percent,
        depegged_venues,
    }
}

/// Derives one venue's live and historical metrics.
#[must_use]
pub fn venue_metrics(window: &SampleWindow, venue: Venue, now: DateTime<Utc>) -> VenueMetrics {
    let live = classify(window.latest().and_then(|sample| sample.price(venue)));

    let mut depegged_samples: u64 = 0;
    let mut total_samples: u64 = 0;
    for sample in window.iter() {
        let Some(price) = sample.price(venue) else {
            continue;
        };
        total_samples += 1;
        if classify(Some(price)).status == PegStatus::Depegged {
            depegged_samples += 1;
        }
    }

    let depeg_percent = if total_samples == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(depegged_samples) * Decimal::from(100) / Decimal::from(total_samples)
    };

    let sample_period_hours = match window.oldest() {
        Some(oldest) => {
            let seconds = (now - oldest.captured_at).num_seconds().max(0);
            Decimal::from(seconds) / Decimal::from(3600)
        }
        None => Decimal::ZERO,
    };

    VenueMetrics {
        status: live.status,
        depeg_bps: live.depeg_bps,
        history: HistoricalMetrics {
            depegged_samples,
            total_samples,
            depeg_percent,
            sample_period_hours,
        },
    }
}
