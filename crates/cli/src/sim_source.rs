//! Simulated price venues for the monitor demo.
//!
//! Real venue clients live outside this repository; the demo feeds the
//! engine from a jittered random walk around the peg instead, with
//! occasional depeg dips and read failures so every metric path lights up.

use async_trait::async_trait;
use pegwatch_domain::Venue;
use pegwatch_engine::{PriceSource, SourceError};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// A venue source producing random prices near the peg.
pub struct SimulatedVenue {
    venue: Venue,
    depeg_probability: f64,
}

impl SimulatedVenue {
    /// Creates a simulated source for a venue.
    ///
    /// `depeg_probability` is the per-read chance of a below-threshold dip.
    #[must_use]
    pub fn new(venue: Venue, depeg_probability: f64) -> Self {
        Self {
            venue,
            depeg_probability,
        }
    }
}

#[async_trait]
impl PriceSource for SimulatedVenue {
    fn venue(&self) -> Venue {
        self.venue
    }

    async fn read_price(&self) -> Result<Decimal, SourceError> {
        let mut rng = rand::rng();

        // 2% of reads fail outright.
        if rng.random_bool(0.02) {
            return Err(SourceError::Unavailable);
        }

        let price = if rng.random_bool(self.depeg_probability) {
            1.0 - rng.random_range(0.0006..0.004)
        } else {
            1.0 + rng.random_range(-0.0004..0.0004)
        };

        Decimal::from_f64(price)
            .map(|p| p.round_dp(6))
            .ok_or(SourceError::Unavailable)
    }
}
