//! Venue price-source boundary.
//!
//! Venue-specific network clients live outside the engine; they plug in
//! through [`PriceSource`]. Reads are hardened at this boundary with a
//! per-read timeout, and every failure mode degrades to an unavailable
//! observation rather than blocking or aborting the tick.

use crate::window::PriceObservation;
use async_trait::async_trait;
use chrono::Utc;
use pegwatch_domain::Venue;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// A failed venue read. Always non-fatal.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The venue answered but carried no usable price.
    #[error("venue returned no price")]
    Unavailable,
    /// The read exceeded the per-read deadline.
    #[error("read timed out after {0:?}")]
    Timeout(Duration),
    /// Transport-level failure.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Read-current-price capability for one named venue.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// The venue this source reads.
    fn venue(&self) -> Venue;

    /// Reads the venue's current price.
    ///
    /// # Errors
    /// Returns a [`SourceError`] when no price could be obtained; the engine
    /// records the venue as unavailable for the tick.
    async fn read_price(&self) -> Result<Decimal, SourceError>;
}

/// Reads one source under a deadline, mapping every failure to `None`.
pub async fn read_with_timeout(source: &dyn PriceSource, limit: Duration) -> PriceObservation {
    let venue = source.venue();
    let price = match tokio::time::timeout(limit, source.read_price()).await {
        Ok(Ok(price)) => Some(price),
        Ok(Err(error)) => {
            warn!(venue = %venue, error = %error, "Venue read failed");
            None
        }
        Err(_) => {
            warn!(venue = %venue, limit = ?limit, "Venue read timed out");
            None
        }
    };

    PriceObservation {
        venue,
        price,
        observed_at: Utc::now(),
    }
}
