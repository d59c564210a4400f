//! Depeg classification.
//!
//! Maps a single price observation to a peg status and a spread below peg in
//! basis points. Total function, no side effects.

use crate::constants::{BPS_PER_UNIT, DEPEG_THRESHOLD, PEG};
use crate::enums::PegStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of classifying one price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Peg status of the observation.
    pub status: PegStatus,
    /// Spread below peg in basis points, rounded to one decimal place.
    /// Zero when the price is at or above peg, or unavailable.
    pub depeg_bps: Decimal,
}

/// Classifies a price against the peg.
///
/// A venue is depegged iff its price is strictly below the threshold.
/// `depeg_bps = round(max(0, 1 - price) * 10000, 1dp)` when the price is
/// below peg, else zero.
#[must_use]
pub fn classify(price: Option<Decimal>) -> Classification {
    let Some(price) = price else {
        return Classification {
            status: PegStatus::Unavailable,
            depeg_bps: Decimal::ZERO,
        };
    };

    let depeg_bps = if price < PEG {
        ((PEG - price) * BPS_PER_UNIT).round_dp(1)
    } else {
        Decimal::ZERO
    };

    let status = if price < DEPEG_THRESHOLD {
        PegStatus::Depegged
    } else {
        PegStatus::Pegged
    };

    Classification { status, depeg_bps }
}
