use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured price venue.
///
/// `Coingecko` is the off-chain reference aggregator; the pool variants are
/// on-chain venues. Cross-venue statistics exclude the reference venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    Coingecko,
    Orca,
    Raydium,
}

impl Venue {
    /// All configured venues, in stable order.
    pub const ALL: [Venue; 3] = [Venue::Coingecko, Venue::Orca, Venue::Raydium];

    /// Whether this venue is the off-chain reference aggregator.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Venue::Coingecko)
    }

    /// Human-readable venue name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Venue::Coingecko => "CoinGecko",
            Venue::Orca => "Orca",
            Venue::Raydium => "Raydium",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Peg status of a single price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PegStatus {
    /// The venue returned no price.
    Unavailable,
    /// Price at or above the depeg threshold.
    Pegged,
    /// Price strictly below the depeg threshold.
    Depegged,
}
