//! Fee split economics.
//!
//! IOU issuance during a depegged swap splits between three roles: the
//! trader keeps a fixed 20%, and the remaining 80% divides between solver
//! and protocol at a configurable ratio. The split conserves the total
//! exactly for every input.

use crate::capacity::CapacityResult;
use crate::constants::{BPS_PER_UNIT, DEPEG_THRESHOLD_BPS, PROTOCOL_FEES_SHARE, TRADER_SHARE};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Economics parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Solver's share of the protocol-side fees, percent in [0, 100].
    pub solver_share_of_protocol_fees_pct: Decimal,
}

impl EconomicsConfig {
    /// Creates a config with the given solver share.
    #[must_use]
    pub fn new(solver_share_of_protocol_fees_pct: Decimal) -> Self {
        Self {
            solver_share_of_protocol_fees_pct,
        }
    }
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self::new(dec!(50))
    }
}

/// Fractional fee distribution across the three roles. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Trader fraction of total IOUs.
    pub trader_share: Decimal,
    /// Solver fraction of total IOUs.
    pub solver_share: Decimal,
    /// Protocol fraction of total IOUs.
    pub protocol_share: Decimal,
}

/// Absolute IOU amounts for one swap or projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Total IOUs issued.
    pub total_ious: Decimal,
    /// Trader leg.
    pub trader_ious: Decimal,
    /// Solver leg.
    pub solver_ious: Decimal,
    /// Protocol leg.
    pub protocol_ious: Decimal,
}

/// Derives the fractional distribution from a config.
///
/// trader = 0.20; solver = 0.80 * s; protocol = 0.80 * (1 - s), where s is
/// the solver share of protocol fees as a fraction.
#[must_use]
pub fn fee_distribution(config: &EconomicsConfig) -> Distribution {
    let solver_fraction = config.solver_share_of_protocol_fees_pct / dec!(100);
    let solver_share = PROTOCOL_FEES_SHARE * solver_fraction;

    Distribution {
        trader_share: TRADER_SHARE,
        solver_share,
        protocol_share: PROTOCOL_FEES_SHARE - solver_share,
    }
}

/// Splits the IOU issuance for an amount swapped at a given spread.
///
/// total = amount * spread_bps / 10000. The protocol leg is computed as the
/// remainder, so the three legs sum to the total exactly for every input.
#[must_use]
pub fn split_fees(amount: Decimal, spread_bps: Decimal, config: &EconomicsConfig) -> FeeSplit {
    let total_ious = amount * spread_bps / BPS_PER_UNIT;
    let distribution = fee_distribution(config);

    let trader_ious = total_ious * distribution.trader_share;
    let solver_ious = total_ious * distribution.solver_share;
    let protocol_ious = total_ious - trader_ious - solver_ious;

    FeeSplit {
        total_ious,
        trader_ious,
        solver_ious,
        protocol_ious,
    }
}

/// Floors a live spread at the depeg threshold.
///
/// The route is modeled as closed below 5 bps, so fee-at-capacity
/// projections never assume a thinner spread. The per-tier profitability
/// table uses the live spread unmodified instead.
#[must_use]
pub fn effective_spread_bps(live_spread_bps: Decimal) -> Decimal {
    live_spread_bps.max(DEPEG_THRESHOLD_BPS)
}

/// Capacity-limited maximum daily fee projection.
///
/// Applies the floored spread to the full daily capacity.
#[must_use]
pub fn max_fee_projection(
    capacity: &CapacityResult,
    live_spread_bps: Decimal,
    config: &EconomicsConfig,
) -> FeeSplit {
    split_fees(
        capacity.daily_capacity,
        effective_spread_bps(live_spread_bps),
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{ReserveConfig, reserve_capacity};

    #[test]
    fn test_distribution_sums_to_one() {
        for pct in [dec!(0), dec!(25), dec!(33.3), dec!(50), dec!(87.5), dec!(100)] {
            let d = fee_distribution(&EconomicsConfig::new(pct));
            assert_eq!(d.trader_share + d.solver_share + d.protocol_share, dec!(1));
        }
    }

    #[test]
    fn test_reference_split_vector() {
        let config = EconomicsConfig::new(dec!(50));
        let split = split_fees(dec!(100000), dec!(30), &config);
        assert_eq!(split.total_ious, dec!(300));
        assert_eq!(split.trader_ious, dec!(60));
        assert_eq!(split.solver_ious, dec!(120));
        assert_eq!(split.protocol_ious, dec!(120));
    }

    #[test]
    fn test_conservation_is_exact() {
        let amounts = [dec!(1), dec!(99.99), dec!(100000), dec!(12345678.9)];
        let spreads = [dec!(0), dec!(1), dec!(5), dec!(30), dec!(333.3)];
        let shares = [dec!(0), dec!(12.5), dec!(33.3), dec!(66.67), dec!(100)];

        for amount in amounts {
            for spread in spreads {
                for share in shares {
                    let split = split_fees(amount, spread, &EconomicsConfig::new(share));
                    assert_eq!(
                        split.trader_ious + split.solver_ious + split.protocol_ious,
                        split.total_ious,
                    );
                }
            }
        }
    }

    #[test]
    fn test_extreme_solver_shares() {
        let all_solver = split_fees(dec!(1000), dec!(10), &EconomicsConfig::new(dec!(100)));
        assert_eq!(all_solver.solver_ious, dec!(0.8));
        assert_eq!(all_solver.protocol_ious, Decimal::ZERO);

        let no_solver = split_fees(dec!(1000), dec!(10), &EconomicsConfig::new(dec!(0)));
        assert_eq!(no_solver.solver_ious, Decimal::ZERO);
        assert_eq!(no_solver.protocol_ious, dec!(0.8));
    }

    #[test]
    fn test_spread_floor() {
        assert_eq!(effective_spread_bps(dec!(3)), dec!(5));
        assert_eq!(effective_spread_bps(dec!(5)), dec!(5));
        assert_eq!(effective_spread_bps(dec!(12)), dec!(12));
    }

    #[test]
    fn test_max_fee_projection_uses_floored_spread() {
        let capacity = reserve_capacity(&ReserveConfig::new(dec!(250000)));
        let config = EconomicsConfig::default();

        // Live spread of 3 bps floors to 5 bps over 2,160,000 daily capacity.
        let projection = max_fee_projection(&capacity, dec!(3), &config);
        assert_eq!(projection.total_ious, dec!(1080));
    }
}
