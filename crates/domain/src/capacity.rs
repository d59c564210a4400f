//! Reserve capacity model.
//!
//! Pure functions mapping reserve parameters to swap and volume capacity.
//! Inputs are not clamped here: out-of-range values (negative TVL, weight
//! above 100) are a caller contract violation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Reserve parameters for the capacity model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveConfig {
    /// Total value locked in the reserve, USD.
    pub tvl: Decimal,
    /// Share of TVL held as the stable buffer, percent in [0, 100].
    pub usdc_weight_pct: Decimal,
    /// Rebalance cycles per day.
    pub cycles_per_day: u32,
    /// Restock efficiency per cycle, percent in [0, 100].
    pub efficiency_pct: Decimal,
}

impl ReserveConfig {
    /// Creates a reserve config with default weight, cadence, and efficiency.
    #[must_use]
    pub fn new(tvl: Decimal) -> Self {
        Self {
            tvl,
            usdc_weight_pct: dec!(80),
            cycles_per_day: 12,
            efficiency_pct: dec!(90),
        }
    }

    /// Sets the stable-buffer weight.
    #[must_use]
    pub fn with_usdc_weight(mut self, pct: Decimal) -> Self {
        self.usdc_weight_pct = pct;
        self
    }

    /// Sets the rebalance cadence.
    #[must_use]
    pub fn with_cycles_per_day(mut self, cycles: u32) -> Self {
        self.cycles_per_day = cycles;
        self
    }

    /// Sets the restock efficiency.
    #[must_use]
    pub fn with_efficiency(mut self, pct: Decimal) -> Self {
        self.efficiency_pct = pct;
        self
    }
}

/// Capacity derived from a reserve configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResult {
    /// Stable-asset buffer available to fund at-peg swaps.
    pub usdc_buffer: Decimal,
    /// Largest single swap the buffer can absorb.
    pub max_single_swap: Decimal,
    /// Volume sustainable over one day of rebalance cycles.
    pub daily_capacity: Decimal,
    /// Daily capacity spread over 24 hours.
    pub hourly_capacity: Decimal,
}

/// Computes swap and volume capacity for a reserve.
///
/// buffer = tvl * weight / 100; daily = buffer * cycles * efficiency / 100.
#[must_use]
pub fn reserve_capacity(config: &ReserveConfig) -> CapacityResult {
    let usdc_buffer = config.tvl * config.usdc_weight_pct / dec!(100);
    let daily_capacity =
        usdc_buffer * Decimal::from(config.cycles_per_day) * config.efficiency_pct / dec!(100);

    CapacityResult {
        usdc_buffer,
        max_single_swap: usdc_buffer,
        daily_capacity,
        hourly_capacity: daily_capacity / dec!(24),
    }
}
