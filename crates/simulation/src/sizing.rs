//! Minimum-TVL grid search.
//!
//! Walks an ascending TVL grid rather than inverting the capacity formula
//! algebraically: the contract stays stable if the capacity model grows
//! non-linear terms, and the answers come out round and grid-aligned.

use pegwatch_domain::capacity::{ReserveConfig, reserve_capacity};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Grid step between candidate TVLs.
const TVL_GRID_STEP: Decimal = dec!(1000);

/// Upper end of the search range.
const TVL_GRID_MAX: Decimal = dec!(100000000);

/// Finds the smallest grid-aligned TVL satisfying both constraints.
///
/// A candidate passes when its daily capacity covers `target_daily_volume`
/// and its max single swap covers `min_swap_size`. Weight, cadence, and
/// efficiency are taken from `template`; its TVL is ignored. Returns `None`
/// when no grid point in the search range satisfies both — exhaustion is a
/// value here, never an error.
#[must_use]
pub fn find_minimum_tvl(
    template: &ReserveConfig,
    target_daily_volume: Decimal,
    min_swap_size: Decimal,
) -> Option<Decimal> {
    let mut tvl = TVL_GRID_STEP;
    while tvl <= TVL_GRID_MAX {
        let capacity = reserve_capacity(&ReserveConfig {
            tvl,
            ..template.clone()
        });
        if capacity.daily_capacity >= target_daily_volume && capacity.max_single_swap >= min_swap_size
        {
            return Some(tvl);
        }
        tvl += TVL_GRID_STEP;
    }
    None
}
