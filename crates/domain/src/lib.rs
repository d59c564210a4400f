//! Domain layer for the pegwatch analytics engine.
//!
//! Pure types and calculations shared by the monitoring engine and the
//! capacity simulator:
//! - Venue and peg-status enumerations
//! - Depeg classification against the fixed peg threshold
//! - Reserve capacity model
//! - Fee economics (trader/solver/protocol split)
//! - Swap-tier reference table and per-tier profitability

/// Depeg classification.
pub mod classifier;
/// Shared protocol constants.
pub mod constants;
/// Reserve capacity model.
pub mod capacity;
/// Fee split economics.
pub mod economics;
/// Venue and status enumerations.
pub mod enums;
/// Swap-size tier reference table.
pub mod tiers;

pub use capacity::{CapacityResult, ReserveConfig, reserve_capacity};
pub use classifier::{Classification, classify};
pub use economics::{
    Distribution, EconomicsConfig, FeeSplit, effective_spread_bps, fee_distribution,
    max_fee_projection, split_fees,
};
pub use enums::{PegStatus, Venue};
pub use tiers::{SWAP_TIERS, SwapTier, TierProfit, tier_profitability};
