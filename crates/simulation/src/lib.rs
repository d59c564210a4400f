//! Deterministic capacity simulations.
//!
//! Discrete-time trajectory of reserve-buffer depletion and cyclical
//! replenishment over one day, and the grid search sizing the smallest
//! reserve that sustains a target volume.

/// Capacity evolution over one day.
pub mod evolution;
/// Minimum-TVL grid search.
pub mod sizing;

pub use evolution::{EvolutionConfig, EvolutionPoint, simulate_capacity_evolution};
pub use sizing::find_minimum_tvl;
