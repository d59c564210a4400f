//! Capacity evolution over one day.
//!
//! Discrete-time, fixed-step simulation of the protocol-side buffer:
//! swap volume drains it continuously, and each rebalance cycle restocks
//! it at the configured efficiency. Pure function of its configuration;
//! independent runs share no state.
//!
//! Cycle boundaries are detected on integer step counts: the cycle length
//! is snapped to the nearest whole number of steps (minimum one), and a
//! step is a boundary iff its index is a positive multiple of that count.
//! No floating-point modulo is involved, so accumulated step error can
//! never skip or duplicate a reset.

use pegwatch_domain::capacity::{ReserveConfig, reserve_capacity};
use pegwatch_domain::constants::PROTOCOL_FEES_SHARE;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Configuration for one evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Reserve parameters.
    pub reserve: ReserveConfig,
    /// Swap volume demanded over the day, USD.
    pub daily_volume: Decimal,
    /// Simulation resolution in minutes. Must divide a day evenly.
    pub step_minutes: u32,
}

impl EvolutionConfig {
    /// Creates a config at the default 15-minute resolution.
    #[must_use]
    pub fn new(reserve: ReserveConfig, daily_volume: Decimal) -> Self {
        Self {
            reserve,
            daily_volume,
            step_minutes: 15,
        }
    }

    /// Sets the simulation resolution.
    #[must_use]
    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes;
        self
    }
}

/// One point of the capacity trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionPoint {
    /// Offset from the start of the day, hours.
    pub offset_hours: Decimal,
    /// Protocol-side capacity remaining at this offset.
    pub capacity: Decimal,
}

/// Simulates the buffer trajectory over one 24-hour day.
///
/// Starts at `buffer * 0.80` (the protocol-fees share of the buffer); at
/// every rebalance boundary after time zero the level resets to
/// `buffer * 0.80 * efficiency` (a partial restock), and between
/// boundaries it drains by the per-step share of daily volume, floored
/// at zero. The returned trajectory includes the point at time zero.
#[must_use]
pub fn simulate_capacity_evolution(config: &EvolutionConfig) -> Vec<EvolutionPoint> {
    let capacity = reserve_capacity(&config.reserve);
    let max_protocol_capacity = capacity.usdc_buffer * PROTOCOL_FEES_SHARE;
    let restock_level = max_protocol_capacity * config.reserve.efficiency_pct / dec!(100);

    let step_minutes = config.step_minutes.max(1);
    let total_steps = MINUTES_PER_DAY / step_minutes;
    let steps_per_cycle = cycle_steps(total_steps, config.reserve.cycles_per_day);

    let step_hours = Decimal::from(step_minutes) / dec!(60);
    let drain_per_step = config.daily_volume / dec!(24) * step_hours;

    let mut level = max_protocol_capacity;
    let mut points = Vec::with_capacity(total_steps as usize + 1);
    points.push(EvolutionPoint {
        offset_hours: Decimal::ZERO,
        capacity: level,
    });

    for step in 1..=total_steps {
        if step % steps_per_cycle == 0 {
            level = restock_level;
        } else {
            level = (level - drain_per_step).max(Decimal::ZERO);
        }

        points.push(EvolutionPoint {
            offset_hours: Decimal::from(step * step_minutes) / dec!(60),
            capacity: level,
        });
    }

    points
}

/// Nearest whole number of steps per rebalance cycle, minimum one.
fn cycle_steps(total_steps: u32, cycles_per_day: u32) -> u32 {
    if cycles_per_day == 0 {
        // No rebalancing: the single "cycle" outlasts the day.
        return total_steps + 1;
    }
    ((total_steps * 2 + cycles_per_day) / (cycles_per_day * 2)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_reserve() -> ReserveConfig {
        ReserveConfig::new(dec!(250000))
            .with_usdc_weight(dec!(80))
            .with_cycles_per_day(12)
            .with_efficiency(dec!(90))
    }

    #[test]
    fn test_initial_level_is_protocol_share_of_buffer() {
        let config = EvolutionConfig::new(reference_reserve(), dec!(2000000));
        let points = simulate_capacity_evolution(&config);

        assert_eq!(points[0].offset_hours, Decimal::ZERO);
        // 200,000 buffer * 0.80
        assert_eq!(points[0].capacity, dec!(160000));
    }

    #[test]
    fn test_spans_one_day_at_fifteen_minute_steps() {
        let config = EvolutionConfig::new(reference_reserve(), dec!(1000000));
        let points = simulate_capacity_evolution(&config);

        assert_eq!(points.len(), 97);
        assert_eq!(points.last().map(|p| p.offset_hours), Some(dec!(24)));
    }

    #[test]
    fn test_capacity_never_negative() {
        // Demand far above capacity drains to the floor.
        let config = EvolutionConfig::new(reference_reserve(), dec!(500000000));
        for point in simulate_capacity_evolution(&config) {
            assert!(point.capacity >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_rebalance_boundary_resets_exactly() {
        let config = EvolutionConfig::new(reference_reserve(), dec!(2000000));
        let points = simulate_capacity_evolution(&config);

        // 12 cycles/day at 15-minute steps: boundaries every 8 steps.
        let expected = dec!(160000) * dec!(90) / dec!(100);
        for step in (8..=96).step_by(8) {
            assert_eq!(points[step].capacity, expected, "step {step}");
        }
        // Time zero is not a boundary.
        assert_eq!(points[0].capacity, dec!(160000));
    }

    #[test]
    fn test_depletion_between_boundaries() {
        let config = EvolutionConfig::new(reference_reserve(), dec!(960000));
        let points = simulate_capacity_evolution(&config);

        // 960,000 / 24h * 0.25h = 10,000 per step.
        assert_eq!(points[1].capacity, points[0].capacity - dec!(10000));
        assert_eq!(points[2].capacity, points[1].capacity - dec!(10000));
    }

    #[test]
    fn test_uneven_cycle_count_snaps_to_nearest_step() {
        // 7 cycles/day at 15-minute steps: 96/7 ≈ 13.71 → 14 steps/cycle.
        let reserve = reference_reserve().with_cycles_per_day(7);
        let config = EvolutionConfig::new(reserve, dec!(2000000));
        let points = simulate_capacity_evolution(&config);

        let expected = dec!(160000) * dec!(90) / dec!(100);
        assert_eq!(points[14].capacity, expected);
        assert_ne!(points[13].capacity, expected);
    }

    #[test]
    fn test_runs_are_independent() {
        let config = EvolutionConfig::new(reference_reserve(), dec!(1234567));
        assert_eq!(
            simulate_capacity_evolution(&config),
            simulate_capacity_evolution(&config)
        );
    }

    #[test]
    fn test_zero_cycles_never_restocks() {
        let reserve = reference_reserve().with_cycles_per_day(0);
        let config = EvolutionConfig::new(reserve, dec!(960000));
        let points = simulate_capacity_evolution(&config);

        // Monotone drain, no resets.
        for pair in points.windows(2) {
            assert!(pair[1].capacity <= pair[0].capacity);
        }
    }
}
