//! Command line interface for the pegwatch analytics engine.
use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pegwatch_domain::capacity::{ReserveConfig, reserve_capacity};
use pegwatch_domain::economics::{
    EconomicsConfig, fee_distribution, max_fee_projection, split_fees,
};
use pegwatch_domain::enums::Venue;
use pegwatch_domain::tiers::tier_profitability;
use pegwatch_engine::{EngineConfig, MonitorEngine, PriceSource};
use pegwatch_simulation::{EvolutionConfig, find_minimum_tvl, simulate_capacity_evolution};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

mod sim_source;
use sim_source::SimulatedVenue;

#[derive(Parser)]
#[command(name = "pegwatch")]
#[command(about = "Reserve capacity and depeg monitoring analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ReserveArgs {
    /// Total value locked in the reserve, USD
    #[arg(long, default_value = "250000")]
    tvl: Decimal,

    /// Stable-buffer share of TVL, percent
    #[arg(long, default_value = "80")]
    usdc_weight: Decimal,

    /// Rebalance cycles per day
    #[arg(long, default_value_t = 12)]
    cycles: u32,

    /// Restock efficiency, percent
    #[arg(long, default_value = "90")]
    efficiency: Decimal,
}

impl ReserveArgs {
    fn to_config(&self) -> ReserveConfig {
        ReserveConfig::new(self.tvl)
            .with_usdc_weight(self.usdc_weight)
            .with_cycles_per_day(self.cycles)
            .with_efficiency(self.efficiency)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute swap and volume capacity for a reserve
    Capacity {
        #[command(flatten)]
        reserve: ReserveArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Fee split economics for a swap and spread
    Economics {
        /// Swap amount, USD
        #[arg(long, default_value = "100000")]
        amount: Decimal,

        /// Live spread in basis points
        #[arg(long, default_value = "30")]
        spread_bps: Decimal,

        /// Solver share of protocol fees, percent
        #[arg(long, default_value = "50")]
        solver_share: Decimal,

        #[command(flatten)]
        reserve: ReserveArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Simulate buffer depletion and restock over one day
    Evolve {
        #[command(flatten)]
        reserve: ReserveArgs,

        /// Daily swap volume demand, USD
        #[arg(long, default_value = "2000000")]
        daily_volume: Decimal,

        /// Simulation resolution, minutes
        #[arg(long, default_value_t = 15)]
        step_minutes: u32,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find the smallest TVL sustaining a target volume
    SizeReserve {
        /// Target daily volume, USD
        #[arg(long)]
        target_daily_volume: Decimal,

        /// Largest single swap that must fit the buffer, USD
        #[arg(long, default_value = "0")]
        min_swap: Decimal,

        #[command(flatten)]
        reserve: ReserveArgs,
    },
    /// Poll simulated venues and print live depeg metrics
    Monitor {
        /// Seconds between polls
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,

        /// Number of snapshots to print before exiting
        #[arg(long, default_value_t = 10)]
        ticks: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capacity { reserve, json } => {
            let capacity = reserve_capacity(&reserve.to_config());
            if json {
                println!("{}", serde_json::to_string_pretty(&capacity)?);
            } else {
                println!("USDC buffer:     {}", capacity.usdc_buffer);
                println!("Max single swap: {}", capacity.max_single_swap);
                println!("Daily capacity:  {}", capacity.daily_capacity);
                println!("Hourly capacity: {}", capacity.hourly_capacity);
            }
        }
        Commands::Economics {
            amount,
            spread_bps,
            solver_share,
            reserve,
            json,
        } => {
            let config = EconomicsConfig::new(solver_share);
            let distribution = fee_distribution(&config);
            let split = split_fees(amount, spread_bps, &config);
            let capacity = reserve_capacity(&reserve.to_config());
            let projection = max_fee_projection(&capacity, spread_bps, &config);
            let tiers = tier_profitability(&config, spread_bps);

            if json {
                let out = serde_json::json!({
                    "distribution": distribution,
                    "split": split,
                    "max_daily_fee_projection": projection,
                    "tiers": tiers,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "Shares: trader {} / solver {} / protocol {}",
                    distribution.trader_share, distribution.solver_share, distribution.protocol_share
                );
                println!(
                    "Swap of {amount} at {spread_bps} bps issues {} IOUs \
                     (trader {}, solver {}, protocol {})",
                    split.total_ious, split.trader_ious, split.solver_ious, split.protocol_ious
                );
                println!(
                    "Max daily fee at capacity (spread floored at 5 bps): {}",
                    projection.total_ious
                );
                println!();
                println!("Per-tier profitability at the live spread:");
                for row in tiers {
                    println!(
                        "  {:<20} avg {:>8}  total {:>10}  solver {:>10}",
                        row.tier.label, row.tier.avg_size, row.split.total_ious, row.split.solver_ious
                    );
                }
            }
        }
        Commands::Evolve {
            reserve,
            daily_volume,
            step_minutes,
            json,
        } => {
            let config = EvolutionConfig::new(reserve.to_config(), daily_volume)
                .with_step_minutes(step_minutes);
            let points = simulate_capacity_evolution(&config);

            if json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                for point in points {
                    println!("{:>6}h  {}", point.offset_hours, point.capacity);
                }
            }
        }
        Commands::SizeReserve {
            target_daily_volume,
            min_swap,
            reserve,
        } => {
            match find_minimum_tvl(&reserve.to_config(), target_daily_volume, min_swap) {
                Some(tvl) => println!("Minimum TVL: {tvl}"),
                None => println!("No TVL in the search range satisfies both constraints"),
            }
        }
        Commands::Monitor {
            interval_secs,
            ticks,
        } => {
            monitor(interval_secs, ticks).await;
        }
    }

    Ok(())
}

/// Runs the engine against simulated venues and prints each snapshot.
async fn monitor(interval_secs: u64, ticks: u32) {
    let sources: Vec<Arc<dyn PriceSource>> = vec![
        Arc::new(SimulatedVenue::new(Venue::Coingecko, 0.05)),
        Arc::new(SimulatedVenue::new(Venue::Orca, 0.15)),
        Arc::new(SimulatedVenue::new(Venue::Raydium, 0.25)),
    ];

    let config = EngineConfig::default()
        .with_poll_interval(Duration::from_secs(interval_secs))
        .with_read_timeout(Duration::from_secs(2));

    let mut engine = MonitorEngine::new(sources, config);
    let stopper = engine.stop_handle();
    let mut rx = engine.subscribe();

    let handle = tokio::spawn(async move {
        engine.run().await;
    });

    println!("📡 Polling simulated venues every {interval_secs}s...");
    for _ in 0..ticks {
        if rx.changed().await.is_err() {
            break;
        }
        let metrics = rx.borrow_and_update().clone();
        println!(
            "any_depegged={} max_depeg_bps={} avg_depeg_pct={}",
            metrics.any_depegged, metrics.max_depeg_bps, metrics.avg_depeg_percent
        );
        for (venue, vm) in &metrics.venues {
            println!(
                "  {:<10} {:?} {} bps  ({}/{} depegged over {}h)",
                venue.label(),
                vm.status,
                vm.depeg_bps,
                vm.history.depegged_samples,
                vm.history.total_samples,
                vm.history.sample_period_hours.round_dp(2),
            );
        }
    }

    stopper.stop();
    let _ = handle.await;
}
