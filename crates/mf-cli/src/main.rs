//! MathForge command line
//!
//! Usage:
//!   mathforge run --config math.yaml      - Simulate and export a configured game
//!   mathforge demo                        - Built-in base/bonus example
//!   mathforge validate --config math.yaml - Check a config without running it

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mf_dist::{Distribution, ExportReport, MathConfig, ModeManager, ModeStatistics, export_all};
use mf_event::{TriggerContext, Weekday, parse_clock_minutes};

/// Seeds used by `demo` for the base and bonus modes
const DEMO_SEEDS: [(&str, u64); 2] = [("base", 42), ("bonus", 123)];

#[derive(Parser)]
#[command(name = "mathforge", version, about = "Slot game mode distribution engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate every configured mode, print statistics and export
    Run {
        /// Config file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: PathBuf,
        /// Rounds per mode
        #[arg(short = 'n', long)]
        simulations: Option<usize>,
        /// Base seed (mode i uses seed + i)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluate configured events on every round
        #[arg(long)]
        events: bool,
        /// Attach reveal/finalWin events to every round
        #[arg(long)]
        game_events: bool,
        /// Weekday seen by time triggers (e.g. `sat`)
        #[arg(long, requires = "time")]
        day: Option<Weekday>,
        /// Wall-clock `HH:MM` seen by time triggers
        #[arg(long, requires = "day")]
        time: Option<String>,
        /// Print statistics only
        #[arg(long)]
        no_export: bool,
    },
    /// Run the built-in base (cost 1) and bonus (cost 100) modes
    Demo {
        /// Rounds per mode
        #[arg(short = 'n', long, default_value_t = mf_dist::config::DEFAULT_SIMULATIONS)]
        simulations: usize,
        /// Output directory
        #[arg(short, long, default_value = mf_dist::config::DEFAULT_OUTPUT_DIR)]
        output: PathBuf,
    },
    /// Report configuration problems
    Validate {
        /// Config file (.json, .yaml or .yml)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            simulations,
            seed,
            output,
            events,
            game_events,
            day,
            time,
            no_export,
        } => {
            let mut math = load_config(&config)?;
            if let Some(simulations) = simulations {
                math.simulations = simulations;
            }
            if let Some(seed) = seed {
                math.base_seed = seed;
            }
            if let Some(output) = output {
                math.output_dir = output;
            }
            math.use_events |= events;
            math.game_events |= game_events;
            let clock = match (day, time) {
                (Some(day), Some(time)) => {
                    if parse_clock_minutes(&time).is_none() {
                        bail!("--time expects HH:MM, got '{}'", time);
                    }
                    TriggerContext::default().with_clock(day, time)
                }
                _ => TriggerContext::default(),
            };
            run(&math, &clock, !no_export)
        }
        Commands::Demo {
            simulations,
            output,
        } => demo(simulations, &output),
        Commands::Validate { config } => validate(&config),
    }
}

fn load_config(path: &Path) -> Result<MathConfig> {
    MathConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn run(config: &MathConfig, clock: &TriggerContext, export: bool) -> Result<()> {
    config.validate().context("Invalid config")?;

    let mut manager = ModeManager::from_config(config);
    println!(
        "🎰 Simulating {} mode(s) × {} rounds (base seed {})\n",
        manager.mode_count(),
        config.simulations,
        config.base_seed
    );

    if clock.day.is_some() && !config.use_events {
        log::warn!("--day/--time only apply to event runs; pass --events");
    }

    if config.use_events {
        if config.game_events {
            log::warn!("Both events and game events requested; rounds carry triggered events only");
        }
        let mut trigger_rng: Box<dyn RngCore> = match config.event_seed {
            Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        };
        manager.run_all_simulations_with_events_at(config.simulations, clock, &mut *trigger_rng)?;
    } else if config.game_events {
        manager.run_all_simulations_with_game_events(config.simulations)?;
    } else {
        manager.run_all_simulations(config.simulations)?;
    }

    print_header();
    for entry in manager.modes() {
        if let Some(stats) = &entry.stats {
            print_row(&entry.name, entry.cost, stats);
        }
    }

    if config.use_events && !manager.events().is_empty() {
        println!("\nEvents:");
        for event in manager.events().events() {
            println!(
                "  {:<20} {:<10} active={:<5} ~{:.4}% of rounds, rtpBoost {:.2}",
                event.id,
                event.trigger.kind(),
                event.active,
                event.estimated_activation_rate() * 100.0,
                event.modifiers.rtp_boost
            );
        }
    }

    if export {
        let report = manager
            .export_files(&config.output_dir)
            .with_context(|| format!("Export to {} failed", config.output_dir.display()))?;
        print_report(&report);
    }
    Ok(())
}

fn demo(simulations: usize, output: &Path) -> Result<()> {
    let config = MathConfig::demo();
    let mut dist: Distribution = config.distribution()?;

    println!("🎰 Demo: {} rounds per mode\n", simulations);
    for (mode, seed) in DEMO_SEEDS {
        dist.run_simulations(mode, simulations, seed)?;
    }

    print_header();
    for mode in dist.modes() {
        print_row(mode.name(), mode.cost(), &dist.statistics(mode.name()));
    }

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let report = export_all(&dist, None, output)
        .with_context(|| format!("Export to {} failed", output.display()))?;
    print_report(&report);
    Ok(())
}

fn validate(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    let problems = config.problems();
    if problems.is_empty() {
        println!(
            "✅ {}: {} mode(s), {} event(s)",
            path.display(),
            config.modes.len(),
            config.events.len()
        );
        return Ok(());
    }

    println!("❌ {}:", path.display());
    for problem in &problems {
        println!("  - {problem}");
    }
    bail!("{} problem(s) found", problems.len())
}

fn print_header() {
    println!(
        "{:<16} {:>8} {:>10} {:>9} {:>10} {:>10} {:>10} {:>8} {:>9}",
        "mode", "cost", "rounds", "RTP %", "variance", "std dev", "volatility", "hit %", "max"
    );
}

fn print_row(name: &str, cost: f64, stats: &ModeStatistics) {
    println!(
        "{:<16} {:>8.1} {:>10} {:>9.3} {:>10.4} {:>10.4} {:>10.4} {:>8.2} {:>9.2}",
        name,
        cost,
        stats.simulations,
        stats.rtp_percent(),
        stats.variance,
        stats.std_deviation,
        stats.volatility,
        stats.hit_frequency,
        stats.max_payout
    );
}

fn print_report(report: &ExportReport) {
    println!("\n📦 Exported:");
    for file in report.files() {
        println!("  {}", file.display());
    }
}
