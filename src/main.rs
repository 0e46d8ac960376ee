//! leafcutter - CLI entry point.
//!
//! Thin shell over the simulation engine: steps a colony, prints status
//! lines or the live grid, and dumps the metrics summary at the end.

use clap::{Parser, Subcommand};
use leafcutter::{SimState, Simulation, SimulationConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "leafcutter")]
#[command(version)]
#[command(about = "Grid-based leafcutter ant colony ecosystem simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Render the grid each tick, paced by the configured
        /// animation speed
        #[arg(short, long)]
        watch: bool,

        /// Steps between status lines
        #[arg(long, default_value = "10")]
        status_interval: u64,

        /// Write the per-tick metrics series to this JSON file
        #[arg(short, long)]
        metrics: Option<PathBuf>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            seed,
            watch,
            status_interval,
            metrics,
        } => run_simulation(config, seed, watch, status_interval, metrics),
        Commands::Init { output } => generate_config(output),
    }
}

fn run_simulation(
    config_path: PathBuf,
    seed: Option<u64>,
    watch: bool,
    status_interval: u64,
    metrics_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = if config_path.exists() {
        println!("Loading config from: {config_path:?}");
        SimulationConfig::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        SimulationConfig::default()
    };

    let frame_delay = Duration::from_secs_f32(config.animation_speed);
    let mut sim = match seed {
        Some(s) => {
            println!("Using seed: {s}");
            Simulation::with_seed(config, s)
        }
        None => Simulation::new(config),
    };

    println!("Starting simulation");
    println!("  Grid: {0}x{0}", sim.environment.grid_size);
    println!("  Initial ants: {}", sim.environment.ants.len());
    println!("  Step budget: {}", sim.status().max_steps);
    println!();

    loop {
        let grid = sim.step_once();
        if sim.state() != SimState::Running {
            break;
        }

        if watch {
            println!("{grid}");
            println!();
            std::thread::sleep(frame_delay);
        }
        if sim.current_step() % status_interval == 0 {
            print_status(&sim);
        }
    }

    println!();
    println!("=== Simulation Complete ===");
    print_status(&sim);
    let (score, assessment) = sim.balance().sustainability(&sim.environment);
    println!("Sustainability: {score:.2}");
    println!("{assessment}");

    if let Some(summary) = sim.metrics_summary() {
        println!(
            "Colony {} after {} steps (peak {} ants)",
            if summary.colony_survived {
                "survived"
            } else {
                "collapsed"
            },
            summary.steps_survived,
            summary.peak_counts.ants,
        );
    }
    if let Some(path) = metrics_path {
        sim.metrics().save_json(&path.to_string_lossy())?;
        println!("Metrics series: {path:?}");
    }

    Ok(())
}

fn print_status(sim: &Simulation) {
    let status = sim.status();
    println!(
        "Step {:4}/{} | Ants:{:4} Plants:{:4} Fungi:{:4} Parasites:{:3} Predators:{:3} | Food:{:6.1} | {} | Risk: {}",
        status.step,
        status.max_steps,
        status.entity_counts.ants,
        status.entity_counts.plants,
        status.entity_counts.fungi,
        status.entity_counts.parasites,
        status.entity_counts.predators,
        status.total_food,
        status.climate.label(),
        status.extinction_risk,
    );
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulationConfig::default();
    config.save(&output)?;
    println!("Default configuration written to {output:?}");
    Ok(())
}
