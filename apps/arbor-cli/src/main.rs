mod agents;
mod driver;

use anyhow::Context;
use arbor_common::{GameConstants, RobotType};
use arbor_kernel::World;
use arbor_meter::ExecutionMeter;
use arbor_persist::{MemoryPayload, TeamMemoryStore};
use arbor_tools::MatchInspector;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arbor-cli", about = "Run scripted arbor matches")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, rule constants and the robot type table
    Info,
    /// Run a scripted demo match
    Run {
        /// Round limit for the match
        #[arg(short, long, default_value = "200")]
        rounds: u32,
        /// Seed for id sampling
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print the inspector summary every N rounds (0 disables)
        #[arg(short, long, default_value = "50")]
        every: u32,
        /// JSON file overriding the rule constants
        #[arg(long)]
        config: Option<PathBuf>,
        /// Team memory file read before and written after the match
        #[arg(long)]
        memory: Option<PathBuf>,
    },
}

fn load_constants(path: Option<&Path>) -> anyhow::Result<GameConstants> {
    let constants = match path {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConstants::default(),
    };
    constants.validate()?;
    Ok(constants)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Info => {
            println!("arbor-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", serde_json::to_string_pretty(&GameConstants::default())?);
            for kind in RobotType::ALL {
                let s = kind.stats();
                println!(
                    "{kind:?}: hp={} radius={} stride={} sensor={} fuel={}",
                    s.max_health, s.body_radius, s.stride_radius, s.sensor_radius, s.fuel_limit
                );
            }
        }
        Commands::Run {
            rounds,
            seed,
            every,
            config,
            memory,
        } => {
            let constants = load_constants(config.as_deref())?;
            let length = constants.team_memory_length;
            let store = memory.map(TeamMemoryStore::new);
            let previous = match &store {
                Some(store) => store.load_or_empty(length)?,
                None => MemoryPayload {
                    length,
                    matches: 0,
                    teams: [Vec::new(), Vec::new()],
                },
            };
            println!(
                "Match: seed={seed}, rounds={rounds}, series match #{}",
                previous.matches + 1
            );

            let scenario = driver::demo_scenario(constants, seed, rounds, previous.teams.clone());
            let mut world = World::new(scenario);
            let mut meter = ExecutionMeter::new();
            let report = driver::run_match(&mut world, &mut meter, every)?;

            println!("Ending: {:?}", report.ending);
            print!("{}", MatchInspector::summary(&world));
            println!("Events: {:?}", report.events);
            println!("{}", MatchInspector::fuel_report(meter.history()));

            if let Some(store) = &store {
                let payload = MemoryPayload::capture(world.team_memory(), previous.matches + 1);
                store.save(&payload)?;
                println!("Team memory saved to {}", store.path().display());
            }
        }
    }

    Ok(())
}
