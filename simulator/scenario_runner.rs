// Scenario Runner - Replay scripted sessions from YAML files
//
// Usage:
//   cargo run --bin scenario_runner simulator/scenarios/cluster_walkthrough.yaml
//   cargo run --bin scenario_runner simulator/scenarios/  (runs all .yaml files in directory)
//   cargo run --bin scenario_runner simulator/scenarios/p2p_file_sharing.yaml --seed 0x1234...

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{info, warn, LevelFilter};
use simple_logger::SimpleLogger;

use ds_sim::ds_config::{format_seed, parse_seed_hex};
use ds_sim::{ActionKind, ActionSimulator, SimConfig, SimError, TopologyKind};

#[derive(Parser)]
#[command(name = "scenario_runner")]
#[command(about = "Replay scripted topology sessions from YAML")]
struct Args {
    /// Scenario file, or a directory of them
    path: PathBuf,

    /// Hex seed overriding the one in the scenario
    #[arg(long)]
    seed: Option<String>,
}

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    meta: ScenarioMeta,

    /// Hex seed (omitted = random)
    #[serde(default)]
    seed: Option<String>,

    /// Topology the steps run against
    topology: String,

    steps: Vec<ScenarioStep>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct ScenarioStep {
    action: String,

    #[serde(default = "default_repeat")]
    repeat: usize,
}

fn default_repeat() -> usize {
    1
}

fn main() {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let args = Args::parse();

    let seed = match args.seed.as_deref().map(parse_seed_hex).transpose() {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let path = args.path.as_path();
    let outcome = if path.is_file() {
        run_scenario_file(path, seed)
    } else if path.is_dir() {
        run_scenario_directory(path, seed)
    } else {
        eprintln!("Error: Path does not exist: {}", path.display());
        process::exit(1);
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_scenario_directory(dir: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    let mut scenarios = Vec::new();

    let entries = fs::read_dir(dir).map_err(|source| SimError::ConfigIo {
        path: dir.display().to_string(),
        source,
    })?;
    for entry in entries.flatten() {
        let path = entry.path();
        if matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        ) {
            scenarios.push(path);
        }
    }

    scenarios.sort();

    if scenarios.is_empty() {
        warn!("No .yaml files found in {}", dir.display());
        return Ok(());
    }

    println!("Found {} scenario(s) to run\n", scenarios.len());

    for (i, scenario_path) in scenarios.iter().enumerate() {
        println!("{}/{} Running: {}", i + 1, scenarios.len(), scenario_path.display());
        run_scenario_file(scenario_path, seed)?;
    }

    println!("All scenarios complete!");
    Ok(())
}

fn load_scenario(path: &Path) -> Result<ScenarioFile, SimError> {
    let yaml_content = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
        path: path.display().to_string(),
        source,
    })?;

    serde_yaml::from_str(&yaml_content).map_err(|source| SimError::ConfigParse {
        path: path.display().to_string(),
        source,
    })
}

fn run_scenario_file(path: &Path, seed: Option<[u8; 32]>) -> Result<(), SimError> {
    info!("Loading scenario from: {}", path.display());
    let scenario = load_scenario(path)?;

    // resolve everything before touching the session
    let kind: TopologyKind = scenario.topology.parse()?;
    let steps = scenario
        .steps
        .iter()
        .map(|step| -> Result<(ActionKind, usize), SimError> {
            Ok((step.action.parse()?, step.repeat))
        })
        .collect::<Result<Vec<_>, SimError>>()?;

    let config = SimConfig {
        seed: seed.map(|s| format_seed(&s)).or(scenario.seed),
        topology: kind.name().to_string(),
        pause: false,
        ..SimConfig::default()
    };
    config.validate()?;

    println!();
    match scenario.meta.name {
        Some(ref name) => println!("== {} ==", name),
        None => println!("== Scenario: {} ==", path.display()),
    }
    if let Some(ref desc) = scenario.meta.description {
        println!("{}", desc);
    }
    println!("Topology: {}", kind);

    let mut simulator = ActionSimulator::new(&config)?;
    for (action, repeat) in steps {
        for _ in 0..repeat {
            let result = simulator.simulate_kind(kind, action);
            println!("  [{}] {}", action, result.message);
        }
    }

    let metrics = simulator.metrics();
    let summary = metrics.summary();
    println!();
    println!("Results:");
    if let Some(seed) = simulator.seed() {
        println!("  Seed: {}", format_seed(&seed));
    }
    println!("  Messages exchanged: {}", summary.messages_exchanged);
    println!("  Node failures: {}", summary.failure_count);
    println!(
        "  Latency: {} sample(s), avg {:.2}s",
        summary.latency_samples, summary.average_latency
    );
    println!("  Event log ({} entries):", metrics.event_log().len());
    for entry in metrics.event_log().iter() {
        println!("    {}", entry);
    }
    println!();

    Ok(())
}
