// Interactive topology simulator
//
// Usage:
//   cargo run --bin topology-sim
//   cargo run --bin topology-sim -- --topology PeerToPeer --seed 0x2a --no-pause
//   cargo run --bin topology-sim -- --config session.yaml

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use log::{debug, LevelFilter};
use simple_logger::SimpleLogger;

use ds_sim::ds_config::{format_seed, parse_seed_hex};
use ds_sim::{
    all_topologies, ds_theory, topology, ActionKind, ActionResult, ActionSimulator, Outcome,
    SimConfig, TopologyKind,
};

#[derive(Parser)]
#[command(name = "topology-sim")]
#[command(about = "Explore client-server, peer-to-peer, cluster and cloud topologies")]
struct Cli {
    /// YAML session configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hex seed for reproducible sessions
    #[arg(long)]
    seed: Option<String>,

    /// Topology to start with
    #[arg(long)]
    topology: Option<String>,

    /// Report latency without sleeping through it
    #[arg(long)]
    no_pause: bool,

    /// Log every simulated action
    #[arg(short, long)]
    verbose: bool,
}

struct Session {
    simulator: ActionSimulator,
    current: TopologyKind,
    pause: bool,
    panel_entries: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    SimpleLogger::new().with_level(level).init()?;

    let mut config = match cli.config {
        Some(ref path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        parse_seed_hex(&seed)?;
        config.seed = Some(seed);
    }
    if let Some(name) = cli.topology {
        config.topology = name;
    }
    if cli.no_pause {
        config.pause = false;
    }
    config.validate()?;

    let simulator = ActionSimulator::new(&config)?;
    let mut session = Session {
        current: config.topology_kind()?,
        simulator,
        pause: config.pause,
        panel_entries: config.panel_log_entries,
    };

    println!("📡 Distributed System Simulator");
    if let Some(seed) = session.simulator.seed() {
        println!("Seed: {}", format_seed(&seed));
    }
    print_topology(session.current);
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", session.current.name());
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command.to_ascii_lowercase(),
            None => continue,
        };
        let rest = words.collect::<Vec<_>>().join(" ");

        match command.as_str() {
            "quit" | "exit" | "q" => break,
            "help" | "?" => print_help(),
            "models" => {
                for topo in all_topologies() {
                    println!("  {:<13} {}", topo.kind.name(), topo.description);
                }
            }
            "use" => match rest.parse::<TopologyKind>() {
                Ok(kind) => {
                    session.current = kind;
                    print_topology(kind);
                }
                Err(e) => println!("❗ {}", e),
            },
            "show" => print_topology(session.current),
            "metrics" | "log" => print_metrics(&session),
            "theory" => print_theory(&rest),
            "reset" => {
                session.simulator.reset();
                println!("Session reset.");
            }
            other => match other.parse::<ActionKind>() {
                Ok(action) => {
                    let result = session.simulator.simulate_kind(session.current, action);
                    render(&result, session.pause);
                }
                Err(_) => println!("Unknown command '{}'. Type 'help'.", other),
            },
        }
    }

    print_metrics(&session);
    Ok(())
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  models             list the available topologies");
    println!("  use <topology>     switch topology (e.g. 'use Peer-to-Peer')");
    println!("  show               nodes and links of the current topology");
    println!("  send               exchange a message (aliases: share, distribute, route)");
    println!("  fail               simulate a node failure");
    println!("  latency            simulate network latency");
    println!("  metrics            performance metrics and latest events");
    println!("  theory [topic]     distributed systems concepts");
    println!("  reset              clear counters and log");
    println!("  quit");
    println!();
}

fn print_topology(kind: TopologyKind) {
    let topo = topology(kind);
    println!();
    println!("{} Model", kind);
    println!("{}", topo.description);
    println!("  Nodes: {}", topo.nodes.join(", "));
    let arrow = if topo.directed { "→" } else { "—" };
    for node in topo.nodes {
        let neighbours = topo.neighbours(node);
        if !neighbours.is_empty() {
            println!("    {} {} {}", node, arrow, neighbours.join(", "));
        }
    }
    println!();
}

fn render(result: &ActionResult, pause: bool) {
    match result.outcome {
        Outcome::Delivered => println!("✅ {}", result.message),
        Outcome::NodeFailed { .. } => println!("❌ {}", result.message),
        Outcome::Delayed { delay, completion } => {
            println!("⏱ {}", result.message);
            if pause {
                debug!("sleeping {:?}", delay);
                thread::sleep(delay);
            }
            println!("✅ {}", completion);
        }
    }
}

fn print_metrics(session: &Session) {
    let metrics = session.simulator.metrics();
    let summary = metrics.summary();

    println!();
    println!("📊 Performance Metrics");
    println!("  Messages Exchanged: {}", summary.messages_exchanged);
    println!("  Node Failures:      {}", summary.failure_count);
    println!("  Avg Latency (s):    {:.2}", summary.average_latency);
    println!();
    println!("📝 Event Logs (Latest {})", session.panel_entries);
    for entry in metrics.recent_events(session.panel_entries) {
        println!("  • {}", entry);
    }
    println!();
}

fn print_theory(topic: &str) {
    if topic.is_empty() {
        println!("📘 Topics:");
        for name in ds_theory::topics() {
            println!("  {}", name);
        }
        return;
    }

    match ds_theory::lookup(topic) {
        Ok((title, body)) => {
            println!();
            println!("📘 {}", title);
            println!("{}", body);
            println!();
        }
        Err(e) => println!("❗ {}", e),
    }
}
