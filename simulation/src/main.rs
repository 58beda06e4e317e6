//! ticknet - deterministic network fault simulation
//!
//! Runs a scenario under a seeded fault model and prints the statistics and
//! event-log fingerprint. Re-running with the printed seed reproduces the run
//! exactly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ticknet_logging::{FileConfig, LogConfig, SubscriberBuilder};

use ticknet_simulation::{NetworkConfig, NetworkEvent, PingPong, Simulation, scenarios};

#[derive(Parser)]
#[command(
    name = "ticknet",
    about = "Deterministic tick-driven network simulation with clog, drop, delay and replay faults",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Console log format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    /// Also write JSONL logs into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Three nodes on the default fault model; node 0 pings node 1
    PingPong {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Every node keeps pinging its successor
    Chaos {
        #[command(flatten)]
        run: RunArgs,

        /// Number of nodes
        #[arg(short, long, default_value = "5")]
        nodes: i16,

        /// JSON file with fault-model settings; missing fields use defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        faults: FaultArgs,
    },
}

/// Fault-model overrides, applied on top of the config file
#[derive(Args)]
struct FaultArgs {
    /// Per-path, per-tick clog probability
    #[arg(long)]
    clog: Option<f64>,

    /// Probability that a delivered message is replayed
    #[arg(long)]
    replay: Option<f64>,

    /// Probability that an eligible message is dropped
    #[arg(long)]
    drop: Option<f64>,

    /// Longest clog, in ticks
    #[arg(long)]
    max_clog_ticks: Option<u64>,

    /// Longest send delay, in ticks
    #[arg(long)]
    max_delay_ticks: Option<u64>,
}

impl FaultArgs {
    fn apply(&self, mut config: NetworkConfig) -> NetworkConfig {
        if let Some(p) = self.clog {
            config = config.with_path_clog_probability(p);
        }
        if let Some(p) = self.replay {
            config = config.with_message_replay_probability(p);
        }
        if let Some(p) = self.drop {
            config = config.with_drop_message_probability(p);
        }
        if let Some(ticks) = self.max_clog_ticks {
            config = config.with_max_clog_ticks(ticks);
        }
        if let Some(ticks) = self.max_delay_ticks {
            config = config.with_max_delay_ticks(ticks);
        }
        config
    }
}

#[derive(Args)]
struct RunArgs {
    /// Random seed (a fresh one is drawn and printed when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// Write the event log here as JSON lines
    #[arg(long)]
    events_out: Option<PathBuf>,
}

impl RunArgs {
    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = if cli.verbose {
        LogConfig::development()
    } else {
        LogConfig::default()
    };
    log_config.console.pretty = matches!(cli.log_format, LogFormat::Pretty);
    log_config.file = cli.log_dir.map(|directory| FileConfig {
        directory,
        ..Default::default()
    });
    let _guard = SubscriberBuilder::new()
        .with_config(log_config)
        .init()
        .context("failed to initialize logging")?;

    let (sim, run) = match &cli.command {
        Commands::PingPong { run } => {
            let seed = run.seed();
            println!("seed: {}", seed);
            (scenarios::ping_pong(seed, run.ticks)?, run)
        }
        Commands::Chaos {
            run,
            nodes,
            config,
            faults,
        } => {
            let config = match config {
                Some(path) => load_config(path)?,
                None => NetworkConfig::default(),
            };
            let config = faults.apply(config);
            config.validate().context("invalid fault model")?;
            let seed = run.seed();
            println!("seed: {}", seed);
            (scenarios::chaos(seed, *nodes, run.ticks, config)?, run)
        }
    };

    if let Some(path) = &run.events_out {
        write_events(path, sim.network().events())?;
        println!("events: {}", path.display());
    }
    print_summary(&sim)
}

fn load_config(path: &Path) -> anyhow::Result<NetworkConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open config {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

fn write_events(path: &Path, events: &[NetworkEvent]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writeln!(writer)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))
}

fn print_summary(sim: &Simulation<PingPong>) -> anyhow::Result<()> {
    let summary = sim.summary().context("failed to fingerprint event log")?;
    let stats = &summary.stats;

    println!("\n=== Simulation Summary ===");
    println!("ticks:             {}", summary.ticks);
    println!("nodes:             {}", summary.nodes);
    println!("messages sent:     {}", stats.messages_sent);
    println!("delivered:         {}", stats.messages_delivered);
    println!("dropped:           {}", stats.messages_dropped);
    println!("replayed:          {}", stats.messages_replayed);
    println!("paths clogged:     {}", stats.paths_clogged);
    println!("ticks blocked:     {}", stats.ticks_blocked_by_clog);
    println!("still in flight:   {}", summary.pending);
    for node in sim.nodes() {
        println!(
            "node {}: {} pings answered, {} pongs received",
            node.id(),
            node.protocol().pings_answered(),
            node.protocol().pongs_received()
        );
    }
    println!("fingerprint:       {}", summary.fingerprint);
    Ok(())
}
