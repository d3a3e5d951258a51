//! layered-layout CLI entry point.
//!
//! Reads a JSON graph description, prints the layout as JSON.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use layered_layout::{CyclePolicy, LayoutConfig, LayoutRequest, Origin, layout, parse_direction};

/// Layered graph layout: JSON graph in, JSON positions out.
#[derive(Parser, Debug)]
#[command(
    name = "layered-layout",
    version = env!("LAYERED_LAYOUT_VERSION"),
    about = "Layered graph layout: JSON graph in, JSON positions out"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<String>,

    /// Override direction (LR, TB)
    #[arg(short = 'd', long = "direction")]
    direction: Option<String>,

    /// Minimum gap between neighbouring nodes in a rank
    #[arg(long = "node-sep")]
    node_separation: Option<f64>,

    /// Gap between consecutive ranks
    #[arg(long = "rank-sep")]
    rank_separation: Option<f64>,

    /// Crossing minimisation sweeps
    #[arg(long = "iterations")]
    ordering_iterations: Option<usize>,

    /// Seed for shuffling the initial traversal order
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Reverse edges to break cycles instead of failing
    #[arg(long = "break-cycles")]
    break_cycles: bool,

    /// Report node positions as top-left corners instead of centers
    #[arg(long = "top-left")]
    top_left: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Log pipeline stages to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn apply_overrides(cli: &Cli, config: &mut LayoutConfig) -> Result<(), String> {
    if let Some(dir) = cli.direction.as_deref() {
        config.direction = parse_direction(dir).map_err(|e| e.to_string())?;
    }
    if let Some(v) = cli.node_separation {
        config.node_separation = v;
    }
    if let Some(v) = cli.rank_separation {
        config.rank_separation = v;
    }
    if let Some(v) = cli.ordering_iterations {
        config.ordering_iterations = v;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.break_cycles {
        config.cycles = CyclePolicy::ReverseEdges;
    }
    if cli.top_left {
        config.origin = Origin::TopLeft;
    }
    Ok(())
}

fn run(cli: &Cli, text: &str) -> Result<String, String> {
    let request = LayoutRequest::parse(text).map_err(|e| e.to_string())?;
    let mut config = request.config;
    apply_overrides(cli, &mut config)?;
    let result = layout(&request.graph, &config).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&result).map_err(|e| e.to_string())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Read input from file or stdin
    let text = if let Some(ref path) = cli.input {
        match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: cannot read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    let rendered = match run(&cli, &text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // Write output to file or stdout
    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, rendered) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        println!("{}", rendered);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}
