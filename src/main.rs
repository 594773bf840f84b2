//! Career Metro CLI
//!
//! Usage:
//!   career-metro [OPTIONS] [INPUT]
//!
//! Options:
//!   -c, --config <FILE>    Layout configuration file (TOML format)
//!   -s, --strategy <NAME>  Layout strategy: metro (default) or grid
//!   --trace                Attach a stage trace to the output
//!   --routes               Attach routed line waypoints to the output
//!   --lint                 Attach lint warnings to the output
//!   --compact              Emit single-line JSON
//!   -v, --verbose          Log pipeline stages to stderr
//!   -h, --help             Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use career_metro::layout::STRATEGY_NAMES;
use career_metro::{layout_json_with_config, RoutingMode, RunConfig};

#[derive(Parser)]
#[command(name = "career-metro")]
#[command(about = "Metro-map layouts for career progression data")]
struct Cli {
    /// Input JSON file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Layout strategy
    #[arg(short, long, default_value = "metro")]
    strategy: String,

    /// Attach a stage trace to the output
    #[arg(long)]
    trace: bool,

    /// Attach routed line waypoints to the output
    #[arg(long)]
    routes: bool,

    /// Attach lint warnings to the output
    #[arg(long)]
    lint: bool,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Log pipeline stages to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load layout config
    let config = RunConfig::new();
    let config = match &cli.config {
        Some(path) => match config.with_layout_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => config,
    };

    // Read input
    let source = match &cli.input {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut config = config
        .with_strategy(cli.strategy)
        .with_trace(cli.trace)
        .with_lint(cli.lint)
        .with_pretty(!cli.compact);
    if cli.routes {
        config = config.with_routes(RoutingMode::Metro);
    }

    match layout_json_with_config(&source, &config) {
        Ok(json) => {
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "career_metro=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_intro() {
    println!(
        r#"Career Metro - metro-map layouts for career progression data

USAGE:
    career-metro [OPTIONS] [INPUT]
    cat career.json | career-metro

OPTIONS:
    -c, --config     Layout configuration (TOML file)
    -s, --strategy   Layout strategy: {}
    --trace          Attach a stage trace
    --routes         Attach routed line waypoints
    --lint           Attach lint warnings
    --compact        Single-line JSON
    -v, --verbose    Log pipeline stages to stderr
    -h, --help       Print help

INPUT:
    {{"career_paths": [...], "positions": [...], "position_details": [...]}}

The layout is written to stdout as JSON."#,
        STRATEGY_NAMES.join(", ")
    );
}
