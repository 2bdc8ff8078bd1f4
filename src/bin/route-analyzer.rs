//! route-analyzer CLI - Batch analysis of one recorded route
//!
//! Usage:
//!   route-analyzer [--waypoints <csv>] [--config <yml|json>] [--output <json>] [--method <m>] [-v]
//!
//! Reads the waypoints and the analysis parameters, computes the farthest
//! point from the start, the most frequented area and the waypoints outside
//! the geofence, then writes the result as JSON and echoes it to stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use route_analyzer::{analyze, io, ClusteringMethod, Result};

#[derive(Parser)]
#[command(name = "route-analyzer")]
#[command(about = "Analyze a recorded vehicle route against a geofence", long_about = None)]
struct Cli {
    /// Waypoint file (`;`-delimited CSV: timestamp;latitude;longitude)
    #[arg(short, long, default_value = "waypoints.csv")]
    waypoints: PathBuf,

    /// Analysis parameters (YAML for `.yml`/`.yaml`, JSON otherwise)
    #[arg(short, long, default_value = "custom-parameters.yml")]
    config: PathBuf,

    /// Where to write the result (JSON)
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Override the clustering method from the configuration
    #[arg(short, long, value_enum)]
    method: Option<ClusteringMethod>,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    match run(&cli.waypoints, &cli.config, &cli.output, cli.method) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    waypoints: &Path,
    config: &Path,
    output: &Path,
    method: Option<ClusteringMethod>,
) -> Result<String> {
    let route = io::load_route_csv(waypoints)?;
    let mut config = io::load_config(config)?;
    if let Some(method) = method {
        config.clustering_method = method;
    }

    let result = analyze(&route, &config)?;
    io::write_result(output, &result)?;
    io::result_to_json(&result)
}
