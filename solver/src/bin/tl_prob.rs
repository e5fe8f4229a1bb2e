//! tl-prob: evaluate a scenario file from the command line.
//!
//! The file holds either input shape accepted by the server (a flat
//! single-stage object or `{"stages": [...]}`). `--duration` / `--tickets`
//! override the file's threshold.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tl_prob::engine::{evaluate_with, EngineConfig};
use tl_prob::env_config;
use tl_prob::frames::frames_to_seconds;
use tl_prob::sweep::{probability_curve, ticket_table};
use tl_prob::threshold::parse_duration;
use tl_prob::types::{Scenario, ScenarioRequest, Threshold};

#[derive(Parser)]
#[command(name = "tl-prob")]
#[command(about = "Probability that a retryable multi-stage run finishes inside a time budget")]
#[command(version)]
struct Cli {
    /// Evaluate one window of this length (hh:mm:ss, mm:ss or ss)
    #[arg(long, global = true, conflicts_with = "tickets")]
    duration: Option<String>,

    /// Evaluate this many independent one-hour tickets
    #[arg(long, global = true)]
    tickets: Option<f64>,

    /// Reject DP tables above this many cells (default: TL_PROB_MAX_TABLE_CELLS)
    #[arg(long, global = true)]
    max_table_cells: Option<usize>,

    /// Reject curves and ticket tables above this many points (default: TL_PROB_MAX_POINTS)
    #[arg(long, global = true)]
    max_points: Option<usize>,

    /// Print JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probability for the scenario's threshold
    Eval {
        /// Scenario JSON file
        file: PathBuf,
    },
    /// Probability at every step up to the window length
    Curve {
        file: PathBuf,
        /// Step between points, in seconds
        #[arg(long, default_value_t = 60.0)]
        step: f64,
    },
    /// Probability for 0..=max one-hour tickets
    Tickets {
        file: PathBuf,
        #[arg(long, default_value_t = 10)]
        max: u32,
    },
}

fn load_scenario(path: &Path, cli: &Cli) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let req: ScenarioRequest = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid scenario", path.display()))?;
    let mut scenario: Scenario = req.into();

    if let Some(d) = &cli.duration {
        scenario.threshold = Threshold::Duration {
            seconds: parse_duration(d)?,
        };
    } else if let Some(count) = cli.tickets {
        scenario.threshold = Threshold::Tickets { count };
    }
    Ok(scenario)
}

fn main() -> Result<()> {
    env_config::init_tracing("warn");
    let cli = Cli::parse();
    let config = EngineConfig {
        max_table_cells: cli.max_table_cells.unwrap_or_else(env_config::max_table_cells),
        max_points: cli.max_points.unwrap_or_else(env_config::max_points),
    };

    match &cli.command {
        Commands::Eval { file } => {
            let scenario = load_scenario(file, &cli)?;
            let report = evaluate_with(&scenario, &config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            println!("Success probability = {:.5} %", report.probability * 100.0);
            if let Threshold::Tickets { count } = scenario.threshold {
                println!(
                    "  Per ticket: {:.5} % ({} tickets)",
                    report.window_probability * 100.0,
                    count
                );
            }
            println!(
                "  Window: {} frames ({:.3}s), minimum completion {} frames ({:.3}s)",
                report.threshold_frames,
                frames_to_seconds(report.threshold_frames, scenario.fps),
                report.min_frames,
                frames_to_seconds(report.min_frames, scenario.fps),
            );
            match report.expected_seconds {
                Some(e) => println!("  Expected completion: {:.3}s", e),
                None => println!("  Expected completion: never (a stage cannot succeed)"),
            }
        }
        Commands::Curve { file, step } => {
            let scenario = load_scenario(file, &cli)?;
            let curve = probability_curve(&scenario, *step, &config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&curve)?);
                return Ok(());
            }
            println!("{:>12}  {:>12}", "seconds", "probability");
            for pt in curve {
                println!("{:>12.3}  {:>11.5}%", pt.seconds, pt.probability * 100.0);
            }
        }
        Commands::Tickets { file, max } => {
            let scenario = load_scenario(file, &cli)?;
            let table = ticket_table(&scenario, *max, &config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&table)?);
                return Ok(());
            }
            println!("{:>8}  {:>12}", "tickets", "probability");
            for pt in table {
                println!("{:>8}  {:>11.5}%", pt.tickets, pt.probability * 100.0);
            }
        }
    }
    Ok(())
}
