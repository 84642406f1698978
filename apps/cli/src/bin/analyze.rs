// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Analyze a floor plan image into polygon JSON
//!
//! Writes `walls.json`, `doors.json`, `windows.json` and `rooms.json`, ready
//! for `floorplan-to-obj` or the browser viewer.
//!
//! Usage:
//!   floorplan-analyze <IMAGE> [--output-dir DIR] [--config FILE] [--scale S]

use anyhow::{Context, Result};
use clap::Parser;
use floorplan3d_analysis::{analyze_file, AnalysisConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "floorplan-analyze")]
#[command(version, about = "Extract walls, doors, windows and rooms from a floor plan image")]
struct Cli {
    /// PNG or JPEG floor plan, dark walls on a light background
    image: PathBuf,

    /// Directory for the JSON documents
    #[arg(long, short, value_name = "DIR", default_value = "input")]
    output_dir: PathBuf,

    /// Analysis parameters as JSON; missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output units per pixel, overrides the config
    #[arg(long)]
    scale: Option<f64>,
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read config '{}'", path.display()))?;
            AnalysisConfig::from_json_str(&text)
                .with_context(|| format!("Invalid config '{}'", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(scale) = cli.scale {
        config.scale = scale;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let plan = analyze_file(&cli.image, &config)
        .with_context(|| format!("Cannot analyze '{}'", cli.image.display()))?;
    plan.write_json(&cli.output_dir)
        .with_context(|| format!("Cannot write to '{}'", cli.output_dir.display()))?;

    println!(
        "Wrote {} walls, {} doors, {} windows, {} rooms to {}",
        plan.walls.len(),
        plan.doors.len(),
        plan.windows.len(),
        plan.rooms.len(),
        cli.output_dir.display()
    );
    Ok(())
}
