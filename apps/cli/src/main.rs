// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: Convert floor plan polygon JSON into a 3D building (OBJ output)
//!
//! Reads `walls.json`, `doors.json` and `windows.json`, extrudes every
//! polygon, adds the floor slab and writes a Y-up Wavefront OBJ with a
//! matching MTL file.
//!
//! Usage:
//!   floorplan-to-obj [--input-dir DIR] [--config FILE] [--output building.obj] [--no-mtl]

mod obj;

use anyhow::{bail, Context, Result};
use clap::Parser;
use floorplan3d_scene::{
    load_scene, AssetPaths, CategoryStatus, DirectorySource, LoadSummary, SceneContext,
    ViewerConfig,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "floorplan-to-obj")]
#[command(version, about = "Extrude floor plan polygons into a Wavefront OBJ")]
struct Cli {
    /// Directory holding walls.json, doors.json and windows.json
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Viewer configuration JSON; its asset paths are used unless --input-dir is given
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output OBJ path
    #[arg(long, short, default_value = "building.obj")]
    output: PathBuf,

    /// Skip writing the .mtl material library
    #[arg(long)]
    no_mtl: bool,

    /// Print the load summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("Cannot load config '{}'", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(dir) = &cli.input_dir {
        config.assets = AssetPaths::in_dir(&dir.to_string_lossy());
    }

    tracing::info!(
        walls = %config.assets.walls,
        doors = %config.assets.doors,
        windows = %config.assets.windows,
        "Loading floor plan"
    );

    let source = DirectorySource::new(".");
    let mut context = SceneContext::new(config.scene.clone());
    let summary = load_scene(&source, &config.assets, &mut context, |event| {
        tracing::debug!(category = event.category.as_str(), status = ?event.status, "Category settled");
    })
    .await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if summary.all_failed() {
        bail!("No floor plan documents could be loaded");
    }

    let stats = write_outputs(&cli.output, !cli.no_mtl, &context)?;
    if !cli.json {
        println!(
            "Wrote {} ({} objects, {} vertices, {} triangles, {} materials)",
            cli.output.display(),
            stats.objects,
            stats.vertices,
            stats.triangles,
            stats.materials
        );
    }

    Ok(())
}

fn print_summary(summary: &LoadSummary) {
    println!("{:<10} {:<8} {:>7} {:>8}", "category", "status", "solids", "skipped");
    for event in &summary.events {
        match &event.status {
            CategoryStatus::Loaded { solids, skipped } => println!(
                "{:<10} {:<8} {:>7} {:>8}",
                event.category.as_str(),
                "loaded",
                solids,
                skipped
            ),
            CategoryStatus::Failed { reason } => {
                println!("{:<10} {:<8} {}", event.category.as_str(), "failed", reason)
            }
            CategoryStatus::Pending => {
                println!("{:<10} {:<8}", event.category.as_str(), "pending")
            }
        }
    }
}

/// Write the OBJ and, if requested, the MTL next to it
fn write_outputs(output: &Path, with_mtl: bool, context: &SceneContext) -> Result<obj::ObjStats> {
    let mtl_path = output.with_extension("mtl");
    let mtllib = if with_mtl {
        mtl_path.file_name().map(|n| n.to_string_lossy().into_owned())
    } else {
        None
    };

    let file = File::create(output)
        .with_context(|| format!("Cannot create output file '{}'", output.display()))?;
    let mut writer = BufWriter::new(file);
    let stats = obj::write_obj(&context.group, mtllib.as_deref(), &mut writer)?;
    writer.flush()?;

    if with_mtl {
        let file = File::create(&mtl_path)
            .with_context(|| format!("Cannot create material file '{}'", mtl_path.display()))?;
        let mut writer = BufWriter::new(file);
        obj::write_mtl(&context.group, &mut writer)?;
        writer.flush()?;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan3d_scene::{Category, Polygon};

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "floorplan-to-obj",
            "--input-dir",
            "plans",
            "--output",
            "out/house.obj",
            "--no-mtl",
        ]);
        assert_eq!(cli.input_dir, Some(PathBuf::from("plans")));
        assert_eq!(cli.output, PathBuf::from("out/house.obj"));
        assert!(cli.no_mtl);
        assert!(cli.config.is_none());

        let cli = Cli::parse_from(["floorplan-to-obj"]);
        assert_eq!(cli.output, PathBuf::from("building.obj"));
        assert!(!cli.no_mtl);
    }

    #[test]
    fn test_write_outputs_with_mtl() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("house.obj");

        let mut context = SceneContext::default();
        context.apply_load(
            Category::Wall,
            Ok(vec![Polygon::from_coords(&[[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]])]),
        );

        let stats = write_outputs(&output, true, &context).unwrap();
        assert_eq!(stats.objects, 2);

        let obj_text = std::fs::read_to_string(&output).unwrap();
        assert!(obj_text.contains("mtllib house.mtl"));
        let mtl_text = std::fs::read_to_string(dir.path().join("house.mtl")).unwrap();
        assert!(mtl_text.contains("newmtl color_f08000"));
    }

    #[test]
    fn test_write_outputs_without_mtl() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("plain.obj");

        write_outputs(&output, false, &SceneContext::default()).unwrap();
        assert!(output.exists());
        assert!(!dir.path().join("plain.mtl").exists());
    }
}
