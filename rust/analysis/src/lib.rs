// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raster floor plan analysis
//!
//! Reads a scanned or rendered floor plan and produces the polygon documents
//! the scene loader consumes:
//! 1. Binarize with Otsu's threshold
//! 2. Separate thick outer walls from inner walls with morphological opening
//! 3. Split each wall mask into axis-aligned pieces
//! 4. Read gaps between aligned pieces as windows (outer) and doors (inner)
//! 5. Close the gaps and label the enclosed free space as rooms
//!
//! # Usage
//!
//! ```rust,no_run
//! use floorplan3d_analysis::{analyze_file, AnalysisConfig};
//!
//! let plan = analyze_file("plan.png", &AnalysisConfig::default())?;
//! plan.write_json("input")?;
//! # Ok::<(), floorplan3d_analysis::AnalysisError>(())
//! ```

pub mod closures;
pub mod config;
pub mod error;
pub mod image_ops;
pub mod rooms;
pub mod segments;

pub use closures::{find_closure_areas, GapLimits};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use image_ops::rgba_to_grayscale;
pub use rooms::detect_rooms;
pub use segments::{extract_wall_rects, PixelRect};

use floorplan3d_scene::{Category, Polygon};
use image::GrayImage;
use serde::Serialize;
use std::path::Path;

/// Every element found on one floor plan, in output units
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FloorPlanAnalysis {
    /// Outer wall pieces followed by inner wall pieces
    pub walls: Vec<Polygon>,
    pub doors: Vec<Polygon>,
    pub windows: Vec<Polygon>,
    pub rooms: Vec<Polygon>,
}

impl FloorPlanAnalysis {
    /// Polygons of one loader category
    pub fn polygons(&self, category: Category) -> &[Polygon] {
        match category {
            Category::Wall => &self.walls,
            Category::Door => &self.doors,
            Category::Window => &self.windows,
        }
    }

    /// Write `walls.json`, `doors.json`, `windows.json` and `rooms.json` into `dir`
    pub fn write_json(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        for (name, polygons) in [
            ("walls", &self.walls),
            ("doors", &self.doors),
            ("windows", &self.windows),
            ("rooms", &self.rooms),
        ] {
            let path = dir.join(format!("{}.json", name));
            std::fs::write(&path, serde_json::to_string(polygons)?)?;
            tracing::debug!(path = %path.display(), count = polygons.len(), "Wrote polygons");
        }
        Ok(())
    }
}

/// Run the full analysis on a grayscale floor plan
pub fn analyze(grayscale: &GrayImage, config: &AnalysisConfig) -> Result<FloorPlanAnalysis> {
    config.validate()?;

    // Step 1: walls as white on black
    let walls = image_ops::wall_mask(grayscale);

    // Step 2: thin strokes (text, window glazing) vanish at the inner radius,
    // inner walls vanish at the outer radius
    let all_walls = image_ops::open_walls(&walls, config.inner_radius());
    let outer = image_ops::open_walls(&walls, config.outer_radius());
    let inner = image_ops::subtract(&all_walls, &outer);

    // Step 3: pieces
    let outer_rects = extract_wall_rects(&outer, config.run_tolerance, config.min_wall_area);
    let inner_rects = extract_wall_rects(&inner, config.run_tolerance, config.min_wall_area);

    // Step 4: openings
    let limits = GapLimits {
        tolerance: config.pixel_tolerance,
        min_gap: config.min_gap,
        max_gap: config.max_gap,
    };
    let windows = find_closure_areas(&outer_rects, &all_walls, &limits);
    let doors = find_closure_areas(&inner_rects, &all_walls, &limits);

    // Step 5: rooms inside the closed walls
    let mut closed = all_walls;
    for rect in windows.iter().chain(&doors) {
        image_ops::fill_rect(&mut closed, rect);
    }
    let rooms = detect_rooms(&closed, config.min_room_area, config.room_epsilon, config.scale);

    tracing::info!(
        width = grayscale.width(),
        height = grayscale.height(),
        outer_walls = outer_rects.len(),
        inner_walls = inner_rects.len(),
        windows = windows.len(),
        doors = doors.len(),
        rooms = rooms.len(),
        "Analyzed floor plan"
    );

    let to_polygons = |rects: &[PixelRect]| -> Vec<Polygon> {
        rects.iter().map(|r| r.to_polygon(config.scale)).collect()
    };
    Ok(FloorPlanAnalysis {
        walls: outer_rects.iter().chain(&inner_rects).map(|r| r.to_polygon(config.scale)).collect(),
        doors: to_polygons(&doors),
        windows: to_polygons(&windows),
        rooms,
    })
}

/// Decode an image file (PNG or JPEG) and analyze it
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<FloorPlanAnalysis> {
    let path = path.as_ref();
    let grayscale = image::open(path)?.to_luma8();
    tracing::debug!(path = %path.display(), "Decoded floor plan image");
    analyze(&grayscale, config)
}

/// Analyze RGBA pixels, e.g. from a browser canvas
pub fn analyze_rgba(rgba: &[u8], width: u32, height: u32, config: &AnalysisConfig) -> Result<FloorPlanAnalysis> {
    let grayscale = rgba_to_grayscale(rgba, width, height)?;
    analyze(&grayscale, config)
}
