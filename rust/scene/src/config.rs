// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration
//!
//! Every section has a `Default` matching the stock floor plan viewer, so a
//! JSON document only needs to name the values it overrides.

use crate::types::{Category, Color};
use floorplan3d_geometry::ExtrudeSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Top-level viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub assets: AssetPaths,
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub background: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            scene: SceneConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            background: Color::from_hex(0xf0f0f0),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scene.validate()?;
        self.camera.validate()?;
        if self.light.intensity < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "light intensity must not be negative, got {}",
                self.light.intensity
            )));
        }
        Ok(())
    }
}

/// Locations of the three input documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetPaths {
    pub walls: String,
    pub doors: String,
    pub windows: String,
}

impl AssetPaths {
    /// Standard file names under `dir`
    pub fn in_dir(dir: &str) -> Self {
        let dir = dir.trim_end_matches('/');
        let join = |category: Category| {
            if dir.is_empty() {
                category.asset_file_name().to_string()
            } else {
                format!("{}/{}", dir, category.asset_file_name())
            }
        };
        Self {
            walls: join(Category::Wall),
            doors: join(Category::Door),
            windows: join(Category::Window),
        }
    }

    pub fn path(&self, category: Category) -> &str {
        match category {
            Category::Wall => &self.walls,
            Category::Door => &self.doors,
            Category::Window => &self.windows,
        }
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::in_dir("input")
    }
}

/// Bevel parameters shared by every extruded solid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BevelConfig {
    pub enabled: bool,
    pub segments: u32,
    pub size: f64,
    pub thickness: f64,
    pub steps: u32,
}

impl Default for BevelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            segments: 2,
            size: 1.0,
            thickness: 1.0,
            steps: 2,
        }
    }
}

impl BevelConfig {
    /// Extrusion settings for a given depth
    pub fn settings(&self, depth: f64) -> ExtrudeSettings {
        ExtrudeSettings {
            depth,
            bevel_enabled: self.enabled,
            bevel_segments: self.segments,
            bevel_size: self.size,
            bevel_thickness: self.thickness,
            steps: self.steps,
        }
    }
}

/// Depth, color and stacking of one input category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryStyle {
    /// Extrusion depth
    pub depth: f64,
    pub color: Color,
    /// Z offsets; each polygon is placed once per layer
    pub layers: Vec<f64>,
}

impl CategoryStyle {
    pub fn new(depth: f64, color: Color, layers: Vec<f64>) -> Self {
        Self {
            depth,
            color,
            layers,
        }
    }
}

/// Floor slab synthesized under the walls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FloorStyle {
    pub enabled: bool,
    pub depth: f64,
    /// Z offset of the slab
    pub elevation: f64,
    pub color: Color,
}

impl Default for FloorStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: 10.0,
            elevation: -10.0,
            color: Color::from_hex(0x6e2c00),
        }
    }
}

/// Scene composition parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// X/Y offset applied to every solid
    pub origin: [f64; 2],
    pub bevel: BevelConfig,
    pub walls: CategoryStyle,
    pub doors: CategoryStyle,
    pub windows: CategoryStyle,
    pub floor: FloorStyle,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            origin: [-750.0, -750.0],
            bevel: BevelConfig::default(),
            walls: CategoryStyle::new(200.0, Color::from_hex(0xf08000), vec![0.0]),
            doors: CategoryStyle::new(200.0, Color::from_hex(0xf302013), vec![0.0]),
            // Sill and head bands of the opening
            windows: CategoryStyle::new(40.0, Color::from_hex(0xf08000), vec![0.0, 160.0]),
            floor: FloorStyle::default(),
        }
    }
}

impl SceneConfig {
    pub fn style(&self, category: Category) -> &CategoryStyle {
        match category {
            Category::Wall => &self.walls,
            Category::Door => &self.doors,
            Category::Window => &self.windows,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let style = self.style(category);
            if !(style.depth > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{} depth must be positive, got {}",
                    category, style.depth
                )));
            }
            if style.layers.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{} needs at least one layer",
                    category
                )));
            }
        }
        if self.floor.enabled && !(self.floor.depth > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "floor depth must be positive, got {}",
                self.floor.depth
            )));
        }
        if self.bevel.steps == 0 || (self.bevel.enabled && self.bevel.segments == 0) {
            return Err(ConfigError::Invalid(
                "bevel steps and segments must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Perspective camera and orbit parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: [f64; 3],
    pub target: [f64; 3],
    /// Orbit sensitivity; 1.0 turns a full circle per element height dragged
    pub rotate_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 65.0,
            near: 1.0,
            far: 3000.0,
            position: [0.0, 100.0, 1500.0],
            target: [0.0, 0.0, 0.0],
            rotate_speed: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "field of view must be within (0, 180), got {}",
                self.fov_deg
            )));
        }
        if !(self.near > 0.0 && self.near < self.far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got {} and {}",
                self.near, self.far
            )));
        }
        if self.position == self.target {
            return Err(ConfigError::Invalid(
                "camera position must differ from its target".to_string(),
            ));
        }
        Ok(())
    }
}

/// Point light carried by the camera
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub color: Color,
    pub intensity: f64,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 0.8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_viewer() {
        let config = ViewerConfig::default();
        assert_eq!(config.assets.walls, "input/walls.json");
        assert_eq!(config.assets.windows, "input/windows.json");
        assert_eq!(config.scene.origin, [-750.0, -750.0]);
        assert_eq!(config.scene.walls.depth, 200.0);
        assert_eq!(config.scene.doors.color.hex(), 0x302013);
        assert_eq!(config.scene.windows.layers, vec![0.0, 160.0]);
        assert_eq!(config.scene.floor.elevation, -10.0);
        assert_eq!(config.background.hex(), 0xf0f0f0);
        assert_eq!(config.camera.position, [0.0, 100.0, 1500.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let config = ViewerConfig::from_json_str(
            r##"{
                "assets": { "walls": "plans/w.json" },
                "scene": { "windows": { "depth": 30, "color": "#00ff00", "layers": [10] } },
                "background": "#000000"
            }"##,
        )
        .unwrap();
        assert_eq!(config.assets.walls, "plans/w.json");
        assert_eq!(config.assets.doors, "input/doors.json");
        assert_eq!(config.scene.windows.depth, 30.0);
        assert_eq!(config.scene.windows.layers, vec![10.0]);
        assert_eq!(config.scene.walls.depth, 200.0);
        assert_eq!(config.background.hex(), 0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ViewerConfig::from_json_str(
            r#"{ "scene": { "doors": { "depth": 0, "color": 0, "layers": [0] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ViewerConfig::from_json_str(r#"{ "camera": { "near": 10, "far": 5 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ViewerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_asset_paths_in_dir() {
        let paths = AssetPaths::in_dir("data/");
        assert_eq!(paths.path(Category::Door), "data/doors.json");
        assert_eq!(AssetPaths::in_dir("").walls, "walls.json");
    }

    #[test]
    fn test_bevel_settings() {
        let settings = BevelConfig::default().settings(40.0);
        assert_eq!(settings, ExtrudeSettings::new(40.0));
    }
}
