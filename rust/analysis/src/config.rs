// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analysis parameters
//!
//! All distances are in pixels of the input image except `scale`, which maps
//! pixels to the units of the emitted polygons.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Radius of one morphology pass (2 is a 5x5 square)
    pub kernel_radius: u8,
    /// Passes used to keep only the thick outer walls
    pub outer_iterations: u8,
    /// Passes used to keep every wall but drop thin strokes
    pub inner_iterations: u8,
    /// Slack when comparing edges of two wall pieces
    pub pixel_tolerance: u32,
    /// Slack when a pixel row continues a wall piece from the row above
    pub run_tolerance: u32,
    /// Smallest wall piece kept, in square pixels
    pub min_wall_area: u32,
    /// Shortest gap between two wall pieces read as an opening
    pub min_gap: u32,
    /// Longest gap between two wall pieces read as an opening
    pub max_gap: u32,
    /// Smallest room kept, in square pixels
    pub min_room_area: f64,
    /// Douglas-Peucker tolerance for room outlines
    pub room_epsilon: f64,
    /// Output units per pixel
    pub scale: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            kernel_radius: 2,
            outer_iterations: 8,
            inner_iterations: 3,
            pixel_tolerance: 5,
            run_tolerance: 2,
            min_wall_area: 50,
            min_gap: 8,
            max_gap: 100,
            min_room_area: 400.0,
            room_epsilon: 2.0,
            scale: 1.0,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Morphology radius that removes everything but the outer walls
    pub fn outer_radius(&self) -> u8 {
        self.kernel_radius.saturating_mul(self.outer_iterations)
    }

    /// Morphology radius that keeps inner walls
    pub fn inner_radius(&self) -> u8 {
        self.kernel_radius.saturating_mul(self.inner_iterations)
    }

    pub fn validate(&self) -> Result<()> {
        let outer = self.kernel_radius as u32 * self.outer_iterations as u32;
        let inner = self.kernel_radius as u32 * self.inner_iterations as u32;
        if outer > u8::MAX as u32 {
            return Err(AnalysisError::InvalidConfig(format!(
                "Outer radius {} exceeds {}",
                outer,
                u8::MAX
            )));
        }
        if inner >= outer {
            return Err(AnalysisError::InvalidConfig(format!(
                "Inner radius {} must be smaller than outer radius {}",
                inner, outer
            )));
        }
        if self.min_gap > self.max_gap {
            return Err(AnalysisError::InvalidConfig(format!(
                "min_gap {} exceeds max_gap {}",
                self.min_gap, self.max_gap
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "Scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.room_epsilon.is_finite() && self.room_epsilon > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "room_epsilon must be positive, got {}",
                self.room_epsilon
            )));
        }
        Ok(())
    }
}
