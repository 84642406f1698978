// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene composition - placing built solids into the shared group
//!
//! All three categories run through [`SceneComposer::build_and_place`]; the
//! per-category differences live in [`SceneConfig`]. Walls additionally
//! produce a floor slab spanning their bounds.

use crate::bounds::BoundingRectangle;
use crate::builder::{build_solid, Solid};
use crate::config::SceneConfig;
use crate::types::{Category, Polygon, SolidKind};
use floorplan3d_geometry::{Mesh, Placement, Point3};
use serde::Serialize;

/// Append-only container of every solid in the scene
#[derive(Debug, Clone, Default)]
pub struct SceneGroup {
    solids: Vec<Solid>,
}

impl SceneGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a solid, returning its index
    pub fn push(&mut self, solid: Solid) -> usize {
        self.solids.push(solid);
        self.solids.len() - 1
    }

    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    pub fn len(&self) -> usize {
        self.solids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    pub fn iter_kind(&self, kind: SolidKind) -> impl Iterator<Item = &Solid> + '_ {
        self.solids.iter().filter(move |s| s.kind == kind)
    }

    pub fn count_kind(&self, kind: SolidKind) -> usize {
        self.iter_kind(kind).count()
    }

    /// All solids merged into one mesh in group coordinates
    pub fn combined_mesh(&self) -> Mesh {
        let mut mesh = Mesh::new();
        for solid in &self.solids {
            mesh.merge(&solid.world_mesh());
        }
        mesh
    }

    /// Group-space bounds, `None` while empty
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut solids = self.solids.iter();
        let (mut min, mut max) = solids.next()?.world_bounds();
        for solid in solids {
            let (lo, hi) = solid.world_bounds();
            min = min.inf(&lo);
            max = max.sup(&hi);
        }
        Some((min, max))
    }
}

/// Outcome of composing one category
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ComposeReport {
    pub category: Category,
    /// Solids appended, counting every layer
    pub placed: usize,
    /// Polygons that could not be extruded
    pub skipped: usize,
    pub floor_added: bool,
}

/// Builds solids for a category and places them in a [`SceneGroup`]
#[derive(Debug, Clone, Default)]
pub struct SceneComposer {
    config: SceneConfig,
}

impl SceneComposer {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Set a solid's placement and append it
    pub fn place_solid(&self, group: &mut SceneGroup, mut solid: Solid, placement: Placement) -> usize {
        solid.placement = placement;
        group.push(solid)
    }

    /// Placement of a solid at height `z` relative to the scene origin
    fn placement_at(&self, z: f64) -> Placement {
        let [x, y] = self.config.origin;
        Placement::at(x, y, z)
    }

    /// Extrude every polygon of a category and place it once per layer
    ///
    /// Empty polygons are skipped with a warning; the rest of the category is
    /// still placed. Outlines without area become uncapped slivers. For walls the floor slab is rebuilt
    /// from the bounds of this batch.
    pub fn build_and_place(
        &self,
        group: &mut SceneGroup,
        category: Category,
        polygons: &[Polygon],
    ) -> ComposeReport {
        let style = self.config.style(category);
        let settings = self.config.bevel.settings(style.depth);
        let mut report = ComposeReport {
            category,
            placed: 0,
            skipped: 0,
            floor_added: false,
        };

        for (index, polygon) in polygons.iter().enumerate() {
            let mut solid = match build_solid(category.into(), polygon, &settings, style.color) {
                Ok(solid) => solid,
                Err(e) => {
                    tracing::warn!(
                        category = category.as_str(),
                        index,
                        points = polygon.len(),
                        error = %e,
                        "Skipping polygon"
                    );
                    report.skipped += 1;
                    continue;
                }
            };
            solid.source_index = Some(index);

            for &z in &style.layers {
                self.place_solid(group, solid.clone(), self.placement_at(z));
                report.placed += 1;
            }
        }

        if category == Category::Wall {
            report.floor_added = self.add_floor(group, polygons);
        }

        tracing::info!(
            category = category.as_str(),
            polygons = polygons.len(),
            placed = report.placed,
            skipped = report.skipped,
            floor = report.floor_added,
            "Composed category"
        );

        report
    }

    /// Add the floor slab under the wall outlines; `false` if none was added
    pub fn add_floor(&self, group: &mut SceneGroup, walls: &[Polygon]) -> bool {
        let floor = &self.config.floor;
        if !floor.enabled {
            return false;
        }

        let Some(bounds) = BoundingRectangle::from_polygons(walls) else {
            tracing::debug!("No wall points, floor omitted");
            return false;
        };

        let settings = self.config.bevel.settings(floor.depth);
        match build_solid(SolidKind::Floor, &bounds.floor_polygon(), &settings, floor.color) {
            Ok(solid) => {
                tracing::debug!(
                    width = bounds.width(),
                    height = bounds.height(),
                    "Added floor slab"
                );
                self.place_solid(group, solid, self.placement_at(floor.elevation));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, ?bounds, "Floor slab not added");
                false
            }
        }
    }
}
