// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene state shared by the loaders and the render loop

use crate::composer::{SceneComposer, SceneGroup};
use crate::config::SceneConfig;
use crate::loader::LoadError;
use crate::types::{Category, Polygon};
use serde::Serialize;

/// Load status of one category
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Pending,
    Loaded {
        /// Solids appended, including the floor slab for walls
        solids: usize,
        skipped: usize,
    },
    Failed {
        reason: String,
    },
}

impl CategoryStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, CategoryStatus::Pending)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, CategoryStatus::Loaded { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CategoryStatus::Failed { .. })
    }
}

/// Emitted once per category when its load settles
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoadEvent {
    pub category: Category,
    pub status: CategoryStatus,
}

/// Status of all three categories
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LoadState {
    pub walls: CategoryStatus,
    pub doors: CategoryStatus,
    pub windows: CategoryStatus,
}

impl LoadState {
    pub fn get(&self, category: Category) -> &CategoryStatus {
        match category {
            Category::Wall => &self.walls,
            Category::Door => &self.doors,
            Category::Window => &self.windows,
        }
    }

    pub fn set(&mut self, category: Category, status: CategoryStatus) {
        match category {
            Category::Wall => self.walls = status,
            Category::Door => self.doors = status,
            Category::Window => self.windows = status,
        }
    }

    /// Whether every category has either loaded or failed
    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|&c| !self.get(c).is_pending())
    }
}

/// Scene group, composer and load progress for one viewer session
#[derive(Debug, Clone, Default)]
pub struct SceneContext {
    pub group: SceneGroup,
    composer: SceneComposer,
    load_state: LoadState,
}

impl SceneContext {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            group: SceneGroup::new(),
            composer: SceneComposer::new(config),
            load_state: LoadState::default(),
        }
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Compose a finished load into the group and record its outcome
    ///
    /// A failed load leaves the group untouched.
    pub fn apply_load(
        &mut self,
        category: Category,
        result: Result<Vec<Polygon>, LoadError>,
    ) -> LoadEvent {
        let status = match result {
            Ok(polygons) => {
                let report = self
                    .composer
                    .build_and_place(&mut self.group, category, &polygons);
                CategoryStatus::Loaded {
                    solids: report.placed + usize::from(report.floor_added),
                    skipped: report.skipped,
                }
            }
            Err(e) => CategoryStatus::Failed {
                reason: e.to_string(),
            },
        };

        self.load_state.set(category, status.clone());
        LoadEvent { category, status }
    }
}
