// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Asset loading
//!
//! Each category is fetched independently through an [`AssetSource`]. Loads
//! complete in whatever order the source delivers them and each one is
//! composed as soon as it arrives; a failed load only affects its own
//! category.

use crate::config::AssetPaths;
use crate::context::{CategoryStatus, LoadEvent, SceneContext};
use crate::types::{Category, Polygon};
use futures_util::stream::{FuturesUnordered, StreamExt};
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while loading one asset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Unexpected response status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid polygon JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Somewhere the three plan documents can be read from
///
/// Futures are driven on a single task, so implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError>;
}

/// In-memory documents keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: FxHashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, body: impl Into<String>) {
        self.documents.insert(path.into(), body.into());
    }
}

impl AssetSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use directory::DirectorySource;

#[cfg(not(target_arch = "wasm32"))]
mod directory {
    use super::{AssetSource, LoadError};
    use std::io::ErrorKind;
    use std::path::PathBuf;

    /// Files under a root directory, read with `tokio::fs`
    #[derive(Debug, Clone)]
    pub struct DirectorySource {
        root: PathBuf,
    }

    impl DirectorySource {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &std::path::Path {
            &self.root
        }
    }

    impl AssetSource for DirectorySource {
        async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
            let full = self.root.join(path);
            match tokio::fs::read_to_string(&full).await {
                Ok(text) => Ok(text),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(LoadError::NotFound(full.display().to_string()))
                }
                Err(e) => Err(LoadError::Io(e)),
            }
        }
    }
}

/// Parse a document holding a JSON array of polygons
pub fn parse_polygons(json: &str) -> Result<Vec<Polygon>, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Fetch and parse the polygons at `path`
pub async fn load_polygons<S: AssetSource + ?Sized>(
    source: &S,
    path: &str,
) -> Result<Vec<Polygon>, LoadError> {
    let text = source.fetch_text(path).await?;
    parse_polygons(&text)
}

/// Per-category outcome of [`load_scene`], in completion order
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LoadSummary {
    pub events: Vec<LoadEvent>,
}

impl LoadSummary {
    pub fn status(&self, category: Category) -> Option<&CategoryStatus> {
        self.events
            .iter()
            .find(|e| e.category == category)
            .map(|e| &e.status)
    }

    /// Categories in the order their loads completed
    pub fn completion_order(&self) -> Vec<Category> {
        self.events.iter().map(|e| e.category).collect()
    }

    pub fn loaded_count(&self) -> usize {
        self.events.iter().filter(|e| e.status.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.events.iter().filter(|e| e.status.is_failed()).count()
    }

    pub fn all_failed(&self) -> bool {
        !self.events.is_empty() && self.loaded_count() == 0
    }

    pub fn total_solids(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e.status {
                CategoryStatus::Loaded { solids, .. } => solids,
                _ => 0,
            })
            .sum()
    }
}

/// Load all three categories concurrently and compose each on arrival
///
/// `on_event` is called once per category as soon as it has been composed
/// (or has failed). The returned summary is the join of all three loads.
pub async fn load_scene<S, F>(
    source: &S,
    paths: &AssetPaths,
    context: &mut SceneContext,
    mut on_event: F,
) -> LoadSummary
where
    S: AssetSource + ?Sized,
    F: FnMut(&LoadEvent),
{
    let mut pending: FuturesUnordered<_> = Category::ALL
        .into_iter()
        .map(move |category| {
            let path = paths.path(category);
            async move { (category, path, load_polygons(source, path).await) }
        })
        .collect();

    let mut summary = LoadSummary::default();
    while let Some((category, path, result)) = pending.next().await {
        if let Err(e) = &result {
            tracing::warn!(category = category.as_str(), path, error = %e, "Asset load failed");
        }
        let event = context.apply_load(category, result);
        on_event(&event);
        summary.events.push(event);
    }

    tracing::info!(
        loaded = summary.loaded_count(),
        failed = summary.failed_count(),
        solids = context.group.len(),
        "Scene load finished"
    );

    summary
}
