// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end load and compose tests over in-memory, delayed and on-disk sources.

use floorplan3d_scene::{
    load_scene, AssetPaths, AssetSource, Category, CategoryStatus, DirectorySource, LoadError,
    MemorySource, SceneContext, SolidKind, ViewerConfig,
};
use std::time::Duration;

const SQUARE_WALLS: &str = "[[[0,0],[100,0],[100,100],[0,100]]]";
const DOORS: &str = "[[[40,0],[60,0],[60,10],[40,10]]]";
const WINDOWS: &str = "[[[0,40],[10,40],[10,60],[0,60]], [[90,40],[100,40],[100,60],[90,60]]]";

fn context() -> (ViewerConfig, SceneContext) {
    let config = ViewerConfig::default();
    let context = SceneContext::new(config.scene.clone());
    (config, context)
}

#[tokio::test]
async fn test_square_wall_gives_wall_and_floor() {
    let (config, mut context) = context();
    let source = MemorySource::new().with("input/walls.json", SQUARE_WALLS);

    load_scene(&source, &config.assets, &mut context, |_| {}).await;

    let group = &context.group;
    assert_eq!(group.count_kind(SolidKind::Wall), 1);
    assert_eq!(group.count_kind(SolidKind::Floor), 1);
    assert_eq!(group.len(), 2);

    let wall = group.iter_kind(SolidKind::Wall).next().unwrap();
    let footprint = wall.footprint_bounds().unwrap();
    assert_eq!(
        (footprint.min_x, footprint.min_y, footprint.max_x, footprint.max_y),
        (0.0, 0.0, 100.0, 100.0)
    );
    assert_eq!(wall.placement.position.z, 0.0);
    assert_eq!(wall.color.hex(), 0xf08000);

    let floor = group.iter_kind(SolidKind::Floor).next().unwrap();
    assert_eq!(floor.placement.position.z, -10.0);
    assert_eq!(floor.placement.position.x, -750.0);
    assert_eq!(floor.footprint_bounds(), wall.footprint_bounds());
}

#[tokio::test]
async fn test_missing_doors_do_not_block_other_categories() {
    let (config, mut context) = context();
    let source = MemorySource::new()
        .with("input/walls.json", SQUARE_WALLS)
        .with("input/windows.json", WINDOWS);

    let mut failed = Vec::new();
    let summary = load_scene(&source, &config.assets, &mut context, |event| {
        if event.status.is_failed() {
            failed.push(event.category);
        }
    })
    .await;

    assert_eq!(failed, vec![Category::Door]);
    assert_eq!(summary.loaded_count(), 2);
    assert_eq!(context.group.count_kind(SolidKind::Wall), 1);
    assert_eq!(context.group.count_kind(SolidKind::Door), 0);
    // Two windows, each at sill and head
    assert_eq!(context.group.count_kind(SolidKind::Window), 4);
    assert!(context.load_state().doors.is_failed());
    assert!(context.load_state().is_complete());
}

#[tokio::test]
async fn test_window_bands_at_zero_and_160() {
    let (config, mut context) = context();
    let source = MemorySource::new().with("input/windows.json", "[[[0,0],[10,0],[10,20],[0,20]]]");

    load_scene(&source, &config.assets, &mut context, |_| {}).await;

    let heights: Vec<f64> = context
        .group
        .iter_kind(SolidKind::Window)
        .map(|s| s.placement.position.z)
        .collect();
    assert_eq!(heights, vec![0.0, 160.0]);

    for window in context.group.iter_kind(SolidKind::Window) {
        let (min, max) = window.world_bounds();
        // Depth 40 plus one unit of bevel at each end
        assert!((max.z - min.z - 42.0).abs() < 1e-4);
    }
}

#[tokio::test]
async fn test_all_categories_failing() {
    let (config, mut context) = context();
    let summary = load_scene(&MemorySource::new(), &config.assets, &mut context, |_| {}).await;

    assert!(summary.all_failed());
    assert!(context.group.is_empty());
    assert!(matches!(
        summary.status(Category::Wall),
        Some(CategoryStatus::Failed { reason }) if reason.contains("walls.json")
    ));
}

/// Delivers each document after a per-path delay
struct DelayedSource {
    inner: MemorySource,
    delays: Vec<(&'static str, u64)>,
}

impl AssetSource for DelayedSource {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let millis = self
            .delays
            .iter()
            .find(|(p, _)| *p == path)
            .map_or(0, |(_, ms)| *ms);
        tokio::time::sleep(Duration::from_millis(millis)).await;
        self.inner.fetch_text(path).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_categories_compose_in_completion_order() {
    let (config, mut context) = context();
    let source = DelayedSource {
        inner: MemorySource::new()
            .with("input/walls.json", SQUARE_WALLS)
            .with("input/doors.json", DOORS)
            .with("input/windows.json", WINDOWS),
        delays: vec![
            ("input/walls.json", 300),
            ("input/doors.json", 100),
            ("input/windows.json", 200),
        ],
    };

    // Group size observed as each category lands
    let mut progress = Vec::new();
    let summary = load_scene(&source, &config.assets, &mut context, |event| {
        progress.push(event.category);
    })
    .await;

    assert_eq!(progress, vec![Category::Door, Category::Window, Category::Wall]);
    assert_eq!(summary.completion_order(), progress);

    // Solids are appended in arrival order
    let kinds: Vec<SolidKind> = context.group.solids().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SolidKind::Door,
            SolidKind::Window,
            SolidKind::Window,
            SolidKind::Window,
            SolidKind::Window,
            SolidKind::Wall,
            SolidKind::Floor,
        ]
    );
}

#[tokio::test]
async fn test_directory_source() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("walls.json"), SQUARE_WALLS).unwrap();
    std::fs::write(dir.path().join("doors.json"), "[[[0,0],[1,0]").unwrap();

    let (_, mut context) = context();
    let source = DirectorySource::new(dir.path());
    let summary = load_scene(&source, &AssetPaths::in_dir(""), &mut context, |_| {}).await;

    assert!(summary.status(Category::Wall).unwrap().is_loaded());
    assert!(matches!(
        summary.status(Category::Door),
        Some(CategoryStatus::Failed { reason }) if reason.starts_with("Invalid polygon JSON")
    ));
    assert!(matches!(
        summary.status(Category::Window),
        Some(CategoryStatus::Failed { reason }) if reason.starts_with("Asset not found")
    ));
    assert_eq!(context.group.len(), 2);
}
