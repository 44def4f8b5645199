//! Integration tests driving a viewer over PNG tiles on disk.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

use tileplan::coord::Coordinate;
use tileplan::pyramid::PlanDescription;
use tileplan::scheduler::PassStatus;
use tileplan::sink::{ChannelSink, SurfaceEvent};
use tileplan::source::FileSourceProvider;
use tileplan::telemetry::TelemetryKind;
use tileplan::viewer::{PlanViewer, ViewerConfig, ViewerServices};
use tileplan::zoom::ZoomDirection;

const TILE: u32 = 32;

fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(TILE, TILE, Rgba([200, 40, 40, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Writes `tiles/<level>/<x>_<y>.png` for a square level.
fn write_level(root: &Path, level: usize, tiles: i32) {
    let dir = root.join("tiles").join(level.to_string());
    fs::create_dir_all(&dir).unwrap();
    let png = png();
    for x in 0..tiles {
        for y in 0..tiles {
            fs::write(dir.join(format!("{}_{}.png", x, y)), &png).unwrap();
        }
    }
}

fn tile_path(root: &Path, level: usize, x: i32, y: i32) -> std::path::PathBuf {
    root.join("tiles").join(level.to_string()).join(format!("{}_{}.png", x, y))
}

const THREE_LEVEL_PLAN: &str = r#"
[plan]
sources = per-tile
source = tiles/{level}/{x}_{y}.png

[level.0]
dimension = 2x2
tile_size = 32x32
scale = 0.5

[level.1]
dimension = 4x4
tile_size = 32x32
scale = 1.0

[level.2]
dimension = 8x8
tile_size = 32x32
scale = 2.0

[marker.0]
kind = Audio
position = 40,40
icon_size = 8x8
"#;

struct Session {
    _dir: TempDir,
    viewer: PlanViewer,
    events: UnboundedReceiver<SurfaceEvent>,
}

fn open(
    plan: &str,
    viewport: Coordinate,
    config: ViewerConfig,
    prepare: impl FnOnce(&Path),
) -> Session {
    let dir = TempDir::new().unwrap();
    prepare(dir.path());
    let plan_path = dir.path().join("plan.ini");
    fs::write(&plan_path, plan).unwrap();

    let pyramid = PlanDescription::from_ini_file(&plan_path).unwrap().build().unwrap();
    let (sink, events) = ChannelSink::new();
    let services = ViewerServices::new(
        Handle::current(),
        Arc::new(FileSourceProvider::new()),
        Arc::new(sink),
    );
    let viewer = PlanViewer::new(pyramid, viewport, services, &config);

    Session {
        _dir: dir,
        viewer,
        events,
    }
}

/// Three-level plan with every tile on disk and a 64x64 viewport.
fn open_three_levels(config: ViewerConfig, adjust: impl FnOnce(&Path)) -> Session {
    open(THREE_LEVEL_PLAN, Coordinate::new(64, 64), config, |root| {
        for (level, tiles) in [(0, 2), (1, 4), (2, 8)] {
            write_level(root, level, tiles);
        }
        adjust(root);
    })
}

fn drain(events: &mut UnboundedReceiver<SurfaceEvent>) -> Vec<SurfaceEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_load_reload_and_zoom_from_disk() {
    let mut session = open_three_levels(ViewerConfig::default(), |root| {
        fs::remove_file(tile_path(root, 1, 2, 2)).unwrap();
    });
    let root = session._dir.path().to_path_buf();
    let viewer = &mut session.viewer;

    let report = viewer.load().into_pass().wait().await;
    assert_eq!(report.status, PassStatus::Completed);
    assert_eq!(report.submitted, 9);
    assert_eq!(report.loaded, 8);
    assert_eq!(report.failed, 1);
    assert!(!viewer.active_grid().tile(Coordinate::new(2, 2)).unwrap().is_loaded());

    // The missing tile shows up on disk; a forced pass picks it up.
    fs::write(tile_path(&root, 1, 2, 2), png()).unwrap();
    let report = viewer.reload().wait().await;
    assert_eq!(report.loaded, 1);
    assert_eq!(report.already_loaded, 8);
    assert_eq!(viewer.active_grid().loaded_count(), 9);

    let zoom = viewer.zoom(ZoomDirection::In).unwrap();
    assert_eq!((zoom.from_level, zoom.to_level), (1, 2));
    assert_eq!(zoom.position, Coordinate::new(32, 32));
    let report = zoom.pass.wait().await;
    assert_eq!(report.level, 2);
    assert_eq!(report.loaded, 9);
    assert_eq!(viewer.pyramid().grid(1).unwrap().loaded_count(), 0);
    for x in 1..=3 {
        for y in 1..=3 {
            assert!(viewer.active_grid().tile(Coordinate::new(x, y)).unwrap().is_loaded());
        }
    }

    // Marker at (40,40) scales to (80,80) and is centered on its 8x8 icon.
    let placements = viewer.marker_placements();
    assert_eq!(placements[0].top_left, Coordinate::new(76, 76));

    let events = drain(&mut session.events);
    let ready = events
        .iter()
        .filter(|e| matches!(e, SurfaceEvent::TileReady { .. }))
        .count();
    // First pass, reload (re-delivered plus new), zoom pass
    assert_eq!(ready, 8 + (8 + 1) + 9);
    assert!(events
        .iter()
        .any(|e| matches!(e, SurfaceEvent::SurfacesDiscarded { level: 1 })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zoom_out_past_smallest_level_is_rejected() {
    let mut session = open_three_levels(ViewerConfig::default(), |_| {});
    let viewer = &mut session.viewer;

    let zoom = viewer.zoom(ZoomDirection::Out).unwrap();
    assert_eq!(zoom.to_level, 0);
    zoom.pass.wait().await;

    assert!(viewer.zoom(ZoomDirection::Out).is_err());
    assert_eq!(viewer.active_level(), 0);
}

const WIDE_PLAN: &str = r#"
[plan]
sources = single
source = tile.png

[level.0]
dimension = 10x3
tile_size = 32x32
scale = 1.0
"#;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_payload_budget_evicts_far_tiles() {
    let tile_bytes = (TILE * TILE * 4) as usize;
    let config = ViewerConfig {
        eviction_threshold: 1.0,
        telemetry: TelemetryKind::Budget,
        payload_budget: 9 * tile_bytes,
        ..ViewerConfig::default()
    };
    let mut session = open(WIDE_PLAN, Coordinate::new(64, 64), config, |root| {
        fs::write(root.join("tile.png"), png()).unwrap();
    });
    let viewer = &mut session.viewer;

    let report = viewer.load().into_pass().wait().await;
    assert_eq!(report.loaded, 9);
    assert_eq!(report.evicted, 0);

    // Budget is now full; moving to the far edge must free tiles near the origin.
    let report = viewer.pan(256, 0).into_pass().wait().await;
    assert_eq!(report.status, PassStatus::Completed);
    assert!(report.evicted >= 1);

    let evicted: Vec<Coordinate> = drain(&mut session.events)
        .into_iter()
        .filter_map(|e| match e {
            SurfaceEvent::TileEvicted { level, coordinate } => {
                assert_eq!(level, 0);
                Some(coordinate)
            }
            _ => None,
        })
        .collect();
    assert_eq!(evicted.len(), report.evicted);
    for coordinate in evicted {
        assert!(coordinate.x <= 2, "evicted {} near the new view", coordinate);
        assert!(!viewer.active_grid().tile(coordinate).unwrap().is_loaded());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zoom_then_pan_under_budget_keeps_only_active_level() {
    let tile_bytes = (TILE * TILE * 4) as usize;
    let budget = 12 * tile_bytes;
    let config = ViewerConfig {
        telemetry: TelemetryKind::Budget,
        payload_budget: budget,
        ..ViewerConfig::default()
    };
    let mut session = open_three_levels(config, |_| {});
    let viewer = &mut session.viewer;

    viewer.load().into_pass().wait().await;
    let zoom = viewer.zoom(ZoomDirection::In).unwrap();
    let report = zoom.pass.wait().await;
    assert_eq!(report.loaded, 9);
    assert_eq!(report.evicted, 0);

    for (dx, dy) in [(32, 0), (0, 32)] {
        let report = viewer.pan(dx, dy).into_pass().wait().await;
        assert_eq!(report.status, PassStatus::Completed);
        assert_eq!(report.failed, 0);
        assert_eq!(viewer.pyramid().grid(1).unwrap().loaded_count(), 0);
        assert!(viewer.pyramid().resident_bytes() <= budget);
    }

    let evicted_elsewhere = drain(&mut session.events).into_iter().any(|e| {
        matches!(e, SurfaceEvent::TileEvicted { level, .. } if level != 2)
    });
    assert!(!evicted_elsewhere);
    assert_eq!(
        viewer.pyramid().resident_bytes(),
        viewer.active_grid().resident_bytes()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_superseded_pass_still_resolves() {
    let mut session = open_three_levels(ViewerConfig::default(), |_| {});
    let viewer = &mut session.viewer;

    let first = viewer.load().into_pass();
    let second = viewer.pan(64, 64).into_pass();
    assert_ne!(first.id(), second.id());

    // Whatever the first pass got through, its handle resolves.
    let first_report = first.wait().await;
    assert!(first_report.submitted <= 9);

    // Clamped to the bottom-right corner: a 2x2 block around tile (3, 3).
    let report = second.wait().await;
    assert_eq!(report.status, PassStatus::Completed);
    assert_eq!(report.submitted, 4);
    assert_eq!(report.resident(), 4);
    assert_eq!(viewer.live_tasks(), 0);
}
