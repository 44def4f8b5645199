//! View command - a headless viewing session.
//!
//! Loads a plan, runs the initial load pass and then applies each action in
//! order, waiting for every pass and printing its report. Tiles are decoded
//! for real; nothing is drawn.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tileplan::coord::Coordinate;
use tileplan::scheduler::{LoadPass, ScheduleOutcome};
use tileplan::sink::TileSink;
use tileplan::tile::RasterBuffer;
use tileplan::viewer::{Notifier, PlanViewer};
use tracing::info;

use super::common::{extent, print_markers, ViewAction};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the view command.
pub struct ViewArgs {
    pub plan: PathBuf,
    /// Defaults to the configured viewport size
    pub viewport: Option<Coordinate>,
    pub actions: Vec<ViewAction>,
}

/// Prints notices as they arrive.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("  Notice: {}", message);
    }
}

/// Counts surface events for the session summary.
#[derive(Default)]
struct CountingSink {
    ready: AtomicU64,
    evicted: AtomicU64,
    discarded: AtomicU64,
}

impl TileSink for CountingSink {
    fn on_tile_ready(&self, _level: usize, _coordinate: Coordinate, _buffer: RasterBuffer) {
        self.ready.fetch_add(1, Ordering::Relaxed);
    }

    fn on_tile_evicted(&self, _level: usize, _coordinate: Coordinate) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    fn on_surfaces_discarded(&self, _level: usize) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }
}

/// Run the view command.
pub fn run(runner: &CliRunner, args: ViewArgs) -> Result<(), CliError> {
    runner.log_startup("view");
    let pyramid = runner.load_plan(&args.plan)?;
    let size = args.viewport.unwrap_or_else(|| runner.config().viewport_size());

    let sink = Arc::new(CountingSink::default());
    let mut viewer = runner.create_viewer(pyramid, size, sink.clone(), Arc::new(ConsoleNotifier));

    println!("Plan: {}", args.plan.display());
    println!(
        "Viewport {} at level {} ({} px)",
        extent(size),
        viewer.active_level(),
        extent(viewer.active_grid().size())
    );

    println!("[0] load");
    let outcome = viewer.load();
    report(runner, &viewer, outcome);

    for (step, action) in args.actions.iter().enumerate() {
        println!("[{}] {}", step + 1, action);
        info!(step = step + 1, action = %action, "Applying view action");
        match *action {
            ViewAction::Pan(offset) => {
                let outcome = viewer.pan(offset.x, offset.y);
                report(runner, &viewer, outcome);
            }
            ViewAction::Zoom(direction) => match viewer.zoom(direction) {
                Ok(zoom) => {
                    println!(
                        "  Level {} -> {} (x{}), position {}",
                        zoom.from_level, zoom.to_level, zoom.relative_scale, zoom.position
                    );
                    wait_and_print(runner, &viewer, zoom.pass, "started");
                }
                // The notifier already told the user; the session carries on.
                Err(e) => info!(error = %e, "Zoom skipped"),
            },
            ViewAction::Reload => {
                let pass = viewer.reload();
                wait_and_print(runner, &viewer, pass, "started");
            }
        }
    }

    let stats = viewer.decode_stats();
    println!("Summary:");
    println!(
        "  Decoded {}, reused {}, failed {}, cancelled {}",
        stats.decoded, stats.reused, stats.failed, stats.cancelled
    );
    println!(
        "  Surface events: {} ready, {} evicted, {} level discards",
        sink.ready.load(Ordering::Relaxed),
        sink.evicted.load(Ordering::Relaxed),
        sink.discarded.load(Ordering::Relaxed)
    );
    Ok(())
}

fn report(runner: &CliRunner, viewer: &PlanViewer, outcome: ScheduleOutcome) {
    let label = if outcome.is_started() { "started" } else { "reused" };
    wait_and_print(runner, viewer, outcome.into_pass(), label);
}

fn wait_and_print(runner: &CliRunner, viewer: &PlanViewer, pass: LoadPass, label: &str) {
    let viewport = pass.viewport();
    println!(
        "  Pass {} ({}) at {}, viewport {}",
        pass.id(),
        label,
        viewport.position(),
        extent(viewport.size())
    );
    let report = runner.block_on(pass.wait());
    println!("  {}", report);
    print_markers(&viewer.marker_placements());
}
