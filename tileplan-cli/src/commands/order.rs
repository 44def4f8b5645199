//! Order command - print the tiles a load pass would submit, in order.

use std::path::PathBuf;

use tileplan::coord::Coordinate;
use tileplan::scheduler::{calculate_center_tile, load_order, loading_level};
use tileplan::viewport::Viewport;

use super::common::extent;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the order command.
pub struct OrderArgs {
    pub plan: PathBuf,
    /// Defaults to the reference level
    pub level: Option<usize>,
    /// Defaults to the configured viewport size
    pub viewport: Option<Coordinate>,
    pub position: Coordinate,
}

/// Run the order command.
pub fn run(runner: &CliRunner, args: OrderArgs) -> Result<(), CliError> {
    runner.log_startup("order");
    let pyramid = runner.load_plan(&args.plan)?;

    let level = args.level.unwrap_or(pyramid.reference_level());
    let grid = pyramid.grid(level).ok_or_else(|| {
        CliError::InvalidArgument(format!(
            "level {} does not exist (plan has {} levels)",
            level,
            pyramid.level_count()
        ))
    })?;
    let size = args.viewport.unwrap_or_else(|| runner.config().viewport_size());
    let viewport = Viewport::with_position(args.position, size, grid.size());
    let order = load_order(grid, &viewport);

    println!(
        "Level {}: {} tiles of {} px, viewport {} at {}",
        level,
        extent(grid.dimension()),
        extent(grid.tile_size()),
        extent(viewport.size()),
        viewport.position()
    );
    println!("Loading radius: {}", loading_level(viewport.size(), grid.tile_size()));
    println!("Center tile: {}", calculate_center_tile(&viewport, grid));
    println!("Load order ({} tiles):", order.len());
    for (i, coordinate) in order.iter().enumerate() {
        println!("  {:>4}. {}", i + 1, coordinate);
    }

    Ok(())
}
