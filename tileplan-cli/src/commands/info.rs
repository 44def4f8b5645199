//! Info command - describe a plan's levels and markers.

use std::path::PathBuf;

use super::common::extent;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the info command.
pub struct InfoArgs {
    pub plan: PathBuf,
}

/// Run the info command.
pub fn run(runner: &CliRunner, args: InfoArgs) -> Result<(), CliError> {
    runner.log_startup("info");
    let pyramid = runner.load_plan(&args.plan)?;

    println!("Plan: {}", args.plan.display());
    println!("Reference size: {} px", extent(pyramid.reference_size()));
    println!("Levels:");
    for (level, grid) in pyramid.grids().iter().enumerate() {
        let mut tags = Vec::new();
        if level == pyramid.reference_level() {
            tags.push("reference");
        }
        if level == pyramid.active_level() {
            tags.push("initial");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        println!(
            "  {}: {} tiles of {} px = {} px, scale {}{}",
            level,
            extent(grid.dimension()),
            extent(grid.tile_size()),
            extent(grid.size()),
            grid.scale_factor(),
            tags
        );
    }

    if pyramid.markers().is_empty() {
        println!("Markers: none");
    } else {
        println!("Markers:");
        for marker in pyramid.markers() {
            println!(
                "  {:<8} at {}  icon {}",
                marker.kind().to_string(),
                marker.position(),
                extent(marker.icon_size())
            );
        }
    }

    Ok(())
}
