//! TilePlan CLI - Command-line interface
//!
//! Inspects plan pyramids and drives headless viewing sessions against the
//! tileplan engine.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tileplan::coord::Coordinate;

use commands::common::{parse_action, parse_extent, parse_offset, ViewAction};
use commands::{info, order, view};
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "tileplan")]
#[command(version = tileplan::VERSION)]
#[command(about = "Lazy tile loading for multi-resolution plan pyramids", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.tileplan/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging and mirror log records to stdout
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a plan's levels and markers
    Info {
        /// Plan file (INI)
        plan: PathBuf,
    },

    /// Print the tiles a load pass would submit, in submission order
    Order {
        /// Plan file (INI)
        plan: PathBuf,

        /// Pyramid level (defaults to the reference level)
        #[arg(long)]
        level: Option<usize>,

        /// Viewport size as WIDTHxHEIGHT (defaults to the configured size)
        #[arg(long, value_parser = parse_extent)]
        viewport: Option<Coordinate>,

        /// Viewport position as X,Y before clamping
        #[arg(
            long,
            value_parser = parse_offset,
            default_value = "0,0",
            allow_hyphen_values = true
        )]
        position: Coordinate,
    },

    /// Run a headless session: initial load, then each action in order
    View {
        /// Plan file (INI)
        plan: PathBuf,

        /// Viewport size as WIDTHxHEIGHT (defaults to the configured size)
        #[arg(long, value_parser = parse_extent)]
        viewport: Option<Coordinate>,

        /// Actions: pan:DX,DY, zoom:in, zoom:out or reload
        #[arg(value_parser = parse_action)]
        actions: Vec<ViewAction>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.debug)?;

    match cli.command {
        Commands::Info { plan } => info::run(&runner, info::InfoArgs { plan }),

        Commands::Order {
            plan,
            level,
            viewport,
            position,
        } => order::run(
            &runner,
            order::OrderArgs {
                plan,
                level,
                viewport,
                position,
            },
        ),

        Commands::View {
            plan,
            viewport,
            actions,
        } => view::run(
            &runner,
            view::ViewArgs {
                plan,
                viewport,
                actions,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tileplan::zoom::ZoomDirection;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_view_actions_keep_order() {
        let cli = Cli::try_parse_from([
            "tileplan",
            "view",
            "plan.ini",
            "zoom:in",
            "pan:-100,20",
            "reload",
        ])
        .unwrap();

        match cli.command {
            Commands::View { actions, .. } => assert_eq!(
                actions,
                vec![
                    ViewAction::Zoom(ZoomDirection::In),
                    ViewAction::Pan(Coordinate::new(-100, 20)),
                    ViewAction::Reload,
                ]
            ),
            _ => panic!("expected view"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = ["tileplan", "info", "plan.ini", "--debug", "--config", "c.ini"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("c.ini")));
    }

    #[test]
    fn test_order_defaults() {
        let cli = Cli::try_parse_from(["tileplan", "order", "plan.ini"]).unwrap();
        match cli.command {
            Commands::Order {
                level,
                viewport,
                position,
                ..
            } => {
                assert_eq!(level, None);
                assert_eq!(viewport, None);
                assert_eq!(position, Coordinate::new(0, 0));
            }
            _ => panic!("expected order"),
        }
    }

    #[test]
    fn test_invalid_action_rejected() {
        assert!(Cli::try_parse_from(["tileplan", "view", "plan.ini", "spin:1"]).is_err());
    }
}
