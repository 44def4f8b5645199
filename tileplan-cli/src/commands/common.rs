//! Argument parsers and output helpers shared across commands.

use std::fmt;
use std::str::FromStr;

use tileplan::coord::Coordinate;
use tileplan::pyramid::MarkerPlacement;
use tileplan::zoom::ZoomDirection;

/// Parses a pixel extent such as `1280x800`.
pub fn parse_extent(s: &str) -> Result<Coordinate, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let parse = |v: &str| v.trim().parse::<i32>().ok().filter(|n| *n > 0);
    match (parse(w), parse(h)) {
        (Some(w), Some(h)) => Ok(Coordinate::new(w, h)),
        _ => Err(format!("'{}' is not a positive WIDTHxHEIGHT", s)),
    }
}

/// Parses a signed pair such as `200,-40`.
pub fn parse_offset(s: &str) -> Result<Coordinate, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    match (x.trim().parse::<i32>(), y.trim().parse::<i32>()) {
        (Ok(x), Ok(y)) => Ok(Coordinate::new(x, y)),
        _ => Err(format!("'{}' is not an integer X,Y pair", s)),
    }
}

pub fn parse_zoom(s: &str) -> Result<ZoomDirection, String> {
    s.parse()
}

/// One step of a scripted `view` session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Pan(Coordinate),
    Zoom(ZoomDirection),
    Reload,
}

impl FromStr for ViewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("reload") {
            return Ok(ViewAction::Reload);
        }
        match s.split_once(':') {
            Some(("pan", offset)) => parse_offset(offset).map(ViewAction::Pan),
            Some(("zoom", direction)) => parse_zoom(direction).map(ViewAction::Zoom),
            _ => Err(format!(
                "unknown action '{}', expected pan:DX,DY, zoom:in, zoom:out or reload",
                s
            )),
        }
    }
}

impl fmt::Display for ViewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewAction::Pan(offset) => write!(f, "pan {}", offset),
            ViewAction::Zoom(direction) => write!(f, "zoom {}", direction),
            ViewAction::Reload => write!(f, "reload"),
        }
    }
}

pub fn parse_action(s: &str) -> Result<ViewAction, String> {
    s.parse()
}

/// `WxH` rendering of an extent.
pub fn extent(c: Coordinate) -> String {
    format!("{}x{}", c.x, c.y)
}

pub fn print_markers(placements: &[MarkerPlacement]) {
    if placements.is_empty() {
        return;
    }
    println!("  Markers:");
    for placement in placements {
        println!(
            "    {:<8} top-left {}  icon {}",
            placement.kind.to_string(),
            placement.top_left,
            extent(placement.size)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extent() {
        assert_eq!(parse_extent("1280x800"), Ok(Coordinate::new(1280, 800)));
        assert_eq!(parse_extent("64X32"), Ok(Coordinate::new(64, 32)));
        assert!(parse_extent("0x10").is_err());
        assert!(parse_extent("1280").is_err());
    }

    #[test]
    fn test_parse_offset_allows_negative() {
        assert_eq!(parse_offset("-200, 40"), Ok(Coordinate::new(-200, 40)));
        assert!(parse_offset("1;2").is_err());
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!("pan:10,-5".parse(), Ok(ViewAction::Pan(Coordinate::new(10, -5))));
        assert_eq!("zoom:in".parse(), Ok(ViewAction::Zoom(ZoomDirection::In)));
        assert_eq!("zoom:out".parse(), Ok(ViewAction::Zoom(ZoomDirection::Out)));
        assert_eq!("RELOAD".parse(), Ok(ViewAction::Reload));
        assert!("jump:1,1".parse::<ViewAction>().is_err());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ViewAction::Zoom(ZoomDirection::In).to_string(), "zoom in");
        assert_eq!(ViewAction::Reload.to_string(), "reload");
    }
}
