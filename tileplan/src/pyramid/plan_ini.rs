//! INI plan files.
//!
//! ```text
//! [plan]
//! sources = per-tile
//! source = tiles/{level}/{x}_{y}.png
//!
//! [level.0]
//! dimension = 10x10
//! tile_size = 200x200
//! scale = 0.5
//!
//! [marker.0]
//! kind = Text
//! position = 200,200
//! icon_size = 50x50
//! ```
//!
//! `per-level` plans list `source.0`, `source.1`, ... instead of `source`.
//! Relative source paths are resolved against the plan file's directory.

use ini::{Ini, Properties};
use std::path::Path;

use super::error::PlanError;
use super::marker::{Marker, MarkerKind};
use super::plan::{LevelDescription, PlanDescription, SourceLayout};
use crate::coord::Coordinate;
use crate::tile::SourceRef;

const PLAN_SECTION: &str = "plan";
const LEVEL_PREFIX: &str = "level.";
const MARKER_PREFIX: &str = "marker.";

impl PlanDescription {
    /// Loads a plan file, resolving relative sources against its directory.
    pub fn from_ini_file(path: &Path) -> Result<Self, PlanError> {
        let ini = Ini::load_from_file(path)?;
        parse_plan(&ini, path.parent())
    }

    /// Parses plan text. Relative sources are kept as written.
    pub fn from_ini_str(content: &str) -> Result<Self, PlanError> {
        let ini = Ini::load_from_str(content)?;
        parse_plan(&ini, None)
    }
}

fn parse_plan(ini: &Ini, base: Option<&Path>) -> Result<PlanDescription, PlanError> {
    let plan = ini.section(Some(PLAN_SECTION)).ok_or_else(|| missing(PLAN_SECTION, "sources"))?;

    let mut levels = indexed_sections(ini, LEVEL_PREFIX)?;
    levels.sort_by_key(|(index, _, _)| *index);
    let levels = levels
        .into_iter()
        .map(|(_, name, section)| parse_level(&name, section))
        .collect::<Result<Vec<_>, _>>()?;

    let sources = parse_sources(plan, levels.len(), base)?;

    let mut markers = indexed_sections(ini, MARKER_PREFIX)?;
    markers.sort_by_key(|(index, _, _)| *index);
    let markers = markers
        .into_iter()
        .map(|(_, name, section)| parse_marker(&name, section))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PlanDescription::new(levels, sources).with_markers(markers))
}

/// Sections named `<prefix><n>` with their numeric index.
fn indexed_sections<'a>(
    ini: &'a Ini,
    prefix: &str,
) -> Result<Vec<(usize, String, &'a Properties)>, PlanError> {
    let mut found = Vec::new();
    for (name, properties) in ini.iter() {
        let Some(name) = name else { continue };
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        let index = suffix.parse::<usize>().map_err(|_| PlanError::InvalidValue {
            section: name.to_string(),
            key: String::new(),
            value: suffix.to_string(),
            reason: format!("section suffix must be a number, like '{}0'", prefix),
        })?;
        found.push((index, name.to_string(), properties));
    }
    Ok(found)
}

fn parse_level(section: &str, properties: &Properties) -> Result<LevelDescription, PlanError> {
    let dimension = required_coordinate(section, properties, "dimension")?;
    let tile_size = required_coordinate(section, properties, "tile_size")?;
    let scale = required(section, properties, "scale")?;
    let scale_factor = scale.trim().parse::<f32>().map_err(|_| PlanError::InvalidValue {
        section: section.to_string(),
        key: "scale".to_string(),
        value: scale.to_string(),
        reason: "must be a number like 0.5, 1.0 or 2.0".to_string(),
    })?;
    Ok(LevelDescription::new(dimension, tile_size, scale_factor))
}

fn parse_marker(section: &str, properties: &Properties) -> Result<Marker, PlanError> {
    let kind = properties
        .get("kind")
        .and_then(|v| v.parse::<MarkerKind>().ok())
        .unwrap_or(MarkerKind::Text);
    let position = required_coordinate(section, properties, "position")?;
    let icon_size = required_coordinate(section, properties, "icon_size")?;
    Ok(Marker::new(kind, position, icon_size))
}

fn parse_sources(
    plan: &Properties,
    level_count: usize,
    base: Option<&Path>,
) -> Result<SourceLayout, PlanError> {
    let mode = required(PLAN_SECTION, plan, "sources")?.trim().to_lowercase();
    match mode.as_str() {
        "single" => {
            let source = required(PLAN_SECTION, plan, "source")?;
            Ok(SourceLayout::Single(SourceRef::new(resolve(source, base))))
        }
        "per-tile" => {
            let template = required(PLAN_SECTION, plan, "source")?;
            Ok(SourceLayout::PerTile(resolve(template, base)))
        }
        "per-level" => {
            let sources = (0..level_count)
                .map(|level| {
                    let key = format!("source.{}", level);
                    required(PLAN_SECTION, plan, &key).map(|s| SourceRef::new(resolve(s, base)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(SourceLayout::PerLevel(sources))
        }
        _ => Err(PlanError::InvalidValue {
            section: PLAN_SECTION.to_string(),
            key: "sources".to_string(),
            value: mode,
            reason: "must be one of: single, per-level, per-tile".to_string(),
        }),
    }
}

fn resolve(source: &str, base: Option<&Path>) -> String {
    let source = source.trim();
    match base {
        Some(dir) if Path::new(source).is_relative() && !dir.as_os_str().is_empty() => {
            dir.join(source).to_string_lossy().into_owned()
        }
        _ => source.to_string(),
    }
}

fn required<'a>(
    section: &str,
    properties: &'a Properties,
    key: &str,
) -> Result<&'a str, PlanError> {
    properties.get(key).ok_or_else(|| missing(section, key))
}

fn required_coordinate(
    section: &str,
    properties: &Properties,
    key: &str,
) -> Result<Coordinate, PlanError> {
    let value = required(section, properties, key)?;
    parse_coordinate(value).ok_or_else(|| PlanError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected two integers like '200x200' or '200,200'".to_string(),
    })
}

fn missing(section: &str, key: &str) -> PlanError {
    PlanError::MissingKey {
        section: section.to_string(),
        key: key.to_string(),
    }
}

/// Parses `"WxH"` or `"X,Y"`.
pub(crate) fn parse_coordinate(value: &str) -> Option<Coordinate> {
    let (x, y) = value.split_once(|c: char| c == 'x' || c == 'X' || c == ',')?;
    Some(Coordinate::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}
