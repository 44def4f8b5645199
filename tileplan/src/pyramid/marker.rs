//! Zoom-invariant annotations placed on the plan.

use crate::coord::Coordinate;
use std::fmt;
use std::str::FromStr;

/// What a marker annotates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Text,
    Video,
    Audio,
    Other(String),
}

impl MarkerKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "Text",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "video" => Self::Video,
            "audio" => Self::Audio,
            _ => Self::Other(s.trim().to_string()),
        })
    }
}

/// An annotation anchored at a reference-scale position.
///
/// The icon size is fixed on screen; only the placement moves with zoom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    kind: MarkerKind,
    position: Coordinate,
    icon_size: Coordinate,
}

impl Marker {
    pub fn new(kind: MarkerKind, position: Coordinate, icon_size: Coordinate) -> Self {
        Self {
            kind,
            position,
            icon_size,
        }
    }

    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    /// Anchor in reference-scale (1.0) pixels.
    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn icon_size(&self) -> Coordinate {
        self.icon_size
    }

    /// Screen placement at `scale_factor`, with the icon centered on the
    /// scaled anchor.
    pub fn placement(&self, scale_factor: f32) -> MarkerPlacement {
        let half = self.icon_size / 2;
        let top_left = Coordinate::new(
            (self.position.x as f32 * scale_factor - half.x as f32) as i32,
            (self.position.y as f32 * scale_factor - half.y as f32) as i32,
        );
        MarkerPlacement {
            kind: self.kind.clone(),
            top_left,
            size: self.icon_size,
        }
    }
}

/// Where a marker's icon is drawn for the active level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPlacement {
    pub kind: MarkerKind,
    pub top_left: Coordinate,
    pub size: Coordinate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_centers_icon() {
        let marker = Marker::new(
            MarkerKind::Video,
            Coordinate::new(435, 200),
            Coordinate::new(50, 50),
        );
        assert_eq!(marker.placement(1.0).top_left, Coordinate::new(410, 175));
        assert_eq!(marker.placement(0.5).top_left, Coordinate::new(192, 75));
        assert_eq!(marker.placement(2.0).top_left, Coordinate::new(845, 375));
    }

    #[test]
    fn test_icon_size_never_scales() {
        let marker = Marker::new(
            MarkerKind::Audio,
            Coordinate::new(1000, 1000),
            Coordinate::new(50, 30),
        );
        for scale in [0.25, 1.0, 4.0] {
            assert_eq!(marker.placement(scale).size, Coordinate::new(50, 30));
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("text".parse::<MarkerKind>().unwrap(), MarkerKind::Text);
        assert_eq!(" Audio ".parse::<MarkerKind>().unwrap(), MarkerKind::Audio);
        assert_eq!(
            "Photo".parse::<MarkerKind>().unwrap(),
            MarkerKind::Other("Photo".to_string())
        );
        assert_eq!(MarkerKind::Video.to_string(), "Video");
    }
}
