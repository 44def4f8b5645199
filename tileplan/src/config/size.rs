//! Human-readable byte sizes ("512MB", "2GB").

use std::fmt;
use thiserror::Error;

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Suffixes in match order; longer spellings first.
const UNITS: [(&str, usize); 6] = [
    ("GB", GB),
    ("G", GB),
    ("MB", MB),
    ("M", MB),
    ("KB", KB),
    ("K", KB),
];

/// A size string that is not a whole number with an optional K/M/G suffix.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '512MB', '2GB', or '1024KB'")]
pub struct SizeParseError {
    input: String,
}

/// Parses a byte count with an optional binary suffix.
///
/// Suffixes are case-insensitive and may be separated from the number by
/// whitespace. A bare number is bytes.
///
/// ```
/// use tileplan::config::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("512MB").unwrap(), 512 * 1024 * 1024);
/// assert_eq!(parse_size("2 g").unwrap(), 2 * 1024 * 1024 * 1024);
/// ```
pub fn parse_size(s: &str) -> Result<usize, SizeParseError> {
    let trimmed = s.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (number, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|n| (n.trim_end(), *multiplier))
        })
        .unwrap_or((upper.as_str(), 1));

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SizeParseError { input: s.to_string() });
    }

    number
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(|| SizeParseError { input: s.to_string() })
}

/// Formats a byte count with the largest suffix that divides it exactly.
///
/// ```
/// use tileplan::config::format_size;
///
/// assert_eq!(format_size(512 * 1024 * 1024), "512MB");
/// assert_eq!(format_size(1000), "1000");
/// ```
pub fn format_size(bytes: usize) -> String {
    for (suffix, unit) in [("GB", GB), ("MB", MB), ("KB", KB)] {
        if bytes >= unit && bytes % unit == 0 {
            return format!("{}{}", bytes / unit, suffix);
        }
    }
    bytes.to_string()
}

/// A byte count that parses from and displays as a human-readable size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Size(pub usize);

impl Size {
    pub fn bytes(self) -> usize {
        self.0
    }

    pub fn from_mb(mb: usize) -> Self {
        Self(mb * MB)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_size(self.0))
    }
}

impl std::str::FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_size(s).map(Size)
    }
}
