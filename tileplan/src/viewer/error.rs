use thiserror::Error;

use crate::pyramid::PyramidError;
use crate::zoom::ZoomDirection;

/// Errors returned by [`PlanViewer`](super::PlanViewer) operations.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Zoom requested past the first or last pyramid level. State is unchanged.
    #[error("{} zoom level already reached", limit_name(.direction))]
    ZoomLimitReached { direction: ZoomDirection },

    #[error(transparent)]
    Pyramid(#[from] PyramidError),
}

fn limit_name(direction: &ZoomDirection) -> &'static str {
    match direction {
        ZoomDirection::In => "maximum",
        ZoomDirection::Out => "minimum",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_limit_messages() {
        let max = ViewerError::ZoomLimitReached {
            direction: ZoomDirection::In,
        };
        let min = ViewerError::ZoomLimitReached {
            direction: ZoomDirection::Out,
        };
        assert_eq!(max.to_string(), "maximum zoom level already reached");
        assert_eq!(min.to_string(), "minimum zoom level already reached");
    }
}
