//! Rendering and evaluation helpers built on top of the geometric core.
//!
//! - `canvas`: the [`Canvas`] drawing surface and an in-memory [`RasterCanvas`].
//! - `visualize`: [`PoseVisualizer`], which overlays a pose on an image.
//! - `error_metrics`: pixel error statistics between two poses.

mod canvas;
mod error_metrics;
mod visualize;

pub use canvas::{ArrowHead, Canvas, RasterCanvas};
pub use error_metrics::{compute_pose_projection_error, ProjectionError};
pub use visualize::{PoseVisualizer, AXIS_COLORS, WIREFRAME_COLOR};

#[derive(thiserror::Error, Debug)]
pub enum UtilError {
    #[error("Zero projection points")]
    ZeroProjectionPoints,
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
    #[error("Image error: {0}")]
    ImageError(String),
}

impl From<std::io::Error> for UtilError {
    fn from(err: std::io::Error) -> Self {
        UtilError::ImageError(err.to_string())
    }
}

impl From<image::ImageError> for UtilError {
    fn from(err: image::ImageError) -> Self {
        UtilError::ImageError(err.to_string())
    }
}
