//! SPEED spacecraft pose dataset tools.
//!
//! The crate loads the SPEED annotation files and images, and carries the
//! geometry needed to draw a ground-truth pose on an image:
//! - quaternion to direction cosine matrix conversion
//! - pinhole intrinsics derived from the sensor, with resize and crop
//!   compensation
//! - projection of body-frame points (axes, wireframe box) into pixels
//!
//! Training code reads samples through [`SpeedDataset`]; inspection code
//! renders them with [`PoseVisualizer`] on any [`Canvas`].

pub mod camera;
pub mod dataset;
pub mod geometry;
pub mod util;

// Re-export commonly used types
pub use camera::{Camera, CameraError, CropDescriptor, Intrinsics, Resolution, SensorConfig};
pub use dataset::{
    DatasetConfig, DatasetError, PoseLabel, SampleIndex, SampleTransform, Split, SpeedDataset,
    Target,
};
pub use geometry::{project, project_pose, quat_to_dcm, scale_pose_vector, Pose, ProjectedPoints};
pub use util::{Canvas, PoseVisualizer, RasterCanvas, UtilError};
