//! Pinhole projection of body-frame point sets into pixel coordinates.

use nalgebra::{Matrix3, Matrix3x4, Matrix3xX, Matrix4xX, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use super::rotation::quat_to_dcm;

/// Ground-truth pose of the spacecraft relative to the camera.
///
/// `q` is the scalar-first attitude quaternion (`q_vbs2tango`) and `r` the
/// translation of the body origin in the camera frame (`r_Vo2To_vbs_true`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub q: Vector4<f64>,
    pub r: Vector3<f64>,
}

impl Pose {
    pub fn new(q: Vector4<f64>, r: Vector3<f64>) -> Self {
        Self { q, r }
    }

    /// Reads a pose from the head of a flat label vector (`q` then `r`).
    ///
    /// Returns `None` if the slice holds fewer than 7 values.
    pub fn from_target(target: &[f64]) -> Option<Self> {
        if target.len() < 7 {
            return None;
        }
        Some(Self {
            q: Vector4::from_column_slice(&target[..4]),
            r: Vector3::from_column_slice(&target[4..7]),
        })
    }
}

/// Pixel coordinates of a projected point set.
///
/// `x[i]` and `y[i]` are the image coordinates of the i-th input point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoints {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ProjectedPoints {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Returns the i-th point as a vector.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn point(&self, index: usize) -> Vector2<f64> {
        Vector2::new(self.x[index], self.y[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = Vector2<f64>> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .map(|(&x, &y)| Vector2::new(x, y))
    }
}

/// Projects homogeneous body-frame points into the image.
///
/// # Arguments
///
/// * `q` - Attitude quaternion, scalar first. Need not be normalised.
/// * `r` - Translation of the body origin in the camera frame.
/// * `k` - 3×3 camera intrinsics.
/// * `points` - Body-frame points, one homogeneous `(x, y, z, 1)` per column.
///
/// # Algorithm
///
/// ```text
/// P     = [ Rᵀ | r ]          (3×4, R = quat_to_dcm(q))
/// p_cam = P · points          (3×N)
/// p_n   = p_cam / p_cam.z     (per column)
/// uv    = K · p_n             (rows 0 and 1)
/// ```
///
/// The transpose of `R` is the dataset's convention and is intentional.
///
/// A point with zero camera depth has no image; its coordinates come back as
/// NaN or infinite rather than as an error.
///
/// # Returns
///
/// The projected coordinates, in the same order as the columns of `points`.
pub fn project(
    q: &Vector4<f64>,
    r: &Vector3<f64>,
    k: &Matrix3<f64>,
    points: &Matrix4xX<f64>,
) -> ProjectedPoints {
    let dcm_t = quat_to_dcm(q).transpose();
    let pose_mat = Matrix3x4::from_fn(|i, j| if j < 3 { dcm_t[(i, j)] } else { r[i] });

    let mut points_camera_frame: Matrix3xX<f64> = pose_mat * points;

    // Homogeneous divide by depth.
    for mut column in points_camera_frame.column_iter_mut() {
        let depth = column[2];
        column /= depth;
    }

    let points_image_plane = k * points_camera_frame;

    ProjectedPoints {
        x: points_image_plane.row(0).iter().copied().collect(),
        y: points_image_plane.row(1).iter().copied().collect(),
    }
}

/// [`project`] for a [`Pose`].
pub fn project_pose(pose: &Pose, k: &Matrix3<f64>, points: &Matrix4xX<f64>) -> ProjectedPoints {
    project(&pose.q, &pose.r, k, points)
}

/// Shrinks (or stretches) projected axis arrows towards their origin.
///
/// The input holds the projected origin at index 0 followed by the X, Y and Z
/// axis tips. Every tip is moved to `(tip - origin) * factor + origin`; the
/// origin is left untouched. Values of `factor` in `(0, 1]` shorten the
/// arrows. Only the drawing changes, never the pose.
///
/// # Panics
///
/// Panics if `points` holds fewer than 4 points.
pub fn scale_pose_vector(mut points: ProjectedPoints, factor: f64) -> ProjectedPoints {
    assert!(
        points.len() >= 4 && points.y.len() >= 4,
        "axis rescale needs the origin and three axis tips, got {} points",
        points.len()
    );

    let (x0, y0) = (points.x[0], points.y[0]);
    for i in 1..4 {
        points.x[i] = (points.x[i] - x0) * factor + x0;
        points.y[i] = (points.y[i] - y0) * factor + y0;
    }
    points
}
