//! Pixel error statistics between two poses.
//!
//! Both poses are projected through the same intrinsics and the per-point
//! distance in the image is summarised (RMSE, mean, median and so on). This
//! is the usual way to judge a pose estimate against the ground truth in
//! image space.

use nalgebra::{Matrix3, Matrix4xX};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::UtilError;
use crate::geometry::{project_pose, Pose};

/// Projection error statistics, in pixels.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProjectionError {
    /// Root Mean Square Error
    pub rmse: f64,
    /// Minimum error
    pub min: f64,
    /// Maximum error
    pub max: f64,
    /// Mean error
    pub mean: f64,
    /// Standard deviation of the errors
    pub stddev: f64,
    /// Median error
    pub median: f64,
}

impl fmt::Debug for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Projection Error [ rmse: {}, min: {}, max: {}, mean: {}, stddev: {}, median: {} ]",
            self.rmse, self.min, self.max, self.mean, self.stddev, self.median
        )
    }
}

/// Compares where `points` land under `reference` and under `estimate`.
///
/// # Arguments
///
/// * `k` - Camera intrinsics shared by both projections
/// * `reference` - Ground-truth pose
/// * `estimate` - Pose being evaluated
/// * `points` - Homogeneous body-frame points (4×N)
///
/// # Errors
///
/// * `UtilError::ZeroProjectionPoints` - If no point projects to a finite
///   pixel under both poses
pub fn compute_pose_projection_error(
    k: &Matrix3<f64>,
    reference: &Pose,
    estimate: &Pose,
    points: &Matrix4xX<f64>,
) -> Result<ProjectionError, UtilError> {
    let expected = project_pose(reference, k, points);
    let actual = project_pose(estimate, k, points);

    let errors: Vec<f64> = expected
        .iter()
        .zip(actual.iter())
        .map(|(e, a)| (a - e).norm())
        .filter(|err| err.is_finite())
        .collect();

    if errors.is_empty() {
        return Err(UtilError::ZeroProjectionPoints);
    }

    let n = errors.len() as f64;
    let mean = errors.iter().sum::<f64>() / n;

    let variance: f64 = errors.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let sum_squared: f64 = errors.iter().map(|x| x.powi(2)).sum::<f64>();
    let rmse = (sum_squared / n).sqrt();

    let min = errors.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = errors.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let mut sorted_errors = errors;
    sorted_errors.sort_by(f64::total_cmp);
    let mid = sorted_errors.len() / 2;
    let median = if sorted_errors.len() % 2 == 0 {
        (sorted_errors[mid - 1] + sorted_errors[mid]) / 2.0
    } else {
        sorted_errors[mid]
    };

    Ok(ProjectionError {
        rmse,
        min,
        max,
        mean,
        stddev,
        median,
    })
}
