//! Quaternion to direction cosine matrix conversion.
//!
//! The SPEED annotations store the attitude as `q_vbs2tango` with the scalar
//! part first (`[q0, q1, q2, q3]`). The matrix produced here follows that
//! dataset's convention and is consumed transposed by the projector, see
//! [`crate::geometry::project`].

use nalgebra::{Matrix3, Vector4};

/// Converts a quaternion into a 3×3 direction cosine (rotation) matrix.
///
/// The quaternion is normalised first, so any positive multiple of a unit
/// quaternion yields the same matrix. With the normalised components
/// `q0..q3` (scalar first):
///
/// ```text
/// R00 = 2q0² - 1 + 2q1²   R01 = 2q1q2 + 2q0q3     R02 = 2q1q3 - 2q0q2
/// R10 = 2q1q2 - 2q0q3     R11 = 2q0² - 1 + 2q2²   R12 = 2q2q3 + 2q0q1
/// R20 = 2q1q3 + 2q0q2     R21 = 2q2q3 - 2q0q1     R22 = 2q0² - 1 + 2q3²
/// ```
///
/// A zero quaternion has no orientation: the normalisation divides by zero
/// and every entry of the result is NaN. Callers must pass a valid attitude.
///
/// # Examples
///
/// ```rust
/// use nalgebra::{Matrix3, Vector4};
/// use speed_pose::geometry::quat_to_dcm;
///
/// let r = quat_to_dcm(&Vector4::new(1.0, 0.0, 0.0, 0.0));
/// assert_eq!(r, Matrix3::identity());
/// ```
pub fn quat_to_dcm(q: &Vector4<f64>) -> Matrix3<f64> {
    let q = q / q.norm();
    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);

    let mut dcm = Matrix3::zeros();

    dcm[(0, 0)] = 2.0 * q0 * q0 - 1.0 + 2.0 * q1 * q1;
    dcm[(1, 1)] = 2.0 * q0 * q0 - 1.0 + 2.0 * q2 * q2;
    dcm[(2, 2)] = 2.0 * q0 * q0 - 1.0 + 2.0 * q3 * q3;

    dcm[(0, 1)] = 2.0 * q1 * q2 + 2.0 * q0 * q3;
    dcm[(0, 2)] = 2.0 * q1 * q3 - 2.0 * q0 * q2;

    dcm[(1, 0)] = 2.0 * q1 * q2 - 2.0 * q0 * q3;
    dcm[(1, 2)] = 2.0 * q2 * q3 + 2.0 * q0 * q1;

    dcm[(2, 0)] = 2.0 * q1 * q3 + 2.0 * q0 * q2;
    dcm[(2, 1)] = 2.0 * q2 * q3 - 2.0 * q0 * q1;

    dcm
}
