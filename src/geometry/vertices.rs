//! Fixed body-frame point sets of the Tango spacecraft.
//!
//! Points are homogeneous `(x, y, z, 1)` columns of a [`Matrix4xX`]. The
//! column order is part of the contract: the projector keeps it, and the
//! visualizer indexes the projected points by position.

use nalgebra::{Matrix4xX, Vector4};

/// Half extent of the spacecraft body along x, in metres.
const BODY_HALF_X: f64 = 0.37;
/// Half extent of the spacecraft body along y, in metres.
const BODY_HALF_Y: f64 = 0.285;
/// Height of the spacecraft body along z, in metres.
const BODY_HEIGHT: f64 = 0.295;

/// Box edges as index pairs into [`wireframe_vertices`]: the bottom ring, the
/// top ring, then the four verticals.
pub const WIREFRAME_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Origin followed by the unit X, Y and Z axis tips.
pub fn axes_vertices() -> Matrix4xX<f64> {
    Matrix4xX::from_columns(&[
        Vector4::new(0.0, 0.0, 0.0, 1.0),
        Vector4::new(1.0, 0.0, 0.0, 1.0),
        Vector4::new(0.0, 1.0, 0.0, 1.0),
        Vector4::new(0.0, 0.0, 1.0, 1.0),
    ])
}

/// The eight corners of the body box: four bottom corners (z = 0) followed by
/// the four top corners in the same winding.
pub fn wireframe_vertices() -> Matrix4xX<f64> {
    let corner = |sx: f64, sy: f64, z: f64| {
        Vector4::new(sx * BODY_HALF_X, sy * BODY_HALF_Y, z, 1.0)
    };

    Matrix4xX::from_columns(&[
        corner(1.0, 1.0, 0.0),
        corner(-1.0, 1.0, 0.0),
        corner(-1.0, -1.0, 0.0),
        corner(1.0, -1.0, 0.0),
        corner(1.0, 1.0, BODY_HEIGHT),
        corner(-1.0, 1.0, BODY_HEIGHT),
        corner(-1.0, -1.0, BODY_HEIGHT),
        corner(1.0, -1.0, BODY_HEIGHT),
    ])
}
