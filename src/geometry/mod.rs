//! Geometric core: attitude conversion, pinhole projection and the fixed
//! body-frame point sets of the spacecraft.
//!
//! - `rotation`: quaternion to direction cosine matrix.
//! - `projection`: body-frame points to pixel coordinates, plus the cosmetic
//!   axis rescale used when drawing.
//! - `vertices`: the axis and wireframe point sets and the box edge list.
//!
//! Everything here is a pure function of its inputs. Degenerate inputs (zero
//! quaternion, zero depth) yield non-finite numbers instead of errors.

pub mod projection;
pub mod rotation;
pub mod vertices;

pub use projection::{project, project_pose, scale_pose_vector, Pose, ProjectedPoints};
pub use rotation::quat_to_dcm;
pub use vertices::{axes_vertices, wireframe_vertices, WIREFRAME_EDGES};
