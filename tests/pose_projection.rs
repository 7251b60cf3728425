//! Integration tests for the rotation, camera and projection chain

use approx::assert_relative_eq;
use nalgebra::{Matrix4xX, Vector3, Vector4};
use speed_pose::camera::{Camera, CropDescriptor, Resolution, SensorConfig};
use speed_pose::geometry::{
    axes_vertices, project, project_pose, quat_to_dcm, scale_pose_vector, wireframe_vertices, Pose,
};

#[test]
fn test_axis_tip_at_native_resolution() {
    let sensor = SensorConfig::default();
    let [fpx, _] = sensor.focal_length_pixels();
    let camera = Camera::from_sensor(sensor.clone(), sensor.resolution);

    let q = Vector4::new(1.0, 0.0, 0.0, 0.0);
    let r = Vector3::new(0.0, 0.0, 10.0);
    let point = Matrix4xX::from_column_slice(&[1.0, 0.0, 0.0, 1.0]);

    let projected = project(&q, &r, camera.k(), &point);
    assert_eq!(projected.len(), 1);
    assert_relative_eq!(projected.x[0], 960.0 + fpx / 10.0, epsilon = 1e-9);
    assert_relative_eq!(projected.y[0], 600.0, epsilon = 1e-9);
}

#[test]
fn test_origin_projects_to_principal_point_at_any_depth() {
    let camera = Camera::default();
    let origin = Matrix4xX::from_column_slice(&[0.0, 0.0, 0.0, 1.0]);
    let q = Vector4::new(1.0, 0.0, 0.0, 0.0);

    for depth in [0.5, 3.0, 27.0, 1.0e4] {
        let projected = project(&q, &Vector3::new(0.0, 0.0, depth), camera.k(), &origin);
        assert_relative_eq!(projected.x[0], camera.intrinsics().cx, epsilon = 1e-9);
        assert_relative_eq!(projected.y[0], camera.intrinsics().cy, epsilon = 1e-9);
    }
}

#[test]
fn test_rotation_properties_over_random_quaternions() {
    let quaternions = [
        Vector4::new(0.3, -0.2, 0.9, 0.1),
        Vector4::new(-1.0, 2.0, 0.5, -0.7),
        Vector4::new(0.0, 0.0, 0.0, 3.0),
        Vector4::new(12.0, 0.1, -0.1, 0.3),
    ];
    for q in quaternions {
        let dcm = quat_to_dcm(&q);
        assert_relative_eq!(dcm * dcm.transpose(), nalgebra::Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(dcm.determinant(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(quat_to_dcm(&(q * 4.2)), dcm, epsilon = 1e-12);
    }
}

#[test]
fn test_wireframe_projection_is_index_aligned() {
    let camera = Camera::default();
    let pose = Pose::new(
        Vector4::new(0.9, 0.1, -0.3, 0.2),
        Vector3::new(0.2, -0.1, 8.0),
    );
    let corners = wireframe_vertices();
    let projected = project_pose(&pose, camera.k(), &corners);
    assert_eq!(projected.len(), 8);

    for i in 0..8 {
        let single = project_pose(&pose, camera.k(), &corners.columns(i, 1).into_owned());
        assert_relative_eq!(single.point(0), projected.point(i), epsilon = 1e-9);
    }
}

#[test]
fn test_axis_rescale_after_projection() {
    let camera = Camera::default();
    let pose = Pose::new(Vector4::new(1.0, 0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 10.0));
    let axes = project_pose(&pose, camera.k(), &axes_vertices());
    let half = scale_pose_vector(axes.clone(), 0.5);

    assert_eq!(half.point(0), axes.point(0));
    for i in 1..4 {
        let midpoint = (axes.point(0) + axes.point(i)) / 2.0;
        assert_relative_eq!(half.point(i), midpoint, epsilon = 1e-9);
    }
}

#[test]
fn test_crop_compensation_matches_uncropped_projection() {
    // Projecting through a cropped camera and mapping back to native pixels
    // must agree with projecting through the native camera.
    let sensor = SensorConfig::default();
    let native = Camera::from_sensor(sensor.clone(), sensor.resolution);
    let input = Resolution::square(256);
    let crop = CropDescriptor {
        cx: 1010.0,
        cy: 580.0,
        size: 640.0,
    };
    let mut cropped = Camera::new(sensor, Resolution::square(640), input);
    cropped.compensate_crop(&crop);

    let pose = Pose::new(Vector4::new(0.8, 0.2, 0.1, -0.3), Vector3::new(0.1, 0.05, 9.0));
    let points = wireframe_vertices();
    let in_native = project_pose(&pose, native.k(), &points);
    let in_crop = project_pose(&pose, cropped.k(), &points);

    let scale = 640.0 / 256.0;
    for (n, c) in in_native.iter().zip(in_crop.iter()) {
        assert_relative_eq!(c.x * scale + crop.cx - 320.0, n.x, epsilon = 1e-6);
        assert_relative_eq!(c.y * scale + crop.cy - 320.0, n.y, epsilon = 1e-6);
    }
}
