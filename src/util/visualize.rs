//! Pose overlays: body axes and wireframe projected onto the input image.

use image::{Rgb, RgbImage};
use log::debug;

use super::canvas::{ArrowHead, Canvas};
use crate::camera::{Camera, CropDescriptor, Resolution, SensorConfig};
use crate::geometry::{
    axes_vertices, project_pose, scale_pose_vector, wireframe_vertices, Pose, WIREFRAME_EDGES,
};

/// Colors of the body X, Y and Z axes.
pub const AXIS_COLORS: [Rgb<u8>; 3] = [Rgb([255, 0, 0]), Rgb([0, 128, 0]), Rgb([0, 0, 255])];

/// Color of the wireframe edges.
pub const WIREFRAME_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

const AXIS_HEAD_WIDTH: f64 = 10.0;

/// Draws a pose on top of an image through a [`Canvas`].
///
/// The body axes are drawn as arrows from the projected origin, X red, Y
/// dark green and Z blue, each shortened or stretched by the axis scale. The
/// optional wireframe is the 12 edges of the body box.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseVisualizer {
    sensor: SensorConfig,
    input_size: Resolution,
    axis_scale: f64,
    wireframe: bool,
}

impl PoseVisualizer {
    pub fn new(sensor: SensorConfig, input_size: Resolution) -> Self {
        Self {
            sensor,
            input_size,
            axis_scale: 1.0,
            wireframe: false,
        }
    }

    pub fn with_axis_scale(mut self, factor: f64) -> Self {
        self.axis_scale = factor;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// The camera that produced an image of the input size.
    ///
    /// With a crop, the crop itself is the source of the resize and the
    /// principal point is moved to match. Without one, the full sensor frame
    /// was resized.
    pub fn camera(&self, crop: Option<&CropDescriptor>) -> Camera {
        match crop {
            Some(crop) => Camera::for_crop(self.sensor.clone(), crop, self.input_size),
            None => Camera::from_sensor(self.sensor.clone(), self.input_size),
        }
    }

    /// Blits `image` and draws `pose` over it.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        image: &RgbImage,
        pose: &Pose,
        crop: Option<&CropDescriptor>,
    ) {
        let camera = self.camera(crop);
        debug!(
            "rendering pose q={:?} r={:?} on {}x{} image",
            pose.q.as_slice(),
            pose.r.as_slice(),
            image.width(),
            image.height()
        );

        canvas.blit(image);

        let axes = scale_pose_vector(
            project_pose(pose, camera.k(), &axes_vertices()),
            self.axis_scale,
        );
        let origin = axes.point(0);
        for (axis, color) in AXIS_COLORS.iter().enumerate() {
            canvas.draw_arrow(
                origin,
                axes.point(axis + 1),
                *color,
                Some(ArrowHead::with_width(AXIS_HEAD_WIDTH)),
            );
        }

        if self.wireframe {
            let corners = project_pose(pose, camera.k(), &wireframe_vertices());
            for &(from, to) in WIREFRAME_EDGES.iter() {
                canvas.draw_arrow(corners.point(from), corners.point(to), WIREFRAME_COLOR, None);
            }
        }
    }
}
