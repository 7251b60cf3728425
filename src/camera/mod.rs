//! Camera intrinsics for the SPEED imagery.
//!
//! The dataset images come from a single physical sensor, described by a
//! [`SensorConfig`]. A [`Camera`] turns that description into the 3×3
//! intrinsics matrix `K` for the resolution the network actually sees, and can
//! shift its principal point to undo a crop that happened before the resize.
//!
//! Submodules:
//! - `sensor`: the physical sensor description and its YAML I/O.

use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

pub mod sensor;

pub use sensor::SensorConfig;

/// Represents the intrinsic parameters of a camera.
///
/// These parameters define the internal geometry of the camera,
/// including focal length and principal point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    /// The focal length along the x-axis, in pixels.
    pub fx: f64,
    /// The focal length along the y-axis, in pixels.
    pub fy: f64,
    /// The x-coordinate of the principal point (optical center), in pixels.
    pub cx: f64,
    /// The y-coordinate of the principal point (optical center), in pixels.
    pub cy: f64,
}

/// Represents the resolution of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

/// Square crop taken from a native-resolution image before it was resized.
///
/// `cx`, `cy` locate the crop centre in native pixels and `size` is the side
/// length of the crop, also in native pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropDescriptor {
    pub cx: f64,
    pub cy: f64,
    pub size: f64,
}

/// Defines the possible errors that can occur while configuring a camera.
#[derive(thiserror::Error, Debug)]
pub enum CameraError {
    /// One or more sensor parameters are invalid.
    #[error("Invalid camera parameters: {0}")]
    InvalidParams(String),
    /// The sensor YAML could not be parsed or written.
    #[error("Failed to load YAML: {0}")]
    YamlError(String),
    /// Reading or writing a configuration file failed.
    #[error("IO Error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::IOError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CameraError {
    fn from(err: serde_yaml::Error) -> Self {
        CameraError::YamlError(err.to_string())
    }
}

/// Pinhole intrinsics of the sensor at the network input resolution.
///
/// `K` is derived as
///
/// ```text
/// k = [[fpx, 0, nu/2], [0, fpy, nv/2], [0, 0, 1]]
/// S = diag(input_w / source_w, input_h / source_h, 1)
/// K = S · k
/// ```
///
/// where `fpx`, `fpy` are the focal lengths in pixels and `nu`, `nv` the
/// native sensor resolution. `source` is the size of the image that gets
/// resized to `input`; it equals the sensor resolution unless the image was
/// cropped first, see [`Camera::compensate_crop`].
///
/// The principal point may be overwritten after construction. That is the
/// only mutation; callers sharing a camera between threads must sequence it
/// themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    sensor: SensorConfig,
    source_size: Resolution,
    input_size: Resolution,
    k: Matrix3<f64>,
}

impl Camera {
    /// Creates a camera for images of `source_size` pixels resized to `input_size`.
    pub fn new(sensor: SensorConfig, source_size: Resolution, input_size: Resolution) -> Self {
        let k = intrinsics_matrix(&sensor, extent(source_size), input_size);
        debug!(
            "camera for {}x{} -> {}x{}: fx={:.3} fy={:.3} cx={:.3} cy={:.3}",
            source_size.width,
            source_size.height,
            input_size.width,
            input_size.height,
            k[(0, 0)],
            k[(1, 1)],
            k[(0, 2)],
            k[(1, 2)]
        );
        Self {
            sensor,
            source_size,
            input_size,
            k,
        }
    }

    /// Creates a camera for full native-resolution images resized to `input_size`.
    pub fn from_sensor(sensor: SensorConfig, input_size: Resolution) -> Self {
        let source_size = sensor.resolution;
        Self::new(sensor, source_size, input_size)
    }

    /// Creates a camera for a square crop of the native image resized to
    /// `input_size`, with the principal point already compensated.
    ///
    /// `K` scales by `input / crop.size` using the exact, possibly fractional,
    /// crop size. [`Camera::source_size`] reports the crop rounded to whole
    /// pixels.
    pub fn for_crop(sensor: SensorConfig, crop: &CropDescriptor, input_size: Resolution) -> Self {
        let k = intrinsics_matrix(&sensor, [crop.size, crop.size], input_size);
        let side = crop.size.round().max(0.0) as u32;
        let mut camera = Self {
            sensor,
            source_size: Resolution::square(side),
            input_size,
            k,
        };
        camera.compensate_crop(crop);
        camera
    }

    /// Recomputes `K` for a new source/input resolution pair.
    ///
    /// Any principal-point adjustment made earlier is discarded.
    pub fn resize(&mut self, source_size: Resolution, input_size: Resolution) {
        self.source_size = source_size;
        self.input_size = input_size;
        self.k = intrinsics_matrix(&self.sensor, extent(source_size), input_size);
    }

    /// Overwrites the principal point entries `K[0][2]` and `K[1][2]`.
    pub fn set_principal_point(&mut self, cx: f64, cy: f64) {
        self.k[(0, 2)] = cx;
        self.k[(1, 2)] = cy;
    }

    /// Moves the principal point to account for a crop taken before resizing.
    ///
    /// ```text
    /// cx' = (nu/2 + size/2 - crop.cx) * input_w / size
    /// cy' = (nv/2 + size/2 - crop.cy) * input_h / size
    /// ```
    ///
    /// A zero crop size divides by zero; the principal point then becomes
    /// non-finite.
    pub fn compensate_crop(&mut self, crop: &CropDescriptor) {
        let half_u = self.sensor.resolution.width as f64 / 2.0;
        let half_v = self.sensor.resolution.height as f64 / 2.0;
        let cx = (half_u + crop.size / 2.0 - crop.cx) * self.input_size.width as f64 / crop.size;
        let cy = (half_v + crop.size / 2.0 - crop.cy) * self.input_size.height as f64 / crop.size;
        debug!(
            "crop at ({:.1}, {:.1}) size {:.1}: principal point -> ({cx:.3}, {cy:.3})",
            crop.cx,
            crop.cy,
            crop.size
        );
        self.set_principal_point(cx, cy);
    }

    /// The 3×3 intrinsics matrix.
    pub fn k(&self) -> &Matrix3<f64> {
        &self.k
    }

    pub fn intrinsics(&self) -> Intrinsics {
        Intrinsics {
            fx: self.k[(0, 0)],
            fy: self.k[(1, 1)],
            cx: self.k[(0, 2)],
            cy: self.k[(1, 2)],
        }
    }

    pub fn sensor(&self) -> &SensorConfig {
        &self.sensor
    }

    pub fn source_size(&self) -> Resolution {
        self.source_size
    }

    pub fn input_size(&self) -> Resolution {
        self.input_size
    }
}

/// The Tango sensor, full-resolution images resized to 256×256.
impl Default for Camera {
    fn default() -> Self {
        Self::from_sensor(SensorConfig::default(), Resolution::square(256))
    }
}

fn extent(size: Resolution) -> [f64; 2] {
    [size.width as f64, size.height as f64]
}

/// `diag(input / source, 1) · k`, with the source extent in (possibly
/// fractional) native pixels.
fn intrinsics_matrix(
    sensor: &SensorConfig,
    source_extent: [f64; 2],
    input_size: Resolution,
) -> Matrix3<f64> {
    let [fpx, fpy] = sensor.focal_length_pixels();
    let nu = sensor.resolution.width as f64;
    let nv = sensor.resolution.height as f64;

    #[rustfmt::skip]
    let k = Matrix3::new(
        fpx, 0.0, nu / 2.0,
        0.0, fpy, nv / 2.0,
        0.0, 0.0, 1.0,
    );
    let scale = Matrix3::from_diagonal(&Vector3::new(
        input_size.width as f64 / source_extent[0],
        input_size.height as f64 / source_extent[1],
        1.0,
    ));

    scale * k
}

/// Contains unit tests for the camera module.
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TANGO_FOCAL_PIXELS: f64 = 0.0176 / 5.86e-6;

    #[test]
    fn test_unscaled_camera() {
        let sensor = SensorConfig::default();
        let camera = Camera::from_sensor(sensor.clone(), sensor.resolution);
        let intrinsics = camera.intrinsics();

        assert_eq!(intrinsics.cx, 960.0);
        assert_eq!(intrinsics.cy, 600.0);
        assert_relative_eq!(intrinsics.fx, TANGO_FOCAL_PIXELS, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.fy, TANGO_FOCAL_PIXELS, epsilon = 1e-9);
        assert_eq!(camera.k()[(2, 2)], 1.0);
        assert_eq!(camera.k()[(0, 1)], 0.0);
        assert_eq!(camera.k()[(1, 0)], 0.0);
    }

    #[test]
    fn test_half_resolution_halves_intrinsics() {
        let sensor = SensorConfig::default();
        let full = Camera::from_sensor(sensor.clone(), Resolution::new(1920, 1200)).intrinsics();
        let half = Camera::from_sensor(sensor, Resolution::new(960, 600)).intrinsics();

        assert_relative_eq!(half.fx, full.fx * 0.5, epsilon = 1e-9);
        assert_relative_eq!(half.fy, full.fy * 0.5, epsilon = 1e-9);
        assert_relative_eq!(half.cx, full.cx * 0.5, epsilon = 1e-9);
        assert_relative_eq!(half.cy, full.cy * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_default_camera_input_size() {
        let camera = Camera::default();
        let intrinsics = camera.intrinsics();
        assert_eq!(camera.input_size(), Resolution::square(256));
        assert_eq!(camera.source_size(), Resolution::new(1920, 1200));
        assert_relative_eq!(intrinsics.cx, 128.0, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.cy, 128.0, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.fx, TANGO_FOCAL_PIXELS * 256.0 / 1920.0, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.fy, TANGO_FOCAL_PIXELS * 256.0 / 1200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compensate_crop() {
        let input = Resolution::square(256);
        let mut camera = Camera::new(SensorConfig::default(), Resolution::square(800), input);
        let crop = CropDescriptor {
            cx: 1000.0,
            cy: 550.0,
            size: 800.0,
        };
        camera.compensate_crop(&crop);

        let intrinsics = camera.intrinsics();
        assert_relative_eq!(intrinsics.cx, (960.0 + 400.0 - 1000.0) * 256.0 / 800.0, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.cy, (600.0 + 400.0 - 550.0) * 256.0 / 800.0, epsilon = 1e-9);
        // Focal terms only follow the crop-to-input scale.
        assert_relative_eq!(intrinsics.fx, TANGO_FOCAL_PIXELS * 256.0 / 800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_centered_crop_keeps_image_centre() {
        let input = Resolution::square(224);
        let mut camera = Camera::new(SensorConfig::default(), Resolution::square(1200), input);
        camera.compensate_crop(&CropDescriptor {
            cx: 960.0,
            cy: 600.0,
            size: 1200.0,
        });
        assert_relative_eq!(camera.intrinsics().cx, 112.0, epsilon = 1e-9);
        assert_relative_eq!(camera.intrinsics().cy, 112.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fractional_crop_keeps_exact_scale() {
        let input = Resolution::square(256);
        let crop = CropDescriptor {
            cx: 960.0,
            cy: 600.0,
            size: 800.4,
        };
        let camera = Camera::for_crop(SensorConfig::default(), &crop, input);
        let intrinsics = camera.intrinsics();

        assert_eq!(camera.source_size(), Resolution::square(800));
        assert_relative_eq!(intrinsics.fx, TANGO_FOCAL_PIXELS * 256.0 / 800.4, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.fy, TANGO_FOCAL_PIXELS * 256.0 / 800.4, epsilon = 1e-9);
        // A centred crop maps the sensor centre to the input centre.
        assert_relative_eq!(intrinsics.cx, 128.0, epsilon = 1e-9);
        assert_relative_eq!(intrinsics.cy, 128.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_crop_size_is_not_finite() {
        let mut camera = Camera::default();
        camera.compensate_crop(&CropDescriptor {
            cx: 0.0,
            cy: 0.0,
            size: 0.0,
        });
        assert!(!camera.intrinsics().cx.is_finite());
        assert!(!camera.intrinsics().cy.is_finite());
    }

    #[test]
    fn test_resize_recomputes_and_drops_offset() {
        let mut camera = Camera::default();
        camera.set_principal_point(1.0, 2.0);
        assert_eq!(camera.intrinsics().cx, 1.0);

        camera.resize(Resolution::new(1920, 1200), Resolution::new(1920, 1200));
        let expected = Camera::from_sensor(SensorConfig::default(), Resolution::new(1920, 1200));
        assert_eq!(camera, expected);
    }

    #[test]
    fn test_custom_sensor() {
        let sensor = SensorConfig {
            focal_length: [0.008, 0.008],
            pixel_pitch: [4.0e-6, 4.0e-6],
            resolution: Resolution::new(640, 480),
        };
        let camera = Camera::from_sensor(sensor, Resolution::new(640, 480));
        let intrinsics = camera.intrinsics();
        assert_relative_eq!(intrinsics.fx, 2000.0, epsilon = 1e-6);
        assert_relative_eq!(intrinsics.fy, 2000.0, epsilon = 1e-6);
        assert_eq!((intrinsics.cx, intrinsics.cy), (320.0, 240.0));
    }
}
