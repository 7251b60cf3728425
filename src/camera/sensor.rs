//! Physical sensor description and its YAML configuration file.
//!
//! ```yaml
//! sensor:
//!   focal_length: [0.0176, 0.0176]
//!   pixel_pitch: [5.86e-6, 5.86e-6]
//!   resolution: { width: 1920, height: 1200 }
//! ```

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{CameraError, Resolution};

/// Optics and pixel grid of a physical camera sensor.
///
/// The default is the Tango spacecraft camera that produced the SPEED images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Focal length along x and y, in metres.
    pub focal_length: [f64; 2],
    /// Pixel pitch along x and y, in metres per pixel.
    pub pixel_pitch: [f64; 2],
    /// Native sensor resolution (`nu` × `nv`).
    pub resolution: Resolution,
}

#[derive(Serialize, Deserialize)]
struct SensorFile {
    sensor: SensorConfig,
}

impl SensorConfig {
    /// Focal lengths expressed in pixels (`focal_length / pixel_pitch`).
    pub fn focal_length_pixels(&self) -> [f64; 2] {
        [
            self.focal_length[0] / self.pixel_pitch[0],
            self.focal_length[1] / self.pixel_pitch[1],
        ]
    }

    /// Checks that the optics are positive and finite and the resolution is non-empty.
    pub fn validate(&self) -> Result<(), CameraError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !self.focal_length.iter().all(|&f| positive(f)) {
            return Err(CameraError::InvalidParams(format!(
                "focal length must be positive, got {:?}",
                self.focal_length
            )));
        }
        if !self.pixel_pitch.iter().all(|&p| positive(p)) {
            return Err(CameraError::InvalidParams(format!(
                "pixel pitch must be positive, got {:?}",
                self.pixel_pitch
            )));
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(CameraError::InvalidParams(format!(
                "resolution must be non-empty, got {}x{}",
                self.resolution.width, self.resolution.height
            )));
        }
        Ok(())
    }

    /// Loads and validates a sensor description from a YAML file.
    ///
    /// # Errors
    ///
    /// * `IOError` if the file cannot be read.
    /// * `YamlError` if the `sensor` node is missing or malformed.
    /// * `InvalidParams` if the values fail [`SensorConfig::validate`].
    pub fn load_from_yaml(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let file: SensorFile = serde_yaml::from_str(&contents)?;
        file.sensor.validate()?;

        info!("loaded sensor config from {}: {:?}", path.display(), file.sensor);
        Ok(file.sensor)
    }

    /// Writes the sensor description to a YAML file, creating parent directories.
    pub fn save_to_yaml(&self, path: impl AsRef<Path>) -> Result<(), CameraError> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(&SensorFile {
            sensor: self.clone(),
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, yaml)?;

        info!("saved sensor config to {}", path.display());
        Ok(())
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            focal_length: [0.0176, 0.0176],
            pixel_pitch: [5.86e-6, 5.86e-6],
            resolution: Resolution::new(1920, 1200),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tango_sensor() {
        let sensor = SensorConfig::load_from_yaml("samples/tango_sensor.yaml").unwrap();
        assert_eq!(sensor, SensorConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let output_path = "output/test_sensor_round_trip.yaml";
        let sensor = SensorConfig {
            focal_length: [0.012, 0.0125],
            pixel_pitch: [3.45e-6, 3.45e-6],
            resolution: Resolution::new(2448, 2048),
        };

        sensor.save_to_yaml(output_path).unwrap();
        let reloaded = SensorConfig::load_from_yaml(output_path).unwrap();
        assert_eq!(sensor, reloaded);

        fs::remove_file(output_path).ok();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut sensor = SensorConfig::default();
        sensor.pixel_pitch[1] = 0.0;
        assert!(matches!(sensor.validate(), Err(CameraError::InvalidParams(_))));

        let mut sensor = SensorConfig::default();
        sensor.focal_length[0] = f64::NAN;
        assert!(sensor.validate().is_err());

        let mut sensor = SensorConfig::default();
        sensor.resolution.height = 0;
        assert!(sensor.validate().is_err());

        assert!(SensorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_and_bad_yaml() {
        assert!(matches!(
            SensorConfig::load_from_yaml("samples/does_not_exist.yaml"),
            Err(CameraError::IOError(_))
        ));

        let output_path = "output/test_sensor_bad.yaml";
        fs::create_dir_all("output").ok();
        fs::write(output_path, "camera:\n  focal_length: 3\n").unwrap();
        assert!(matches!(
            SensorConfig::load_from_yaml(output_path),
            Err(CameraError::YamlError(_))
        ));
        fs::remove_file(output_path).ok();
    }
}
