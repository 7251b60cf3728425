//! SPEED annotation loading and the indexed sample store.
//!
//! A split (`train`, `test` or `real_test`) is described by one JSON array of
//! records under the annotations root. Only `train` carries pose labels; the
//! other two list file names only. Images live under
//! `<speed_root>/images/<split>/<filename>`.
//!
//! Submodules:
//! - `index`: annotation records, [`PoseLabel`] and the [`SampleIndex`].
//! - `transform`: the [`SampleTransform`] hook applied to every fetched sample.
//! - `speed`: [`SpeedDataset`], the random-access store used by training code.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::camera::{Resolution, SensorConfig};

pub mod index;
pub mod speed;
pub mod transform;

pub use index::{load_partitions, LabeledSample, Partitions, PoseLabel, SampleIndex};
pub use speed::{SpeedDataset, Target};
pub use transform::{Identity, SampleTransform};

/// One of the three published SPEED splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    Train,
    Test,
    RealTest,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Test, Split::RealTest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::RealTest => "real_test",
        }
    }

    /// Whether the split's annotations carry pose labels.
    pub fn is_labeled(&self) -> bool {
        matches!(self, Split::Train)
    }

    /// File name of the split's annotation array.
    pub fn annotation_file(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "test" => Ok(Split::Test),
            "real_test" => Ok(Split::RealTest),
            _ => Err(DatasetError::InvalidSplit(s.to_string())),
        }
    }
}

/// Errors raised while building or reading a dataset.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The split name is not one of `train`, `test`, `real_test`.
    #[error("Invalid split '{0}', has to be either 'train', 'test' or 'real_test'")]
    InvalidSplit(String),
    /// A sample index past the end of the dataset.
    #[error("Sample index {index} out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },
    /// An annotation file could not be read.
    #[error("IO Error: {0}")]
    IOError(String),
    /// An annotation file is not valid JSON or misses required keys.
    #[error("Malformed annotations: {0}")]
    JsonError(String),
    /// An image file is missing or could not be decoded.
    #[error("Failed to load image: {0}")]
    ImageError(String),
    /// The injected transform rejected a sample.
    #[error("Transform failed: {0}")]
    TransformError(String),
}

/// Where to find a dataset and how to reduce it after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Root holding `images/<split>/`.
    pub speed_root: PathBuf,
    /// Directory holding `<split>.json`.
    pub annotations_root: PathBuf,
    /// Network input size, used when the transform does not report one.
    pub input_size: Resolution,
    /// Keep only the first `n` samples (train/validation split).
    pub split_index: Option<usize>,
    /// Keep only sample `i` (overfitting check). Wins over `split_index`.
    pub sanity_check: Option<usize>,
    /// Sensor that captured the images.
    pub sensor: SensorConfig,
}

impl DatasetConfig {
    pub fn new(speed_root: impl Into<PathBuf>, annotations_root: impl Into<PathBuf>) -> Self {
        Self {
            speed_root: speed_root.into(),
            annotations_root: annotations_root.into(),
            ..Self::default()
        }
    }

    pub fn with_input_size(mut self, input_size: Resolution) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn with_split_index(mut self, split_index: usize) -> Self {
        self.split_index = Some(split_index);
        self
    }

    pub fn with_sanity_check(mut self, sample: usize) -> Self {
        self.sanity_check = Some(sample);
        self
    }

    pub fn with_sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensor = sensor;
        self
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            speed_root: PathBuf::new(),
            annotations_root: PathBuf::new(),
            input_size: Resolution::square(256),
            split_index: None,
            sanity_check: None,
            sensor: SensorConfig::default(),
        }
    }
}
