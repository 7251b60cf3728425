//! Annotation records and the ordered sample index built from them.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use nalgebra::{Vector3, Vector4};
use serde::{Deserialize, Serialize};

use super::{DatasetError, Split};
use crate::geometry::Pose;

/// Ground truth attached to a labeled sample.
///
/// Field names on disk follow the SPEED annotation schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseLabel {
    /// Attitude quaternion, scalar first.
    #[serde(rename = "q_vbs2tango")]
    pub q: [f64; 4],
    /// Body origin in the camera frame, in metres.
    #[serde(rename = "r_Vo2To_vbs_true")]
    pub r: [f64; 3],
    pub bbox: [f64; 4],
    pub wireframe: Vec<f64>,
}

impl PoseLabel {
    /// Concatenates `q`, `r`, `bbox` and `wireframe` into one vector.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(11 + self.wireframe.len());
        values.extend_from_slice(&self.q);
        values.extend_from_slice(&self.r);
        values.extend_from_slice(&self.bbox);
        values.extend_from_slice(&self.wireframe);
        values
    }

    pub fn pose(&self) -> Pose {
        Pose::new(Vector4::from(self.q), Vector3::from(self.r))
    }
}

/// A labeled record as stored in `train.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub filename: String,
    #[serde(flatten)]
    pub label: PoseLabel,
}

#[derive(Deserialize)]
struct FilenameRecord {
    filename: String,
}

/// Ordered, read-only list of samples of one split.
///
/// Labeled splits keep their pose labels next to each file name; unlabeled
/// splits only know file names, so there is no label to read by mistake.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleIndex {
    Labeled(Vec<LabeledSample>),
    Unlabeled(Vec<String>),
}

impl SampleIndex {
    /// Reads `<annotations_root>/<split>.json`.
    ///
    /// # Errors
    ///
    /// * `IOError` if the file cannot be read.
    /// * `JsonError` if it is not an array of records with the keys the split
    ///   requires (`filename`, plus the pose keys for `train`).
    pub fn load(split: Split, annotations_root: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = annotations_root.as_ref().join(split.annotation_file());
        let contents = fs::read_to_string(&path)
            .map_err(|e| DatasetError::IOError(format!("{}: {e}", path.display())))?;
        let json_error = |e: serde_json::Error| DatasetError::JsonError(format!("{}: {e}", path.display()));

        let index = if split.is_labeled() {
            let records: Vec<LabeledSample> = serde_json::from_str(&contents).map_err(json_error)?;
            SampleIndex::Labeled(records)
        } else {
            let records: Vec<FilenameRecord> = serde_json::from_str(&contents).map_err(json_error)?;
            SampleIndex::Unlabeled(records.into_iter().map(|r| r.filename).collect())
        };

        info!("read {} {} annotations from {}", index.len(), split, path.display());
        Ok(index)
    }

    pub fn len(&self) -> usize {
        match self {
            SampleIndex::Labeled(samples) => samples.len(),
            SampleIndex::Unlabeled(filenames) => filenames.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, SampleIndex::Labeled(_))
    }

    pub fn filename(&self, index: usize) -> Option<&str> {
        match self {
            SampleIndex::Labeled(samples) => samples.get(index).map(|s| s.filename.as_str()),
            SampleIndex::Unlabeled(filenames) => filenames.get(index).map(String::as_str),
        }
    }

    /// The label of sample `index`, `None` for unlabeled splits or out of range.
    pub fn label(&self, index: usize) -> Option<&PoseLabel> {
        match self {
            SampleIndex::Labeled(samples) => samples.get(index).map(|s| &s.label),
            SampleIndex::Unlabeled(_) => None,
        }
    }

    pub fn filenames(&self) -> Vec<&str> {
        (0..self.len()).filter_map(|i| self.filename(i)).collect()
    }

    /// Keeps the first `len` samples. A longer `len` keeps everything.
    pub fn truncate(self, len: usize) -> Self {
        if len > self.len() {
            warn!(
                "split index {len} exceeds the {} available samples, keeping all",
                self.len()
            );
        }
        match self {
            SampleIndex::Labeled(mut samples) => {
                samples.truncate(len);
                SampleIndex::Labeled(samples)
            }
            SampleIndex::Unlabeled(mut filenames) => {
                filenames.truncate(len);
                SampleIndex::Unlabeled(filenames)
            }
        }
    }

    /// Reduces the index to sample `index` alone.
    pub fn select(self, index: usize) -> Result<Self, DatasetError> {
        let len = self.len();
        let out_of_range = DatasetError::IndexOutOfRange { index, len };
        match self {
            SampleIndex::Labeled(mut samples) => {
                if index >= len {
                    return Err(out_of_range);
                }
                Ok(SampleIndex::Labeled(vec![samples.swap_remove(index)]))
            }
            SampleIndex::Unlabeled(mut filenames) => {
                if index >= len {
                    return Err(out_of_range);
                }
                Ok(SampleIndex::Unlabeled(vec![filenames.swap_remove(index)]))
            }
        }
    }

    /// Applies the post-load reductions. `sanity_check` takes precedence.
    pub fn reduce(
        self,
        split_index: Option<usize>,
        sanity_check: Option<usize>,
    ) -> Result<Self, DatasetError> {
        match (sanity_check, split_index) {
            (Some(sample), _) => self.select(sample),
            (None, Some(len)) => Ok(self.truncate(len)),
            (None, None) => Ok(self),
        }
    }
}

/// File names of every split plus the train labels keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct Partitions {
    pub train: Vec<String>,
    pub test: Vec<String>,
    pub real_test: Vec<String>,
    pub labels: HashMap<String, PoseLabel>,
}

impl Partitions {
    pub fn filenames(&self, split: Split) -> &[String] {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
            Split::RealTest => &self.real_test,
        }
    }
}

/// Reads the annotation files of all three splits from `root`.
pub fn load_partitions(root: impl AsRef<Path>) -> Result<Partitions, DatasetError> {
    let root = root.as_ref();
    let mut partitions = Partitions::default();

    for split in Split::ALL {
        match SampleIndex::load(split, root)? {
            SampleIndex::Labeled(samples) => {
                for sample in samples {
                    partitions.train.push(sample.filename.clone());
                    partitions.labels.insert(sample.filename, sample.label);
                }
            }
            SampleIndex::Unlabeled(filenames) => match split {
                Split::Test => partitions.test = filenames,
                Split::RealTest => partitions.real_test = filenames,
                Split::Train => partitions.train = filenames,
            },
        }
    }

    Ok(partitions)
}
