//! Random-access SPEED dataset.

use std::path::PathBuf;

use image::RgbImage;
use log::{debug, info};

use super::transform::{Identity, SampleTransform};
use super::{DatasetConfig, DatasetError, SampleIndex, Split};
use crate::camera::{Resolution, SensorConfig};
use crate::geometry::Pose;
use crate::util::{Canvas, PoseVisualizer, UtilError};

/// What a sample is paired with: the flat label vector on labeled splits,
/// the file name otherwise.
///
/// The label vector is `q(4) ‖ r(3) ‖ bbox(4) ‖ wireframe(n)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Label(Vec<f64>),
    Filename(String),
}

impl Target {
    pub fn as_label(&self) -> Option<&[f64]> {
        match self {
            Target::Label(values) => Some(values),
            Target::Filename(_) => None,
        }
    }

    pub fn as_filename(&self) -> Option<&str> {
        match self {
            Target::Label(_) => None,
            Target::Filename(name) => Some(name),
        }
    }

    /// The pose at the head of a label vector.
    pub fn pose(&self) -> Option<Pose> {
        self.as_label().and_then(Pose::from_target)
    }
}

/// Indexed access to the images and targets of one split.
///
/// The sample index is fixed at construction. Fetching a sample decodes its
/// image from disk (grayscale files are expanded to RGB) and runs it through
/// the transform. Nothing is cached, so a shared dataset can be read from
/// several threads when the transform allows it.
///
/// # Examples
///
/// ```rust,no_run
/// use speed_pose::dataset::{DatasetConfig, SpeedDataset};
///
/// let config = DatasetConfig::new("/data/speed", "/data/speed").with_split_index(9000);
/// let dataset = SpeedDataset::new("train", &config)?;
/// let (image, target) = dataset.get(0)?;
/// println!("{}x{} {:?}", image.width(), image.height(), target.pose());
/// # Ok::<(), speed_pose::dataset::DatasetError>(())
/// ```
#[derive(Debug)]
pub struct SpeedDataset<T = Identity> {
    split: Split,
    index: SampleIndex,
    image_root: PathBuf,
    input_size: Resolution,
    sensor: SensorConfig,
    transform: T,
}

impl SpeedDataset<Identity> {
    /// Loads `split` without a transform; samples come back as RGB images.
    pub fn new(split: &str, config: &DatasetConfig) -> Result<Self, DatasetError> {
        Self::with_transform(split, config, Identity)
    }
}

impl<T: SampleTransform> SpeedDataset<T> {
    /// Loads `split` and applies `transform` to every fetched sample.
    ///
    /// # Errors
    ///
    /// * `InvalidSplit` if `split` is not `train`, `test` or `real_test`.
    /// * `IOError` / `JsonError` if the annotation file cannot be read.
    /// * `IndexOutOfRange` if `config.sanity_check` is past the end.
    pub fn with_transform(split: &str, config: &DatasetConfig, transform: T) -> Result<Self, DatasetError> {
        let split: Split = split.parse()?;

        let index = SampleIndex::load(split, &config.annotations_root)?
            .reduce(config.split_index, config.sanity_check)?;
        let image_root = config.speed_root.join("images").join(split.as_str());
        let input_size = transform.output_size().unwrap_or(config.input_size);

        info!(
            "{split} dataset: {} samples, images under {}, input size {}x{}",
            index.len(),
            image_root.display(),
            input_size.width,
            input_size.height
        );

        Ok(Self {
            split,
            index,
            image_root,
            input_size,
            sensor: config.sensor.clone(),
            transform,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn split(&self) -> Split {
        self.split
    }

    pub fn index(&self) -> &SampleIndex {
        &self.index
    }

    pub fn input_size(&self) -> Resolution {
        self.input_size
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn image_path(&self, idx: usize) -> Result<PathBuf, DatasetError> {
        let filename = self.index.filename(idx).ok_or(DatasetError::IndexOutOfRange {
            index: idx,
            len: self.len(),
        })?;
        Ok(self.image_root.join(filename))
    }

    /// The untransformed target of sample `idx`.
    pub fn target(&self, idx: usize) -> Result<Target, DatasetError> {
        let out_of_range = || DatasetError::IndexOutOfRange {
            index: idx,
            len: self.len(),
        };
        match &self.index {
            SampleIndex::Labeled(samples) => {
                let sample = samples.get(idx).ok_or_else(out_of_range)?;
                Ok(Target::Label(sample.label.to_vector()))
            }
            SampleIndex::Unlabeled(filenames) => {
                let filename = filenames.get(idx).ok_or_else(out_of_range)?;
                Ok(Target::Filename(filename.clone()))
            }
        }
    }

    /// Decodes the image of sample `idx` as 8-bit RGB.
    pub fn load_image(&self, idx: usize) -> Result<RgbImage, DatasetError> {
        let path = self.image_path(idx)?;
        debug!("loading {}", path.display());
        let image = image::open(&path)
            .map_err(|e| DatasetError::ImageError(format!("{}: {e}", path.display())))?;
        Ok(image.to_rgb8())
    }

    /// Fetches sample `idx` through the transform.
    pub fn get(&self, idx: usize) -> Result<(T::Output, Target), DatasetError> {
        let target = self.target(idx)?;
        let image = self.load_image(idx)?;
        self.transform.apply(image, target)
    }

    /// Fetches every sample in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<(T::Output, Target), DatasetError>> + '_ {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    /// A visualizer matching this dataset's sensor and input size.
    pub fn visualizer(&self) -> PoseVisualizer {
        PoseVisualizer::new(self.sensor.clone(), self.input_size)
    }

    /// Draws `image` with the pose in `target` overlaid.
    ///
    /// The camera principal point is corrected with the transform's last crop
    /// when it reports one. `factor` rescales the drawn axes; `wireframe` adds
    /// the body box.
    pub fn visualize<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        image: &RgbImage,
        target: &Target,
        factor: f64,
        wireframe: bool,
    ) -> Result<(), UtilError> {
        let pose = target.pose().ok_or_else(|| {
            UtilError::InvalidParams("target carries no pose to visualize".to_string())
        })?;
        let crop = self.transform.last_crop();

        self.visualizer()
            .with_axis_scale(factor)
            .with_wireframe(wireframe)
            .render(canvas, image, &pose, crop.as_ref());
        Ok(())
    }
}
