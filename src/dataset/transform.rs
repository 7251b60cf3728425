//! Hook for per-sample preprocessing and augmentation.
//!
//! The dataset does not know what a transform does. It hands over the decoded
//! image with its raw target and stores nothing that comes back. Two optional
//! capabilities let the rest of the crate learn about the transform's output
//! without inspecting its internals:
//!
//! - [`SampleTransform::output_size`]: the resolution the transform produces,
//!   which becomes the dataset's input size.
//! - [`SampleTransform::last_crop`]: the crop applied to the native image
//!   before resizing, used to correct the principal point when drawing.

use image::RgbImage;

use super::{DatasetError, Target};
use crate::camera::{CropDescriptor, Resolution};

/// Turns a decoded sample into what the model consumes.
///
/// Implementations that pick a random crop per call and want to expose it
/// through [`last_crop`](SampleTransform::last_crop) keep it behind interior
/// mutability; the dataset only ever holds a shared reference.
pub trait SampleTransform {
    /// Model-ready representation of the image.
    type Output;

    fn apply(&self, image: RgbImage, target: Target) -> Result<(Self::Output, Target), DatasetError>;

    fn output_size(&self) -> Option<Resolution> {
        None
    }

    fn last_crop(&self) -> Option<CropDescriptor> {
        None
    }
}

/// Passes samples through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl SampleTransform for Identity {
    type Output = RgbImage;

    fn apply(&self, image: RgbImage, target: Target) -> Result<(RgbImage, Target), DatasetError> {
        Ok((image, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        let image = RgbImage::from_pixel(4, 3, image::Rgb([7, 8, 9]));
        let target = Target::Filename("img.jpg".to_string());

        let (out_image, out_target) = Identity.apply(image.clone(), target.clone()).unwrap();
        assert_eq!(out_image, image);
        assert_eq!(out_target, target);
        assert!(Identity.output_size().is_none());
        assert!(Identity.last_crop().is_none());
    }
}
