//! Full processing pipeline:
//! read file -> decode -> EXIF orientation -> four-band posterize -> encode

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};

use crate::error::{HopeifyError, Result};
use crate::exif_orientation::apply_exif_orientation;
use crate::palette::{Palette, HOPE};
use crate::posterize::ChannelPolicy;

#[cfg(not(feature = "parallel"))]
use crate::posterize::posterize as transform;
#[cfg(feature = "parallel")]
use crate::posterize::posterize_par as transform;

/// One input file turned into one poster.
#[derive(Debug, Clone)]
pub struct PosterJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: ImageFormat,
    pub policy: ChannelPolicy,
    pub palette: Palette,
}

impl PosterJob {
    /// Encoder format follows the output extension, JPEG when it has none we know.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        let format = ImageFormat::from_path(&output).unwrap_or(ImageFormat::Jpeg);
        Self {
            input: input.into(),
            output,
            format,
            policy: ChannelPolicy::default(),
            palette: HOPE,
        }
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_policy(mut self, policy: ChannelPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Flat 8-bit samples of `img` and how many make up one pixel.
///
/// 8-bit buffers are borrowed as decoded; anything deeper is narrowed to
/// RGB or RGBA first.
fn samples(img: &DynamicImage) -> (Cow<'_, [u8]>, usize) {
    match img {
        DynamicImage::ImageLuma8(buf) => (Cow::Borrowed(buf.as_raw().as_slice()), 1),
        DynamicImage::ImageLumaA8(buf) => (Cow::Borrowed(buf.as_raw().as_slice()), 2),
        DynamicImage::ImageRgb8(buf) => (Cow::Borrowed(buf.as_raw().as_slice()), 3),
        DynamicImage::ImageRgba8(buf) => (Cow::Borrowed(buf.as_raw().as_slice()), 4),
        other if other.color().has_alpha() => (Cow::Owned(other.to_rgba8().into_raw()), 4),
        other => (Cow::Owned(other.to_rgb8().into_raw()), 3),
    }
}

/// Posterize a decoded image, keeping its width and height.
pub fn posterize_image(
    img: &DynamicImage,
    policy: ChannelPolicy,
    palette: &Palette,
) -> Result<RgbImage> {
    let (width, height) = img.dimensions();
    let (samples, channels) = samples(img);
    log::debug!(
        "Posterizing {}x{} {:?} ({} channels, {:?})",
        width,
        height,
        img.color(),
        channels,
        policy
    );

    let rgb = transform(&samples, channels, policy, palette)?;

    RgbImage::from_raw(width, height, rgb).ok_or(HopeifyError::Dimensions { width, height })
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes)?;
    Ok(apply_exif_orientation(img, &bytes))
}

/// Decode, posterize and encode one file. The poster is returned for display.
pub fn process_file(job: &PosterJob) -> Result<RgbImage> {
    let img = load_image(&job.input)?;
    let poster = posterize_image(&img, job.policy, &job.palette)?;
    poster.save_with_format(&job.output, job.format)?;
    log::debug!("Saved {:?} poster to {}", job.format, job.output.display());
    Ok(poster)
}
