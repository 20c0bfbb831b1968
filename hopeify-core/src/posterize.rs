//! Replace every pixel of an interleaved 8-bit buffer with one of the four
//! palette tones, chosen by the band its channel sum falls in.
//!
//! Output is always packed RGB, three bytes per input pixel, in input order.

use crate::band::{intensity, Band};
use crate::error::{HopeifyError, Result};
use crate::palette::{Palette, HOPE};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Which channels of a pixel count towards its intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPolicy {
    /// Sum color only. Alpha is dropped, and a lone luma sample counts once
    /// per RGB channel so gray lands in the same band as the equal RGB gray.
    #[default]
    ColorOnly,
    /// Sum every decoded channel as-is, alpha included.
    AllChannels,
}

impl ChannelPolicy {
    pub fn intensity(self, pixel: &[u8]) -> u32 {
        match (self, pixel) {
            (ChannelPolicy::AllChannels, _) => intensity(pixel),
            (ChannelPolicy::ColorOnly, [l] | [l, _]) => *l as u32 * 3,
            (ChannelPolicy::ColorOnly, [r, g, b, ..]) => intensity(&[*r, *g, *b]),
            (ChannelPolicy::ColorOnly, []) => 0,
        }
    }
}

/// Classify one pixel by the literal sum of all its channels into the HOPE palette.
pub fn classify(pixel: &[u8]) -> [u8; 3] {
    HOPE.color(Band::from_intensity(intensity(pixel)))
}

pub fn classify_with(pixel: &[u8], policy: ChannelPolicy, palette: &Palette) -> [u8; 3] {
    palette.color(Band::from_intensity(policy.intensity(pixel)))
}

fn check_shape(samples: &[u8], channels: usize) -> Result<()> {
    if !(1..=4).contains(&channels) {
        return Err(HopeifyError::UnsupportedChannels(channels));
    }
    if samples.len() % channels != 0 {
        return Err(HopeifyError::BufferShape {
            len: samples.len(),
            channels,
        });
    }
    Ok(())
}

pub fn posterize(
    samples: &[u8],
    channels: usize,
    policy: ChannelPolicy,
    palette: &Palette,
) -> Result<Vec<u8>> {
    check_shape(samples, channels)?;

    let mut rgb = vec![0u8; samples.len() / channels * 3];
    for (pixel, out) in samples.chunks_exact(channels).zip(rgb.chunks_exact_mut(3)) {
        out.copy_from_slice(&classify_with(pixel, policy, palette));
    }

    Ok(rgb)
}

/// Same result as [`posterize`], computed across the rayon pool.
#[cfg(feature = "parallel")]
pub fn posterize_par(
    samples: &[u8],
    channels: usize,
    policy: ChannelPolicy,
    palette: &Palette,
) -> Result<Vec<u8>> {
    check_shape(samples, channels)?;

    let mut rgb = vec![0u8; samples.len() / channels * 3];
    samples
        .par_chunks_exact(channels)
        .zip(rgb.par_chunks_exact_mut(3))
        .for_each(|(pixel, out)| out.copy_from_slice(&classify_with(pixel, policy, palette)));

    Ok(rgb)
}
