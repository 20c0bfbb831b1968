//! Intensity bands for the four-tone poster.
//!
//! Intensity is the plain sum of a pixel's channels, so for 8-bit RGB it
//! spans 0..=765. Each band is half-open on its upper edge:
//!
//! - intensity < 182 -> Shadow
//! - 182 <= intensity < 364 -> Low
//! - 364 <= intensity < 546 -> High
//! - intensity >= 546 -> Highlight

/// First intensity of the `Low` band.
pub const LOW_FLOOR: u32 = 182;
/// First intensity of the `High` band.
pub const HIGH_FLOOR: u32 = 364;
/// First intensity of the `Highlight` band.
pub const HIGHLIGHT_FLOOR: u32 = 546;

const _: () = assert!(
    0 < LOW_FLOOR && LOW_FLOOR < HIGH_FLOOR && HIGH_FLOOR < HIGHLIGHT_FLOOR,
    "band floors must be strictly ascending"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    Shadow,
    Low,
    High,
    Highlight,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Shadow, Band::Low, Band::High, Band::Highlight];

    pub const fn from_intensity(intensity: u32) -> Self {
        match intensity {
            0..LOW_FLOOR => Band::Shadow,
            LOW_FLOOR..HIGH_FLOOR => Band::Low,
            HIGH_FLOOR..HIGHLIGHT_FLOOR => Band::High,
            HIGHLIGHT_FLOOR.. => Band::Highlight,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Sum of every sample in `channels`.
#[inline]
pub fn intensity(channels: &[u8]) -> u32 {
    channels.iter().map(|&c| c as u32).sum()
}
