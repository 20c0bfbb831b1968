use crate::band::Band;

/// The four poster tones, one per intensity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub shadow: [u8; 3],
    pub low: [u8; 3],
    pub high: [u8; 3],
    pub highlight: [u8; 3],
}

impl Palette {
    pub const fn new(shadow: [u8; 3], low: [u8; 3], high: [u8; 3], highlight: [u8; 3]) -> Self {
        Self {
            shadow,
            low,
            high,
            highlight,
        }
    }

    pub const fn color(&self, band: Band) -> [u8; 3] {
        match band {
            Band::Shadow => self.shadow,
            Band::Low => self.low,
            Band::High => self.high,
            Band::Highlight => self.highlight,
        }
    }

    pub fn colors(&self) -> [[u8; 3]; 4] {
        Band::ALL.map(|band| self.color(band))
    }

    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        self.colors().contains(&rgb)
    }
}

impl Default for Palette {
    fn default() -> Self {
        HOPE
    }
}

pub const DARK_BLUE: [u8; 3] = [0, 51, 76];
pub const RED: [u8; 3] = [217, 26, 33];
pub const LIGHT_BLUE: [u8; 3] = [112, 150, 158];
pub const YELLOW: [u8; 3] = [252, 227, 166];

// Campaign-poster tones, darkest to brightest
pub const HOPE: Palette = Palette::new(DARK_BLUE, RED, LIGHT_BLUE, YELLOW);
