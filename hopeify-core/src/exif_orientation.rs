//! Upright photographs before posterizing them.
//!
//! Cameras store the sensor image as captured and record how to display it
//! in the EXIF Orientation tag (1..=8). Tag 1 and anything unreadable leave
//! the image untouched.

use image::DynamicImage;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Orientation::Normal),
            2 => Some(Orientation::FlipHorizontal),
            3 => Some(Orientation::Rotate180),
            4 => Some(Orientation::FlipVertical),
            5 => Some(Orientation::Transpose),
            6 => Some(Orientation::Rotate90),
            7 => Some(Orientation::Transverse),
            8 => Some(Orientation::Rotate270),
            _ => None,
        }
    }

    /// Turn a stored image into its display orientation.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Normal => img,
            Orientation::FlipHorizontal => img.fliph(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::FlipVertical => img.flipv(),
            Orientation::Transpose => img.rotate270().fliph(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Transverse => img.rotate90().fliph(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}

/// Orientation recorded in an encoded file, if any.
pub fn read_orientation(bytes: &[u8]) -> Option<Orientation> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    Orientation::from_tag(field.value.get_uint(0)?)
}

pub fn apply_exif_orientation(img: DynamicImage, bytes: &[u8]) -> DynamicImage {
    match read_orientation(bytes) {
        Some(orientation) if orientation != Orientation::Normal => {
            log::debug!("Applying EXIF orientation {:?}", orientation);
            orientation.apply(img)
        }
        _ => img,
    }
}
