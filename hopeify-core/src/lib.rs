pub mod band;
pub mod error;
pub mod exif_orientation;
pub mod palette;
pub mod pipeline;
pub mod posterize;

pub use error::{HopeifyError, Result};
