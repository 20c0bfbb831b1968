pub type Result<T> = std::result::Result<T, HopeifyError>;

#[derive(thiserror::Error, Debug)]
pub enum HopeifyError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unsupported channel count {0}: expected 1 to 4")]
    UnsupportedChannels(usize),
    #[error("Buffer of {len} samples is not a whole number of {channels}-channel pixels")]
    BufferShape { len: usize, channels: usize },
    #[error("Output buffer does not fit {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}
