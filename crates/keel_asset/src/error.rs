use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("texture name is {length} bytes, longer than the {max} byte limit")]
    NameTooLong { length: usize, max: usize },

    #[error("image name '{name}' is not a plain file name")]
    InvalidName { name: String },

    #[error("no image named '{name}'")]
    NotFound { name: String },

    #[error("failed to decode image '{}'", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image '{name}' is {width}x{height}x{channel_count} but carries {actual} bytes")]
    PixelCountMismatch {
        name: String,
        width: u32,
        height: u32,
        channel_count: u8,
        actual: usize,
    },

    #[error("image '{name}' has no pixels")]
    Empty { name: String },

    #[error("texture upload failed: {reason}")]
    Upload { reason: String },
}
