//! Image sources the texture system decodes from.

mod directory;
mod library;

pub use directory::ImageDirectory;
pub use library::ImageLibrary;

use crate::{AssetError, ImageData};

/// Produces decoded pixels for a texture name.
pub trait ImageLoader {
    fn load_image(&mut self, name: &str) -> Result<ImageData, AssetError>;
}
