//! Keel Asset Pipeline
//!
//! Texture loading and management on top of the core resource cache.

mod backend;
mod error;
mod image_data;
pub mod loader;
mod texture;

pub use backend::{HeadlessBackend, HeadlessTexture, TextureBackend};
pub use error::AssetError;
pub use image_data::ImageData;
pub use loader::{ImageDirectory, ImageLibrary, ImageLoader};
pub use texture::{
    texture_system_config, Texture, TextureFactory, TextureSystem, DEFAULT_TEXTURE_DIMENSION,
    DEFAULT_TEXTURE_NAME, TEXTURE_NAME_MAX_LENGTH,
};
