use super::ImageLoader;
use crate::{AssetError, ImageData};
use std::collections::HashMap;

/// Images registered up front and served from memory.
#[derive(Debug, Clone, Default)]
pub struct ImageLibrary {
    images: HashMap<String, ImageData>,
    loads: usize,
}

impl ImageLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, image: ImageData) -> &mut Self {
        self.images.insert(name.into(), image);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// Successful loads served so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl ImageLoader for ImageLibrary {
    fn load_image(&mut self, name: &str) -> Result<ImageData, AssetError> {
        let image = self
            .images
            .get(name)
            .cloned()
            .ok_or_else(|| AssetError::NotFound { name: name.into() })?;
        self.loads += 1;
        Ok(image)
    }
}
