use super::ImageLoader;
use crate::{AssetError, ImageData};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Loads `<root>/<name>.<extension>` from disk, decoded to RGBA8.
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    root: PathBuf,
    extension: String,
}

impl ImageDirectory {
    /// PNG files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extension(root, "png")
    }

    pub fn with_extension(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// File backing `name`. Names that are not a single plain path
    /// component are rejected so lookups stay under the root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, AssetError> {
        if !is_plain_file_name(name) {
            warn!(name, root = %self.root.display(), "rejected image name outside the directory");
            return Err(AssetError::InvalidName { name: name.into() });
        }
        Ok(self.root.join(format!("{name}.{}", self.extension)))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl ImageLoader for ImageDirectory {
    fn load_image(&mut self, name: &str) -> Result<ImageData, AssetError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(AssetError::NotFound { name: name.into() });
        }

        let decoded = image::open(&path)
            .map_err(|source| AssetError::Decode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        debug!(name, width, height, path = %path.display(), "decoded image");
        ImageData::new(name, width, height, 4, decoded.into_raw())
    }
}
