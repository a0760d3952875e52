//! Renderer side of a texture: upload and release.

use crate::{AssetError, ImageData};
use std::collections::HashMap;
use tracing::{trace, warn};

/// Device that turns pixels into backend texture objects.
pub trait TextureBackend {
    type Handle;

    fn upload(&mut self, name: &str, image: &ImageData) -> Result<Self::Handle, AssetError>;

    fn release(&mut self, handle: Self::Handle);
}

/// Opaque id of a texture held by a [`HeadlessBackend`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HeadlessTexture(u64);

/// Backend with no device behind it. Records what is resident, and how many
/// bytes, so tests and tools can run without a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    resident: HashMap<HeadlessTexture, usize>,
    resident_bytes: usize,
    uploads: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    pub fn resident_bytes(&self) -> usize {
        self.resident_bytes
    }

    /// Uploads performed over the backend's lifetime.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    pub fn is_resident(&self, handle: HeadlessTexture) -> bool {
        self.resident.contains_key(&handle)
    }
}

impl TextureBackend for HeadlessBackend {
    type Handle = HeadlessTexture;

    fn upload(&mut self, name: &str, image: &ImageData) -> Result<Self::Handle, AssetError> {
        let handle = HeadlessTexture(self.next_id);
        self.next_id += 1;

        let bytes = image.pixels().len();
        self.resident.insert(handle, bytes);
        self.resident_bytes += bytes;
        self.uploads += 1;
        trace!(name, bytes, id = handle.0, "uploaded texture");
        Ok(handle)
    }

    fn release(&mut self, handle: Self::Handle) {
        match self.resident.remove(&handle) {
            Some(bytes) => self.resident_bytes -= bytes,
            None => warn!(id = handle.0, "release of a texture the backend does not hold"),
        }
    }
}
