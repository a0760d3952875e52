//! Textures and the cache that owns them.

use crate::backend::TextureBackend;
use crate::loader::ImageLoader;
use crate::{AssetError, ImageData};
use keel_core::resource::{ResourceCache, ResourceCacheConfig, ResourceFactory};
use tracing::{debug, trace};

/// Reserved name of the built-in checkerboard.
pub const DEFAULT_TEXTURE_NAME: &str = "default";

/// Longest accepted texture name, in bytes.
pub const TEXTURE_NAME_MAX_LENGTH: usize = 512;

/// Edge length of the default texture.
pub const DEFAULT_TEXTURE_DIMENSION: u32 = 256;

/// A texture resident on the backend.
#[derive(Debug)]
pub struct Texture<H> {
    name: String,
    width: u32,
    height: u32,
    channel_count: u8,
    has_transparency: bool,
    backend: H,
}

impl<H> Texture<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    pub fn has_transparency(&self) -> bool {
        self.has_transparency
    }

    /// Backend object the renderer binds.
    pub fn backend(&self) -> &H {
        &self.backend
    }
}

/// Builds textures from a loader and a backend.
pub struct TextureFactory<L, B> {
    loader: L,
    backend: B,
}

impl<L: ImageLoader, B: TextureBackend> TextureFactory<L, B> {
    pub fn new(loader: L, backend: B) -> Self {
        Self { loader, backend }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn create(&mut self, name: &str, image: &ImageData) -> Result<Texture<B::Handle>, AssetError> {
        let backend = self.backend.upload(name, image)?;
        Ok(Texture {
            name: name.to_owned(),
            width: image.width(),
            height: image.height(),
            channel_count: image.channel_count(),
            has_transparency: image.has_transparency(),
            backend,
        })
    }
}

impl<L: ImageLoader, B: TextureBackend> ResourceFactory for TextureFactory<L, B> {
    type Resource = Texture<B::Handle>;
    type Error = AssetError;
    const KIND: &'static str = "texture";
    const DEFAULT_NAME: &'static str = DEFAULT_TEXTURE_NAME;

    fn create_default(&mut self) -> Result<Self::Resource, Self::Error> {
        trace!("Creating default texture...");
        // Generated in code so the engine has no asset dependency.
        let image = ImageData::checkerboard(DEFAULT_TEXTURE_DIMENSION);
        self.create(DEFAULT_TEXTURE_NAME, &image)
    }

    fn load(&mut self, name: &str) -> Result<Self::Resource, Self::Error> {
        if name.len() > TEXTURE_NAME_MAX_LENGTH {
            return Err(AssetError::NameTooLong {
                length: name.len(),
                max: TEXTURE_NAME_MAX_LENGTH,
            });
        }
        let image = self.loader.load_image(name)?;
        let texture = self.create(name, &image)?;
        debug!(
            name,
            width = texture.width,
            height = texture.height,
            has_transparency = texture.has_transparency,
            "texture loaded"
        );
        Ok(texture)
    }

    fn destroy(&mut self, texture: Self::Resource) {
        trace!(name = %texture.name, "destroying texture");
        self.backend.release(texture.backend);
    }
}

/// Reference-counted texture cache.
pub type TextureSystem<'a, L, B> = ResourceCache<'a, TextureFactory<L, B>>;

/// Cache config for `max_texture_count` textures.
pub fn texture_system_config<L: ImageLoader, B: TextureBackend>(
    max_texture_count: u32,
    loader: L,
    backend: B,
) -> ResourceCacheConfig<TextureFactory<L, B>> {
    ResourceCacheConfig::new(max_texture_count, TextureFactory::new(loader, backend))
}
