/// Loads, builds and tears down the objects a [`ResourceCache`](super::ResourceCache) holds.
///
/// The cache owns the bookkeeping; the factory owns everything about what a
/// resource actually is (decoding, GPU upload, backend release).
pub trait ResourceFactory {
    type Resource;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Resource kind used in log lines, e.g. `"texture"`.
    const KIND: &'static str;

    /// Reserved name of the always-resident default resource.
    const DEFAULT_NAME: &'static str;

    /// Build the default resource. Called once, when the cache initializes.
    fn create_default(&mut self) -> Result<Self::Resource, Self::Error>;

    /// Load the resource called `name`.
    fn load(&mut self, name: &str) -> Result<Self::Resource, Self::Error>;

    /// Release everything `resource` holds.
    fn destroy(&mut self, resource: Self::Resource);
}
