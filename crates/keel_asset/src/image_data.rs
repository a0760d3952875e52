//! Decoded pixel payloads.

use crate::AssetError;

/// Tightly packed 8-bit pixels, row-major, `channel_count` bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    channel_count: u8,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap `pixels`, checking they match the stated dimensions.
    pub fn new(
        name: &str,
        width: u32,
        height: u32,
        channel_count: u8,
        pixels: Vec<u8>,
    ) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * channel_count as usize;
        if expected == 0 {
            return Err(AssetError::Empty { name: name.into() });
        }
        if pixels.len() != expected {
            return Err(AssetError::PixelCountMismatch {
                name: name.into(),
                width,
                height,
                channel_count,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channel_count,
            pixels,
        })
    }

    /// Square RGBA checkerboard alternating blue and white, blue in the corner.
    pub fn checkerboard(dimension: u32) -> Self {
        let channels = 4;
        let mut pixels = vec![255u8; dimension as usize * dimension as usize * channels];
        for (index, pixel) in pixels.chunks_exact_mut(channels).enumerate() {
            let row = index / dimension as usize;
            let col = index % dimension as usize;
            if row % 2 == col % 2 {
                pixel[0] = 0;
                pixel[1] = 0;
            }
        }
        Self {
            width: dimension,
            height: dimension,
            channel_count: channels as u8,
            pixels,
        }
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

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether any pixel's alpha is below 255. Images without a fourth
    /// channel are opaque.
    pub fn has_transparency(&self) -> bool {
        if self.channel_count < 4 {
            return false;
        }
        self.pixels
            .chunks_exact(self.channel_count as usize)
            .any(|pixel| pixel[3] < 255)
    }
}
