//! Decoded, displayable media assets.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;

use crate::api::DecodeError;

/// A fully decoded bitmap, ready for immediate display.
///
/// Internally `Arc`-backed: clones are cheap, which lets the cache hand
/// the same decoded pixels to any number of concurrent readers. An asset
/// is immutable once constructed - there is no partially decoded state.
#[derive(Clone)]
pub struct Asset {
    image: Arc<DynamicImage>,
}

impl Asset {
    /// Decode raw fetched bytes into an asset.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_image(image))
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Approximate decoded size, used to weigh cache entries.
    pub fn byte_estimate(&self) -> usize {
        self.width() as usize * self.height() as usize * 4
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image) || self.image.as_ref() == other.image.as_ref()
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
