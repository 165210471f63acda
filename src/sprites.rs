//! Charge sprite images.
//!
//! The two 50 px sprites are compiled into the binary and decoded once at
//! startup, so a charge can never appear before its image exists. Decoding
//! is still fallible in the signature; a corrupted asset should fail loudly
//! at launch rather than draw garbage.

use crate::error::SpriteError;

/// Sprite edge length in pixels. Charges draw centered, so the blit origin
/// is the charge position minus half of this.
pub const SPRITE_SIZE: u32 = 50;

/// Decoded RGBA sprite, ready for texture upload.
#[derive(Debug)]
pub struct SpriteImage {
    data: Vec<u8>,
}

impl SpriteImage {
    /// Decode a PNG and check it against the fixed sprite dimensions.
    pub fn from_png(bytes: &[u8]) -> Result<Self, SpriteError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        if width != SPRITE_SIZE || height != SPRITE_SIZE {
            return Err(SpriteError::Size { width, height });
        }
        Ok(Self {
            data: img.into_raw(),
        })
    }

    /// Raw RGBA8 bytes, row-major from the top-left.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The proton sprite, a warm disc with a plus glyph.
pub fn proton() -> Result<SpriteImage, SpriteError> {
    SpriteImage::from_png(include_bytes!("../assets/proton.png"))
}

/// The electron sprite, a cool disc with a minus glyph.
pub fn electron() -> Result<SpriteImage, SpriteError> {
    SpriteImage::from_png(include_bytes!("../assets/electron.png"))
}
