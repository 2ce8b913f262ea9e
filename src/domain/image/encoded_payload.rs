//! Encoded upload payload and preprocessing options

use base64::Engine;

use crate::domain::error::EncodingError;

/// Default spatial scale applied to captures
pub const DEFAULT_SCALE: f32 = 0.5;

/// Default lossy codec quality (0, 1]
pub const DEFAULT_QUALITY: f32 = 0.5;

/// MIME type of every payload
pub const PAYLOAD_MIME_TYPE: &str = "image/jpeg";

/// Resize and re-encode parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    pub scale: f32,
    pub quality: f32,
}

impl PreprocessOptions {
    pub fn new(scale: f32, quality: f32) -> Result<Self, EncodingError> {
        let options = Self { scale, quality };
        options.validate()?;
        Ok(options)
    }

    /// Check both factors are in (0, 1]
    pub fn validate(&self) -> Result<(), EncodingError> {
        if !(self.scale > 0.0 && self.scale <= 1.0) {
            return Err(EncodingError::InvalidOptions(format!(
                "scale must be in (0, 1], got {}",
                self.scale
            )));
        }
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(EncodingError::InvalidOptions(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Quality on the JPEG 1..=100 scale
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Target dimensions after scaling, never below one pixel
    pub fn scaled_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.scale).round() as u32).max(1);
        (scale(width), scale(height))
    }
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// Base64 JPEG ready for upload. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    base64: String,
    byte_size: usize,
    width: u32,
    height: u32,
}

impl EncodedPayload {
    /// Build from encoded JPEG bytes
    pub fn from_jpeg(bytes: &[u8], width: u32, height: u32) -> Self {
        Self {
            base64: base64::engine::general_purpose::STANDARD.encode(bytes),
            byte_size: bytes.len(),
            width,
            height,
        }
    }

    pub fn base64(&self) -> &str {
        &self.base64
    }

    /// Size of the encoded JPEG (before base64)
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Data URL used as the image reference in the prompt
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", PAYLOAD_MIME_TYPE, self.base64)
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.byte_size;
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
