//! Captured image value object

use std::fmt;

/// Layout of the bytes held by a [`CapturedImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureFormat {
    /// Encoded still as delivered by a camera (JPEG, PNG)
    Encoded,
    /// Raw 8-bit RGB pixels, row-major
    Rgb8 { width: u32, height: u32 },
    /// Raw 8-bit RGBA pixels, row-major
    Rgba8 { width: u32, height: u32 },
}

impl CaptureFormat {
    /// Get the format name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Encoded => "encoded",
            Self::Rgb8 { .. } => "rgb8",
            Self::Rgba8 { .. } => "rgba8",
        }
    }

    /// Dimensions when known without decoding
    pub const fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Self::Encoded => None,
            Self::Rgb8 { width, height } | Self::Rgba8 { width, height } => {
                Some((*width, *height))
            }
        }
    }
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A frame handed over by the capture collaborator.
/// The pipeline takes ownership once capture is received.
#[derive(Clone)]
pub struct CapturedImage {
    data: Vec<u8>,
    format: CaptureFormat,
}

impl CapturedImage {
    /// Wrap encoded file data (JPEG, PNG)
    pub fn encoded(data: Vec<u8>) -> Self {
        Self {
            data,
            format: CaptureFormat::Encoded,
        }
    }

    /// Wrap a raw RGB pixel buffer
    pub fn rgb8(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data,
            format: CaptureFormat::Rgb8 { width, height },
        }
    }

    /// Wrap a raw RGBA pixel buffer
    pub fn rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            data,
            format: CaptureFormat::Rgba8 { width, height },
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    /// Size of the held bytes
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }
}

// Pixel buffers are large; keep them out of debug output.
impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("format", &self.format)
            .field("byte_size", &self.data.len())
            .finish()
    }
}
