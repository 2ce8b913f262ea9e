//! JPEG preprocessor adapter using the `image` crate

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, RgbImage, RgbaImage};
use tracing::debug;

use crate::application::ports::ImagePreprocessor;
use crate::domain::error::EncodingError;
use crate::domain::image::{CaptureFormat, CapturedImage, EncodedPayload, PreprocessOptions};

/// Resampling filter used for the downscale
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Downscales captures and re-encodes them as baseline JPEG
#[derive(Debug, Clone, Copy)]
pub struct JpegPreprocessor;

impl JpegPreprocessor {
    pub fn new() -> Self {
        Self
    }

    fn decode(image: &CapturedImage) -> Result<DynamicImage, EncodingError> {
        match image.format() {
            CaptureFormat::Encoded => image::load_from_memory(image.data())
                .map_err(|e| EncodingError::Decode(e.to_string())),
            CaptureFormat::Rgb8 { width, height } => {
                RgbImage::from_raw(width, height, image.data().to_vec())
                    .map(DynamicImage::ImageRgb8)
                    .ok_or_else(|| buffer_mismatch(image, width, height, 3))
            }
            CaptureFormat::Rgba8 { width, height } => {
                RgbaImage::from_raw(width, height, image.data().to_vec())
                    .map(DynamicImage::ImageRgba8)
                    .ok_or_else(|| buffer_mismatch(image, width, height, 4))
            }
        }
    }

    fn encode(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, EncodingError> {
        let rgb = image.to_rgb8();
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| EncodingError::Encode(e.to_string()))?;
        Ok(buf)
    }
}

impl Default for JpegPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

fn buffer_mismatch(image: &CapturedImage, width: u32, height: u32, channels: u64) -> EncodingError {
    EncodingError::Decode(format!(
        "{}x{} {} buffer needs {} bytes, got {}",
        width,
        height,
        image.format(),
        width as u64 * height as u64 * channels,
        image.byte_size()
    ))
}

impl ImagePreprocessor for JpegPreprocessor {
    fn preprocess(
        &self,
        image: &CapturedImage,
        options: PreprocessOptions,
    ) -> Result<EncodedPayload, EncodingError> {
        options.validate()?;

        let decoded = Self::decode(image)?;
        let (width, height) = options.scaled_dimensions(decoded.width(), decoded.height());
        let resized = decoded.resize_exact(width, height, RESIZE_FILTER);

        let jpeg = Self::encode(&resized, options.jpeg_quality())?;
        if jpeg.is_empty() {
            return Err(EncodingError::Encode("encoder produced no data".to_string()));
        }

        // A re-encode that grows the capture defeats the point of preprocessing
        if jpeg.len() >= image.byte_size() {
            return Err(EncodingError::NotReduced {
                original: image.byte_size(),
                encoded: jpeg.len(),
            });
        }

        debug!(
            from = %format!("{}x{}", decoded.width(), decoded.height()),
            to = %format!("{}x{}", width, height),
            original_bytes = image.byte_size(),
            encoded_bytes = jpeg.len(),
            quality = options.jpeg_quality(),
            "re-encoded capture"
        );

        Ok(EncodedPayload::from_jpeg(&jpeg, width, height))
    }
}
