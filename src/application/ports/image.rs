//! Image preprocessing port interface

use crate::domain::error::EncodingError;
use crate::domain::image::{CapturedImage, EncodedPayload, PreprocessOptions};

/// Port for turning a capture into an upload payload.
///
/// CPU-bound and synchronous; callers run it on a blocking worker.
pub trait ImagePreprocessor: Send + Sync + 'static {
    /// Downscale and re-encode the capture.
    ///
    /// # Arguments
    /// * `image` - The captured frame
    /// * `options` - Scale and quality factors
    ///
    /// # Returns
    /// A payload strictly smaller than the capture, or an error
    fn preprocess(
        &self,
        image: &CapturedImage,
        options: PreprocessOptions,
    ) -> Result<EncodedPayload, EncodingError>;
}
