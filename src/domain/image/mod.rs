//! Image domain module

mod captured_image;
mod encoded_payload;

pub use captured_image::{CaptureFormat, CapturedImage};
pub use encoded_payload::{
    EncodedPayload, PreprocessOptions, DEFAULT_QUALITY, DEFAULT_SCALE, PAYLOAD_MIME_TYPE,
};
