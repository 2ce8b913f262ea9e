//! Image preprocessing adapters

mod jpeg;

pub use jpeg::JpegPreprocessor;
