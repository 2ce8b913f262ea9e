//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like the image codec, the
//! provider HTTP endpoint and the config file.

pub mod config;
pub mod image;
pub mod transport;

// Re-export adapters
pub use config::XdgConfigStore;
pub use self::image::JpegPreprocessor;
pub use transport::ReqwestTransport;
