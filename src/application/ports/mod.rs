//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod image;
pub mod transport;

// Re-export common types
pub use config::ConfigStore;
pub use self::image::ImagePreprocessor;
pub use transport::{HttpResponse, HttpTransport, TransportError};
