//! Application layer - Use cases and port interfaces
//!
//! Contains the description service, the pipeline controller and the
//! trait definitions for external system interactions.

pub mod description;
pub mod pipeline;
pub mod ports;

// Re-export use cases
pub use description::{DescriptionService, InflightHandle};
pub use pipeline::{PipelineController, PipelineOptions, StateObserver};
