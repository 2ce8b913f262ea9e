//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod description;
pub mod error;
pub mod image;
pub mod language;
pub mod pipeline;
pub mod prompt;
pub mod provider;

// Re-export common types
pub use config::AppConfig;
pub use description::{DescriptionError, DescriptionResult, TokenUsage};
pub use error::*;
pub use self::image::{CapturedImage, EncodedPayload, PreprocessOptions};
pub use pipeline::{FailureReason, HandleId, PipelinePhase, PipelineSession, PipelineState};
pub use prompt::{Prompt, SystemInstruction};
pub use provider::{OutboundRequest, ProviderKind, ProviderSettings};
