//! Pipeline states

use std::fmt;

use crate::domain::description::{DescriptionError, DescriptionResult};
use crate::domain::error::EncodingError;
use crate::domain::language;

/// Identity of one tracked in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of one capture-to-description cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CycleId(pub u64);

/// Why a cycle ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Encoding(EncodingError),
    Description(DescriptionError),
}

impl FailureReason {
    /// The single localized message shown instead of internal detail
    pub fn user_message(&self, locale: &str) -> &'static str {
        language::fallback_message(locale)
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoding(e) => write!(f, "{}", e),
            Self::Description(e) => write!(f, "{}", e),
        }
    }
}

impl From<EncodingError> for FailureReason {
    fn from(err: EncodingError) -> Self {
        Self::Encoding(err)
    }
}

impl From<DescriptionError> for FailureReason {
    fn from(err: DescriptionError) -> Self {
        Self::Description(err)
    }
}

/// Observable pipeline state. Exactly one is live at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Preprocessing,
    Requesting(HandleId),
    Done(DescriptionResult),
    Failed(FailureReason),
    Cancelled,
}

impl PipelineState {
    pub fn phase(&self) -> PipelinePhase {
        match self {
            Self::Idle => PipelinePhase::Idle,
            Self::Preprocessing => PipelinePhase::Preprocessing,
            Self::Requesting(_) => PipelinePhase::Requesting,
            Self::Done(_) => PipelinePhase::Done,
            Self::Failed(_) => PipelinePhase::Failed,
            Self::Cancelled => PipelinePhase::Cancelled,
        }
    }

    /// Whether a cycle is in progress
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Preprocessing | Self::Requesting(_))
    }
}

/// Payload-free discriminant of [`PipelineState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PipelinePhase {
    #[default]
    Idle,
    Preprocessing,
    Requesting,
    Done,
    Failed,
    Cancelled,
}

impl PipelinePhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Preprocessing => "preprocessing",
            Self::Requesting => "requesting",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
