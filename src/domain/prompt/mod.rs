//! Prompt domain module

mod chat_message;
mod system_instruction;

pub use chat_message::{ChatMessage, ContentPart, ImageUrl, Role};
pub use system_instruction::{
    SystemInstruction, LANGUAGE_PLACEHOLDER, SYSTEM_INSTRUCTION_VERSION,
};

use crate::domain::image::EncodedPayload;

/// The message list for one request: system instruction, then the image.
/// Built fresh per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    messages: Vec<ChatMessage>,
}

impl Prompt {
    /// Build with the canonical instruction
    pub fn build(language: &str, payload: &EncodedPayload) -> Self {
        Self::build_with(&SystemInstruction::canonical(), language, payload)
    }

    /// Build with a specific instruction
    pub fn build_with(
        instruction: &SystemInstruction,
        language: &str,
        payload: &EncodedPayload,
    ) -> Self {
        Self {
            messages: vec![
                ChatMessage::system(instruction.render(language)),
                ChatMessage::user_image(payload.data_url()),
            ],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
