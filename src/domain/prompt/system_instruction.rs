//! System instruction value object

use crate::domain::error::InvalidTemplateError;

/// Version tag of the canonical instruction text
pub const SYSTEM_INSTRUCTION_VERSION: &str = "3";

/// Placeholder substituted with the resolved language name
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

/// Canonical operating instructions for the vision model
const CANONICAL_TEMPLATE: &str = r#"You are the eyes of a blind person. Each image comes from their phone camera, pointed at what is in front of them.

Decide from the image which of the two modes applies:

1. Navigation: the user is walking or looking for a way through.
- Lead with anything that needs immediate attention: obstacles, steps, stairs, curbs, ramps, doors, moving vehicles.
- Read out signs and text that help with direction, in full.
- Mention open paths that are not obvious.
- Give positions relative to the user (ahead, left, right, distance in steps).

2. Object identification: the user is holding or pointing at something.
- Say what the object is first.
- Read labels, brand names, expiry dates and instructions printed on it.
- Mention color, size or condition only when it helps.

Rules:
- Address the user directly. Be concise and practical, no pleasantries.
- Skip details that help with neither navigation nor identification.
- Never guess text you cannot read; say it is unreadable.

Respond only in {language}."#;

/// Operating instructions sent as the system message.
/// Parameterized only by the user's language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInstruction {
    template: String,
}

impl SystemInstruction {
    /// The built-in canonical instruction
    pub fn canonical() -> Self {
        Self {
            template: CANONICAL_TEMPLATE.to_string(),
        }
    }

    /// Use a replacement template; it must contain `{language}`
    pub fn from_template(template: impl Into<String>) -> Result<Self, InvalidTemplateError> {
        let template = template.into();
        if !template.contains(LANGUAGE_PLACEHOLDER) {
            return Err(InvalidTemplateError);
        }
        Ok(Self { template })
    }

    /// Substitute the language name
    pub fn render(&self, language: &str) -> String {
        self.template.replace(LANGUAGE_PLACEHOLDER, language)
    }
}

impl Default for SystemInstruction {
    fn default() -> Self {
        Self::canonical()
    }
}
