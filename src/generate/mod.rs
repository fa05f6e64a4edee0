/// Section content generation.
///
/// A proposal section is produced by a [`TextGenerator`]: given role-tagged
/// chat messages and a maximum output length, it returns generated text, or
/// nothing when the model has nothing usable to say. The concrete generator
/// (`openai::OpenAiClient`, behind the `client` feature) talks to an Azure
/// OpenAI chat-completions deployment; tests substitute closures.
///
/// `prompt` extracts company/date/title facts from the request prompt and
/// `sections` assembles the standard placeholder table of a proposal.
pub mod cleanup;
pub mod prompt;
pub mod sections;

#[cfg(feature = "client")]
pub mod openai;

use crate::error::Result;
use serde::Serialize;

/// A role-tagged chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Produces text from chat messages.
///
/// Calls are blocking and issued one at a time; there is no streaming and no
/// partial result. `Ok(None)` means the generator had no usable output,
/// which callers treat as a skip rather than a failure.
pub trait TextGenerator {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Option<String>>;
}
