//! Chat completion wire types
use serde::Serialize;

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
}

/// One chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Non-streaming request carrying one user message.
    pub fn single_question(content: &'a str) -> Self {
        Self { messages: vec![ChatMessage { role: "user", content }], stream: false }
    }
}
