use crate::llm::{ChatMessage, Prompt};

pub const SYSTEM_DIRECTIVE: &str = "You are a helpful assistant that answers questions based only on the provided context. \
If the context does not contain enough information to answer, say so instead of guessing.";

/// Renders the grounded instruction. Output depends only on its inputs.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    directive: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::with_directive(SYSTEM_DIRECTIVE)
    }

    pub fn with_directive(directive: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
        }
    }

    pub fn build(&self, context: &str, question: &str) -> Prompt {
        Prompt::new(vec![
            ChatMessage::system(self.directive.clone()),
            ChatMessage::user(format!("Context:\n{}\n\nQuestion: {}", context, question)),
        ])
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
