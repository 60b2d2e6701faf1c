//! Context assembly.
//!
//! Joins ranked search results into one bounded context string, keeping the
//! order the index returned them in.

use super::store::SearchResult;
use crate::core::config::ContextConfig;

/// Returned when there is nothing to ground an answer on.
pub const EMPTY_CONTEXT: &str = "";

pub struct ContextBuilder {
    separator: String,
    max_context_chars: usize,
}

impl ContextBuilder {
    pub fn new(config: &ContextConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            max_context_chars: config.max_context_chars,
        }
    }

    /// Join result texts with the separator.
    ///
    /// The first result is always included; later ones are dropped once the
    /// character budget would be exceeded.
    pub fn assemble(&self, results: &[SearchResult]) -> String {
        let Some((first, rest)) = results.split_first() else {
            return EMPTY_CONTEXT.to_string();
        };

        let separator_len = self.separator.chars().count();
        let mut context = first.text.clone();
        let mut current_length = context.chars().count();

        for result in rest {
            let addition_length = separator_len + result.text.chars().count();
            if current_length + addition_length > self.max_context_chars {
                tracing::debug!(
                    "Context budget of {} chars reached; dropping lower-ranked results",
                    self.max_context_chars
                );
                break;
            }
            context.push_str(&self.separator);
            context.push_str(&result.text);
            current_length += addition_length;
        }

        context
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(&ContextConfig::default())
    }
}
