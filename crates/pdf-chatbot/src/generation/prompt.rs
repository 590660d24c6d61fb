//! Prompt template for document questions

use crate::types::{Prompt, TextChunk};

/// Separator placed between chunks in the prompt
pub const CHUNK_SEPARATOR: &str = ", ";

/// Prompt builder for document questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join the chunks in order and wrap them with the question.
    ///
    /// No truncation or deduplication is applied; the prompt grows with the
    /// document.
    pub fn build(chunks: &[TextChunk], query: &str) -> Prompt {
        let context = chunks
            .iter()
            .map(TextChunk::as_str)
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);

        Prompt::new(format!(
            "Basado en la siguiente información: {context}. Responde a la pregunta: {query}",
            context = context,
            query = query
        ))
    }
}
