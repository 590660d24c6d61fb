//! Document question answering: extraction, prompt, completion, formatting

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::{PromptBuilder, ResponseFormatter};
use crate::ingestion::TextExtractor;
use crate::providers::LlmProvider;
use crate::types::{FormattedAnswer, TextChunk, UploadedFile};

/// Runs one uploaded document and one question through the LLM
#[derive(Clone)]
pub struct QaPipeline {
    llm: Arc<dyn LlmProvider>,
}

impl QaPipeline {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Extract the document, ask the question and format the answer.
    ///
    /// Extraction failures return before the provider is contacted.
    pub async fn answer(&self, file: UploadedFile, query: &str) -> Result<FormattedAnswer> {
        let filename = file.filename.clone();

        // PDF and workbook parsing are CPU-bound
        let chunks = tokio::task::spawn_blocking(move || TextExtractor::extract(Some(file)))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        tracing::info!(filename = %filename, chunks = chunks.len(), "Document extracted");

        self.answer_chunks(&chunks, query).await
    }

    /// Ask the question over already extracted chunks
    pub async fn answer_chunks(&self, chunks: &[TextChunk], query: &str) -> Result<FormattedAnswer> {
        let prompt = PromptBuilder::build(chunks, query);

        let raw = self.llm.complete(&prompt).await?;
        tracing::debug!(
            provider = self.llm.name(),
            model = self.llm.model(),
            answer_chars = raw.len(),
            "Answer generated"
        );

        Ok(ResponseFormatter::format(&raw))
    }
}
