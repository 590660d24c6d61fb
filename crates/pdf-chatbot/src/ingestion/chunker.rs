//! Blank-line chunking of extracted text

use crate::types::TextChunk;

/// Paragraph separator used by both extraction paths
pub const BLANK_LINE: &str = "\n\n";

/// Splits extracted text into ordered chunks on [`BLANK_LINE`].
///
/// Splitting keeps empty fragments (three or more consecutive newlines
/// produce one) so that joining the chunks back reproduces the document's
/// paragraph structure exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextChunker;

impl TextChunker {
    /// Split text into chunks, preserving order. Always returns at least one chunk.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        text.split(BLANK_LINE).map(TextChunk::from).collect()
    }
}
