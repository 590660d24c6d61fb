//! Document text extraction: file-type dispatch, parsing and chunking

mod chunker;
mod parser;
pub mod table;

pub use chunker::{TextChunker, BLANK_LINE};
pub use parser::TextExtractor;
