//! pdf-chatbot: ask questions about an uploaded PDF or spreadsheet
//!
//! Users sign in through Firebase, upload one document with a question, and
//! get back the LLM's answer as light HTML. The document is extracted,
//! chunked and folded into a single prompt; nothing is stored.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use pipeline::QaPipeline;
pub use types::{
    document::{FileType, TextChunk, UploadedFile},
    response::{ChatResponse, FormattedAnswer, Prompt, UserId},
};
