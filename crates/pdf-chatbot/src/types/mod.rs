//! Core types for the chatbot pipeline

pub mod document;
pub mod response;

pub use document::{FileType, TextChunk, UploadedFile};
pub use response::{ChatResponse, FormattedAnswer, Prompt, UserId};
