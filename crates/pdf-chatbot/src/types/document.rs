//! Uploaded file, file type and chunk types

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported file types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Excel spreadsheet (.xlsx or .xls)
    Spreadsheet,
    /// Anything else, with the lowercased extension it was resolved from
    Unsupported(String),
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "xlsx" | "xls" => Self::Spreadsheet,
            _ => Self::Unsupported(ext),
        }
    }

    /// Detect file type from a filename.
    ///
    /// The extension is whatever follows the last `.`; a name without a dot is
    /// treated as its own extension.
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename.rsplit('.').next().unwrap_or("");
        Self::from_extension(extension)
    }

    /// Get display name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Pdf => "PDF",
            Self::Spreadsheet => "Excel Spreadsheet",
            Self::Unsupported(ext) => ext.as_str(),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A file received in a single request. Never persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as declared by the client
    pub filename: String,
    /// Raw file content
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Resolve the file type from the declared filename
    pub fn file_type(&self) -> FileType {
        FileType::from_filename(&self.filename)
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A fragment of extracted text, bounded by blank lines in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextChunk(String);

impl TextChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for TextChunk {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TextChunk {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for TextChunk {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
