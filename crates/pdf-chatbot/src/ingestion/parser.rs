//! Text extraction for uploaded PDFs and spreadsheets

use calamine::Reader;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::chunker::TextChunker;
use super::table;
use crate::error::ExtractionError;
use crate::types::{FileType, TextChunk, UploadedFile};

/// Upper bound for reading one PDF; pdf-extract can hang on some fonts
const PDF_EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Turns an uploaded file into ordered text chunks
pub struct TextExtractor;

impl TextExtractor {
    /// Extract the text of `file` and split it into chunks.
    ///
    /// The file type is resolved from the filename before any parsing. On
    /// success the returned sequence is never empty.
    pub fn extract(file: Option<UploadedFile>) -> Result<Vec<TextChunk>, ExtractionError> {
        let file = file.ok_or(ExtractionError::MissingFile)?;
        let file_type = file.file_type();

        let text = match file_type {
            FileType::Unsupported(ext) => return Err(ExtractionError::UnsupportedType(ext)),
            _ if file.is_empty() => return Err(ExtractionError::EmptyContent),
            FileType::Pdf => Self::extract_pdf(&file.content, PDF_EXTRACT_TIMEOUT)?,
            FileType::Spreadsheet => Self::extract_spreadsheet(&file.content)?,
        };

        let chunks = TextChunker.chunk(&text);
        tracing::debug!(
            filename = %file.filename,
            bytes = file.len(),
            chars = text.len(),
            chunks = chunks.len(),
            "Extracted document text"
        );

        Ok(chunks)
    }

    /// Extract all PDF pages in order and concatenate them
    fn extract_pdf(data: &[u8], timeout: Duration) -> Result<String, ExtractionError> {
        let data = data.to_vec();
        let pages = run_with_timeout(timeout, move || {
            pdf_extract::extract_text_from_mem_by_pages(&data).map_err(|e| e.to_string())
        })?
        .map_err(|e| ExtractionError::parse(FileType::Pdf, e))?;

        tracing::debug!(pages = pages.len(), "Read PDF pages");
        join_pages(pages)
    }

    /// Render the first worksheet as a text table
    fn extract_spreadsheet(data: &[u8]) -> Result<String, ExtractionError> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| ExtractionError::parse(FileType::Spreadsheet, e.to_string()))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(Ok(range)) => range,
            Some(Err(e)) => {
                return Err(ExtractionError::parse(FileType::Spreadsheet, e.to_string()))
            }
            None => return Err(ExtractionError::EmptyContent),
        };

        table::render_range(&range).ok_or(ExtractionError::EmptyContent)
    }
}

/// Run a PDF parse on its own thread and give up after `timeout`.
///
/// A parse that panics (pdf-extract does on some malformed inputs) or hangs
/// becomes a parse error. A hung thread is left behind; it cannot be killed.
fn run_with_timeout<T, F>(timeout: Duration, parse: F) -> Result<T, ExtractionError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("pdf-extract".to_string())
        .spawn(move || {
            let _ = tx.send(parse());
        })
        .map_err(|e| ExtractionError::parse(FileType::Pdf, e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(value) => Ok(value),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::error!(timeout_secs = timeout.as_secs(), "PDF extraction timed out");
            Err(ExtractionError::parse(
                FileType::Pdf,
                "tiempo de espera agotado al leer el documento",
            ))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!("pdf-extract panicked while reading document");
            Err(ExtractionError::parse(FileType::Pdf, "documento PDF dañado"))
        }
    }
}

/// Concatenate page texts in page order; whitespace-only results are empty content
pub(crate) fn join_pages<I, S>(pages: I) -> Result<String, ExtractionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let text = pages.into_iter().fold(String::new(), |mut acc, page| {
        acc.push_str(page.as_ref());
        acc
    });

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyContent);
    }

    Ok(text)
}
