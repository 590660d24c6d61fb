//! Document question endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use bytes::Bytes;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::pages::Page;
use crate::server::state::AppState;
use crate::types::{ChatResponse, UploadedFile};

/// GET /pdf_chatbot - Upload form, signed-in users only
pub async fn chatbot_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if state.sessions().session_user(&headers).is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(state.pages().render(Page::PdfChatbot, None)?.into_response())
}

/// POST /pdf_chatbot - Answer a question about the uploaded document
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    let Some(user) = state.sessions().session_user(&headers) else {
        return Ok(Redirect::to("/").into_response());
    };

    // a body that is not multipart carries no file
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(user = %user, "Rejected chatbot form: {}", rejection.body_text());
        Error::MissingInput
    })?;

    let start = Instant::now();
    let (file, query) = read_form(multipart).await?;
    let (file, query) = match (file, query) {
        (Some(file), Some(query)) => (file, query),
        _ => return Err(Error::MissingInput),
    };

    tracing::info!(
        user = %user,
        filename = %file.filename,
        bytes = file.len(),
        "Processing question"
    );

    let response = state.pipeline().answer(file, &query).await?;

    tracing::info!(
        user = %user,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Question answered"
    );

    Ok(Json(ChatResponse { response }).into_response())
}

/// Read the `pdf_file` and `query` fields.
///
/// A file with an empty filename and an empty query count as absent.
async fn read_form(mut multipart: Multipart) -> Result<(Option<UploadedFile>, Option<String>)> {
    let mut file = None;
    let mut query = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "pdf_file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Multipart(e.to_string()))?;
                if !filename.is_empty() {
                    file = Some(UploadedFile::new(filename, data));
                }
            }
            "query" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::Multipart(e.to_string()))?;
                if !text.is_empty() {
                    query = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok((file, query))
}
