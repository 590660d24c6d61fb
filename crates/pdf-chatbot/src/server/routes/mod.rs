//! Routes for the chatbot server

pub mod auth;
pub mod chatbot;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::server::state::AppState;

/// Build all page routes
pub fn page_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Login
        .route("/", get(auth::index_page).post(auth::login))
        .route("/index", get(auth::index_page).post(auth::login))
        // Accounts
        .route(
            "/create_account",
            get(auth::create_account_page).post(auth::create_account),
        )
        .route("/logout", get(auth::logout))
        // Chatbot, with a larger body limit for uploads
        .route(
            "/pdf_chatbot",
            get(chatbot::chatbot_page)
                .post(chatbot::ask)
                .layer(DefaultBodyLimit::max(max_upload_size)),
        )
}
