//! Login, sign-up and logout endpoints

use axum::{
    extract::{rejection::FormRejection, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::error::Result;
use crate::server::pages::Page;
use crate::server::state::AppState;

const BAD_CREDENTIALS: &str = "Por favor, verifica tus credenciales";
const ACCOUNT_CREATED: &str = "Cuenta creada con éxito. Inicia sesión.";
const PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden.";

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub user_email: String,
    pub user_pwd: String,
}

/// Sign-up form fields
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    pub user_email: String,
    pub user_pwd0: String,
    pub user_pwd1: String,
}

/// GET / - Login page
pub async fn index_page(State(state): State<AppState>) -> Result<Response> {
    Ok(state.pages().render(Page::Index, None)?.into_response())
}

/// POST / - Sign in and open the chatbot
pub async fn login(
    State(state): State<AppState>,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Rejected login form: {}", rejection.body_text());
            let page = state.pages().render(Page::Index, Some(BAD_CREDENTIALS))?;
            return Ok(page.into_response());
        }
    };

    let user = match state.identity().sign_in(&form.user_email, &form.user_pwd).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(provider = state.identity().name(), "Sign-in failed: {}", e);
            let page = state.pages().render(Page::Index, Some(BAD_CREDENTIALS))?;
            return Ok(page.into_response());
        }
    };

    tracing::info!(user = %user, "User signed in");
    let cookie = state.sessions().session_cookie(&user)?;
    let page = state.pages().render(Page::PdfChatbot, None)?;

    Ok(([(header::SET_COOKIE, cookie)], page).into_response())
}

/// GET /create_account - Sign-up page
pub async fn create_account_page(State(state): State<AppState>) -> Result<Response> {
    Ok(state.pages().render(Page::CreateAccount, None)?.into_response())
}

/// POST /create_account - Register a new account
pub async fn create_account(
    State(state): State<AppState>,
    Form(form): Form<SignUpForm>,
) -> Result<Response> {
    if form.user_pwd0 != form.user_pwd1 {
        let page = state
            .pages()
            .render(Page::CreateAccount, Some(PASSWORD_MISMATCH))?;
        return Ok(page.into_response());
    }

    let message = match state.identity().sign_up(&form.user_email, &form.user_pwd0).await {
        Ok(user) => {
            tracing::info!(user = %user, "Account created");
            ACCOUNT_CREATED.to_string()
        }
        Err(e) => {
            tracing::warn!(provider = state.identity().name(), "Sign-up failed: {}", e);
            format!("Error: {}", e)
        }
    };

    Ok(state.pages().render(Page::Index, Some(&message))?.into_response())
}

/// GET /logout - Drop the session and go back to the login page
pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, state.sessions().clear_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
