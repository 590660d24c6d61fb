//! HTML pages rendered from templates compiled into the binary

use axum::response::Html;
use minijinja::{context, Environment};

use crate::error::Result;

/// Pages served by the chatbot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Login form
    Index,
    /// Sign-up form
    CreateAccount,
    /// Upload and question form
    PdfChatbot,
}

impl Page {
    fn template(self) -> &'static str {
        match self {
            Page::Index => "index.html",
            Page::CreateAccount => "create_account.html",
            Page::PdfChatbot => "pdf_chatbot.html",
        }
    }
}

/// Page renderer backed by a preloaded minijinja environment
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Load the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("base.html", include_str!("../../templates/base.html"))?;
        env.add_template("index.html", include_str!("../../templates/index.html"))?;
        env.add_template(
            "create_account.html",
            include_str!("../../templates/create_account.html"),
        )?;
        env.add_template(
            "pdf_chatbot.html",
            include_str!("../../templates/pdf_chatbot.html"),
        )?;

        Ok(Self { env })
    }

    /// Render `page`, optionally showing `umessage` above the content
    pub fn render(&self, page: Page, umessage: Option<&str>) -> Result<Html<String>> {
        let template = self.env.get_template(page.template())?;
        let html = template.render(context! { umessage => umessage })?;
        Ok(Html(html))
    }
}
