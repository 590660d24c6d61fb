//! Prompt assembly and answer formatting

pub mod formatter;
pub mod prompt;

pub use formatter::ResponseFormatter;
pub use prompt::PromptBuilder;
