use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptError>;

/// Interpolation failures, labelled with the name of the text being rendered
#[derive(Error, Debug)]
pub enum PromptError {
    /// Unbalanced or malformed `{{ }}` / `{% %}` markup
    #[error("Template '{name}' has invalid syntax: {detail}")]
    Syntax { name: String, detail: String },

    /// Includes references to inputs the caller did not supply
    #[error("Failed to render template '{name}': {detail}")]
    Render { name: String, detail: String },
}
