use thiserror::Error;

/// Error type for reading tilesets and levels
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing <{0}> element")]
    MissingElement(&'static str),
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    #[error("Invalid wang id '{value}': {reason}")]
    InvalidWangId { value: String, reason: String },
}
