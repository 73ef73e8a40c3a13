use thiserror::Error;

use crate::pattern::PatternError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),

    #[error("Unsupported SIF type: {0}")]
    UnknownSifType(String),

    #[error("Unsupported output format: {0}")]
    UnknownFormat(String),

    #[error("Malformed symbol table line {line}: {content}")]
    SymbolTable { line: usize, content: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}
