//! Error types for blitz-markdown operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::document::ParseError;

/// The error type for blitz-markdown operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file content does not follow the issue file layout.
    #[error("Invalid issue file: {0}")]
    Parse(#[from] ParseError),

    /// The file is not valid UTF-8 text.
    #[error("File is not valid UTF-8: {}", .0.display())]
    NotUtf8(PathBuf),
}

/// A specialized Result type for blitz-markdown operations.
pub type Result<T> = std::result::Result<T, Error>;
