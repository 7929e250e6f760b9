//! Markdown issue files for blitz.
//!
//! An issue lives on disk as a small Markdown file whose first line holds
//! the issue identifier, whose second line holds the title, and whose
//! remaining lines (after a blank separator) hold the description:
//!
//! ```text
//! 2f0c5b8e-4d1a-4c7b-9a53-1f7c2e9d6b40
//! # Fix login bug
//!
//! Users are logged out after every refresh.
//! ```
//!
//! This crate provides the [`IssueDocument`] codec for that format and the
//! [`IssueFileStore`] contract with its filesystem implementation,
//! [`IssueDirectory`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod document;
pub mod error;
pub mod store;

pub use atomic::write_atomic;
pub use document::{IssueDocument, ParseError};
pub use error::{Error, Result};
pub use store::{IssueDirectory, IssueFileStore, MARKDOWN_EXTENSION};
