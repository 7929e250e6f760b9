//! The issues directory.
//!
//! [`IssueFileStore`] is the narrow set of file operations the sync engine
//! needs. [`IssueDirectory`] implements it over one flat directory of
//! `.md` files.

use std::path::{Path, PathBuf};

use crate::atomic::write_atomic;
use crate::document::IssueDocument;
use crate::error::{Error, Result};

/// File extension of issue files (without the dot).
pub const MARKDOWN_EXTENSION: &str = "md";

/// File operations over a directory of issue files.
pub trait IssueFileStore {
    /// List the issue files in the directory.
    ///
    /// The listing is non-recursive and only includes files ending in
    /// `.md`. Its order is stable across calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or cannot be read.
    fn list_markdown_files(&self) -> Result<Vec<PathBuf>>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on read failure and [`Error::NotUtf8`] when the
    /// content is not valid UTF-8.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace the whole content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be written.
    fn write(&self, path: &Path, text: &str) -> Result<()>;

    /// Make `id` the first line of the file.
    ///
    /// Existing content moves down one line. A blank first line is treated
    /// as an empty identifier slot and replaced rather than shifted.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    fn prepend_identifier(&self, path: &Path, id: &str) -> Result<()> {
        let content = self.read(path)?;
        self.write(path, &prepend_line(&content, id))
    }

    /// Path of a file named `file_name` inside the directory.
    fn path_for(&self, file_name: &str) -> PathBuf;

    /// Read and parse an issue file.
    ///
    /// # Errors
    ///
    /// Returns the read error, or [`Error::Parse`] when the layout is invalid.
    fn read_document(&self, path: &Path) -> Result<IssueDocument> {
        let text = self.read(path)?;
        Ok(IssueDocument::parse(&text)?)
    }
}

/// Insert `id` as the first line of `content`.
fn prepend_line(content: &str, id: &str) -> String {
    match content.split_once('\n') {
        Some((first, rest)) if first.trim().is_empty() => format!("{id}\n{rest}"),
        None if content.trim().is_empty() => format!("{id}\n"),
        _ => format!("{id}\n{content}"),
    }
}

/// A flat directory of issue files on the local filesystem.
#[derive(Debug, Clone)]
pub struct IssueDirectory {
    root: PathBuf,
}

impl IssueDirectory {
    /// Create a store rooted at `root`. The directory is not touched until
    /// the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store operates on.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IssueFileStore for IssueDirectory {
    fn list_markdown_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type()?.is_file() {
                continue;
            }

            if path
                .extension()
                .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
            {
                files.push(path);
            }
        }

        // read_dir order is platform dependent
        files.sort();

        tracing::debug!(
            directory = %self.root.display(),
            count = files.len(),
            "Listed issue files"
        );
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes).map_err(|_| Error::NotUtf8(path.to_path_buf()))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        write_atomic(path, text)
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }
}
