//! The issue file layout.
//!
//! Files are parsed line by line. Every field is trimmed, so a document read
//! from disk and rendered again only differs from the original in
//! surrounding whitespace.

use std::fmt;

use thiserror::Error;

/// Minimum number of lines an issue file must contain (identifier + title).
pub const MIN_LINES: usize = 2;

/// Errors raised while parsing an issue file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The file is missing the identifier line or the title line.
    #[error("expected at least {MIN_LINES} lines (identifier and title), found {found}")]
    TooFewLines {
        /// Number of lines actually present.
        found: usize,
    },
}

/// The `(id, title, description)` triple stored in one issue file.
///
/// `id_line` is kept verbatim (after trimming) because a file written by
/// hand may carry an empty or malformed identifier until the first sync
/// assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueDocument {
    /// First line: the identifier, possibly empty or invalid.
    pub id_line: String,
    /// Second line: the title, possibly starting with a `#` heading marker.
    pub title: String,
    /// Remaining lines after the blank separator.
    pub description: String,
}

impl IssueDocument {
    /// Build a document from its three fields, trimming each one.
    pub fn new(
        id_line: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id_line: id_line.into().trim().to_string(),
            title: title.into().trim().to_string(),
            description: description.into().trim().to_string(),
        }
    }

    /// Parse the content of an issue file.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::TooFewLines`] when the text has fewer than two
    /// lines.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut lines = text.lines();

        let (Some(id_line), Some(title)) = (lines.next(), lines.next()) else {
            return Err(ParseError::TooFewLines {
                found: text.lines().count(),
            });
        };

        let description = lines.collect::<Vec<_>>().join("\n");

        Ok(Self::new(id_line, title, description))
    }

    /// Render the canonical file content.
    ///
    /// The layout is `id`, `title`, a blank line, then the description,
    /// terminated by a single newline.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}\n{}\n\n{}\n", self.id_line, self.title, self.description)
    }

    /// Returns a copy of this document carrying a different identifier.
    #[must_use]
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self::new(id, self.title.clone(), self.description.clone())
    }
}

impl fmt::Display for IssueDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parse_full_document() {
        let doc = IssueDocument::parse("abc\n# Fix login bug\n\nFirst line\nSecond line\n").unwrap();

        assert_eq!(doc.id_line, "abc");
        assert_eq!(doc.title, "# Fix login bug");
        assert_eq!(doc.description, "First line\nSecond line");
    }

    #[test]
    fn parse_trims_fields() {
        let doc = IssueDocument::parse("  abc  \n  Title  \n\n\n  Body  \n\n").unwrap();

        assert_eq!(doc.id_line, "abc");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.description, "Body");
    }

    #[test]
    fn parse_two_lines_has_empty_description() {
        let doc = IssueDocument::parse("abc\nTitle").unwrap();

        assert_eq!(doc.title, "Title");
        assert!(doc.description.is_empty());
    }

    #[test]
    fn parse_handles_crlf() {
        let doc = IssueDocument::parse("abc\r\nTitle\r\n\r\nBody\r\n").unwrap();

        assert_eq!(doc.id_line, "abc");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.description, "Body");
    }

    #[rstest]
    #[case::empty("", 0)]
    #[case::single_line("My Title", 1)]
    #[case::single_line_with_newline("My Title\n", 1)]
    fn parse_rejects_short_files(#[case] text: &str, #[case] found: usize) {
        let err = IssueDocument::parse(text).unwrap_err();
        assert_eq!(err, ParseError::TooFewLines { found });
        assert!(err.to_string().contains("at least 2 lines"));
    }

    #[test]
    fn render_uses_canonical_layout() {
        let doc = IssueDocument::new("u1", "Fix login bug", "Steps to reproduce");

        assert_eq!(doc.render(), "u1\nFix login bug\n\nSteps to reproduce\n");
    }

    #[test]
    fn with_id_keeps_title_and_description() {
        let doc = IssueDocument::new("", "Title", "Body").with_id("u2");

        assert_eq!(doc.id_line, "u2");
        assert_eq!(doc.title, "Title");
        assert_eq!(doc.description, "Body");
    }
}
