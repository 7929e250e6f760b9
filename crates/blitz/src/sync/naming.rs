//! Names derived from issue titles and project names.

use crate::domain::IssueId;
use blitz_markdown::MARKDOWN_EXTENSION;

/// Number of characters in a project shorthand.
const SHORTHAND_LEN: usize = 4;

const VOWELS: &str = "aeiou";

/// The title as stored in the database: heading markers removed, trimmed.
///
/// `"# Fix login bug"` becomes `"Fix login bug"`.
pub fn plain_title(title: &str) -> String {
    title.replace('#', "").trim().to_string()
}

/// Lowercase consonant-only abbreviation of a project name.
///
/// `"blitzkrieg"` becomes `"bltz"`.
pub fn project_shorthand(project_name: &str) -> String {
    project_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| !VOWELS.contains(*c))
        .take(SHORTHAND_LEN)
        .collect()
}

/// Git branch name for a new issue: `{shorthand}-{title-slug}`.
///
/// Computed once at creation; later title edits do not change it.
pub fn branch_name(project_name: &str, title: &str) -> String {
    let slug = title
        .trim_start_matches('#')
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    let shorthand = project_shorthand(project_name);

    if shorthand.is_empty() {
        slug
    } else {
        format!("{shorthand}-{slug}")
    }
}

/// File name for materializing an issue: snake-cased title plus `.md`.
///
/// `-`, `#` and `:` are dropped, spaces become `_`, and leading underscores
/// are stripped. Path separators become `_` so the file stays inside the
/// issues directory. A title with nothing left falls back to the issue id.
pub fn file_name_for(title: &str, id: &IssueId) -> String {
    let snake: String = title
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '#' | ':'))
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    let stem = snake.trim_start_matches('_');

    if stem.is_empty() {
        format!("{id}.{MARKDOWN_EXTENSION}")
    } else {
        format!("{stem}.{MARKDOWN_EXTENSION}")
    }
}
