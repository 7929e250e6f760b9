//! Output formatting for CLI commands.
//!
//! Human-readable text goes through [`OutputConfig`], which decides on
//! colors, Unicode icons and the maximum line width. Every printer also
//! has a JSON form for scripting.
//!
//! Submodules:
//! - [`color`]: Semantic color helpers
//! - [`tree`]: Project tree rendering with ASCII/Unicode connectors

pub mod color;
pub mod tree;

use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};
pub use tree::write_project_tree;

use crate::domain::Project;
use crate::error::Error;
use crate::report::{ReportRow, SyncReport};
use color::{bold, colorize_action, dimmed};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Narrowest the file column is ever squeezed to.
const MIN_NAME_WIDTH: usize = 12;

const COLUMN_GAP: &str = "  ";

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width.
    pub max_width: usize,
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `BLITZ_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `BLITZ_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `BLITZ_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`OutputConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_width = match lookup("BLITZ_MAX_WIDTH") {
            Some(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "BLITZ_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = match lookup("BLITZ_ASCII") {
            Some(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Some(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Some(v) => {
                tracing::warn!(
                    env_var = "BLITZ_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            None => false,
        };

        // NO_COLOR wins over BLITZ_COLOR (https://no-color.org/)
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("BLITZ_COLOR").is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Usable line width: the configured maximum, capped by the terminal.
    fn line_width(&self) -> usize {
        self.max_width.min(get_terminal_width())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

// ============================================================================
// Terminal Width Detection
// ============================================================================

/// Get the current terminal width, falling back to default if detection fails.
fn get_terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print the outcome table of a sync run followed by its final line.
///
/// `aborted` carries the fatal error when the run did not complete.
pub fn print_sync_report(
    report: &SyncReport,
    aborted: Option<&Error>,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => {
            write_sync_report(&mut handle, report, aborted, config, config.line_width())
        }
        OutputMode::Json => write_json(&mut handle, &SyncReportJson::new(report, aborted)),
    }
}

/// Print the registered projects as a tree.
pub fn print_projects(projects: &[Project], mode: OutputMode, config: &OutputConfig) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => write_project_tree(&mut handle, projects, config),
        OutputMode::Json => write_json(&mut handle, &projects),
    }
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{json}")
}

// ============================================================================
// Sync Report Table
// ============================================================================

const HEADERS: [&str; 3] = ["File", "Action", "Status"];

/// JSON form of a sync run.
#[derive(Serialize)]
struct SyncReportJson<'a> {
    rows: &'a [ReportRow],
    committed: bool,
    aborted: Option<String>,
}

impl<'a> SyncReportJson<'a> {
    fn new(report: &'a SyncReport, aborted: Option<&Error>) -> Self {
        Self {
            rows: report.rows(),
            committed: aborted.is_none(),
            aborted: aborted.map(ToString::to_string),
        }
    }
}

/// Write the three-column report table.
///
/// The file column is truncated so a row fits in `width`. Error details are
/// wrapped onto indented lines under their row. When `aborted` is set the
/// final line reports the fatal error instead of a summary, since the
/// session was rolled back.
pub fn write_sync_report<W: Write>(
    w: &mut W,
    report: &SyncReport,
    aborted: Option<&Error>,
    config: &OutputConfig,
    width: usize,
) -> io::Result<()> {
    if report.is_empty() {
        return match aborted {
            Some(e) => write_abort(w, e, config),
            None => writeln!(w, "No issue files to sync."),
        };
    }

    let rows = report.rows();
    let action_width = column_width(HEADERS[1], rows.iter().map(|r| r.action.label()));
    let status_width = column_width(HEADERS[2], rows.iter().map(ReportRow::status));
    let fixed = action_width + status_width + 2 * COLUMN_GAP.len();
    let name_width = column_width(HEADERS[0], rows.iter().map(|r| r.name.as_str()))
        .min(width.saturating_sub(fixed).max(MIN_NAME_WIDTH));

    writeln!(
        w,
        "{}",
        bold(
            &format!(
                "{:<name_width$}{COLUMN_GAP}{:<action_width$}{COLUMN_GAP}{}",
                HEADERS[0], HEADERS[1], HEADERS[2]
            ),
            config
        )
    )?;
    let rule = if config.use_ascii { "-" } else { "─" };
    writeln!(
        w,
        "{}",
        dimmed(&rule.repeat(name_width + fixed), config)
    )?;

    let detail_indent = " ".repeat(4);
    for row in rows {
        let name = truncate(&row.name, name_width, config);
        writeln!(
            w,
            "{}{COLUMN_GAP}{}{COLUMN_GAP}{}",
            pad(&name, name_width),
            colorize_action(&pad(row.action.label(), action_width), row.action, config),
            colorize_action(row.status(), row.action, config)
        )?;

        if let Some(detail) = &row.detail {
            for line in wrap_text(detail, width.saturating_sub(detail_indent.len()).max(20)) {
                writeln!(w, "{detail_indent}{}", dimmed(&line, config))?;
            }
        }
    }

    writeln!(w)?;
    if let Some(e) = aborted {
        return write_abort(w, e, config);
    }

    let summary = report.summary();
    if report.has_errors() {
        writeln!(w, "{}", color::error(&format!("Sync finished with errors: {summary}"), config))
    } else {
        writeln!(w, "{}", color::success(&format!("Sync complete: {summary}"), config))
    }
}

fn write_abort<W: Write>(w: &mut W, error: &Error, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "{}", color::error(&format!("Sync aborted: {error}"), config))?;
    writeln!(
        w,
        "{}",
        warning(
            "No database changes were committed. Identifiers written to files are kept.",
            config
        )
    )
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells
        .map(|c| c.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

fn pad(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Shorten `text` to at most `max` characters, marking the cut.
fn truncate(text: &str, max: usize, config: &OutputConfig) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let marker = if config.use_ascii { "~" } else { "…" };
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}{marker}")
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            textwrap::wrap(line, max_width)
                .into_iter()
                .map(|s| s.into_owned())
                .collect::<Vec<_>>()
        })
        .collect()
}
