//! Per-file outcomes of a sync run.
//!
//! The sync engine appends one [`ReportRow`] per step it takes. The caller
//! owns the [`SyncReport`] so it can render whatever was recorded even when
//! the run aborts halfway.

use serde::Serialize;
use std::fmt;

/// What happened to one file or issue during a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncAction {
    /// A fresh identifier was written into the file
    IdAssigned,
    /// A new issue row was inserted
    Created,
    /// Title or description changed and both sides were rewritten
    Updated,
    /// File and database already agree
    Unchanged,
    /// A file was materialized for a database-only issue
    Synced,
    /// The step failed; see the row detail
    Error,
}

impl SyncAction {
    /// Every action, in display order.
    pub const ALL: [Self; 6] = [
        Self::IdAssigned,
        Self::Created,
        Self::Updated,
        Self::Unchanged,
        Self::Synced,
        Self::Error,
    ];

    /// Short action label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::IdAssigned => "UUID Prepended",
            Self::Created => "Created",
            Self::Updated => "Updated",
            Self::Unchanged => "Unchanged",
            Self::Synced => "Synced",
            Self::Error => "Error",
        }
    }

    /// Longer status description.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::IdAssigned => "New UUID Added",
            Self::Created => "New Issue Created",
            Self::Updated => "Updated in DB & Markdown",
            Self::Unchanged => "No Changes",
            Self::Synced => "Markdown File Created",
            Self::Error => "Failed",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the sync report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// File name (or generated file name for materialized issues)
    pub name: String,
    /// Outcome
    pub action: SyncAction,
    /// Error message for failed steps
    pub detail: Option<String>,
}

impl ReportRow {
    /// The status label shown next to the action.
    #[must_use]
    pub fn status(&self) -> &'static str {
        self.action.status()
    }
}

/// Accumulates the outcome of every step of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    rows: Vec<ReportRow>,
}

impl SyncReport {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful step.
    pub fn record(&mut self, name: impl Into<String>, action: SyncAction) {
        self.rows.push(ReportRow {
            name: name.into(),
            action,
            detail: None,
        });
    }

    /// Record a failed step.
    pub fn record_error(&mut self, name: impl Into<String>, detail: impl fmt::Display) {
        self.rows.push(ReportRow {
            name: name.into(),
            action: SyncAction::Error,
            detail: Some(detail.to_string()),
        });
    }

    /// All rows in recording order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of rows with the given action.
    #[must_use]
    pub fn count(&self, action: SyncAction) -> usize {
        self.rows.iter().filter(|r| r.action == action).count()
    }

    /// Returns `true` if any step failed.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.rows.iter().any(|r| r.action == SyncAction::Error)
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One-line summary, e.g. `2 created, 1 unchanged`.
    ///
    /// Actions that never occurred are omitted.
    #[must_use]
    pub fn summary(&self) -> String {
        let parts: Vec<String> = SyncAction::ALL
            .iter()
            .filter_map(|action| {
                let n = self.count(*action);
                (n > 0).then(|| format!("{n} {}", action.label().to_lowercase()))
            })
            .collect();

        if parts.is_empty() {
            "nothing to sync".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_rows_in_order() {
        let mut report = SyncReport::new();
        report.record("a.md", SyncAction::IdAssigned);
        report.record("a.md", SyncAction::Created);
        report.record_error("b.md", "expected at least 2 lines");

        let actions: Vec<_> = report.rows().iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec![SyncAction::IdAssigned, SyncAction::Created, SyncAction::Error]
        );
        assert_eq!(
            report.rows()[2].detail.as_deref(),
            Some("expected at least 2 lines")
        );
        assert!(report.has_errors());
    }

    #[test]
    fn summary_lists_only_seen_actions() {
        let mut report = SyncReport::new();
        report.record("a.md", SyncAction::Created);
        report.record("b.md", SyncAction::Created);
        report.record("c.md", SyncAction::Unchanged);

        assert_eq!(report.summary(), "2 created, 1 unchanged");
        assert!(!report.has_errors());
    }

    #[test]
    fn empty_report_summary() {
        assert_eq!(SyncReport::new().summary(), "nothing to sync");
    }

    #[test]
    fn status_labels_match_actions() {
        assert_eq!(SyncAction::IdAssigned.status(), "New UUID Added");
        assert_eq!(SyncAction::Synced.label(), "Synced");
        assert_eq!(SyncAction::Error.status(), "Failed");
    }
}
