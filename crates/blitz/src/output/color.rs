//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green   (created, synced, materialized files)
//!   - Warning:   yellow  (updated rows, assigned identifiers)
//!   - Error:     red     (failed steps)
//!   - Info:      cyan    (project names, root tree nodes)
//!   - Muted:     dimmed  (unchanged rows, connectors, details)
//!   - Emphasis:  bold    (table headers)

use colored::Colorize;

use super::OutputConfig;
use crate::report::SyncAction;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Color a (pre-padded) cell by the action it describes.
pub(crate) fn colorize_action(text: &str, action: SyncAction, config: &OutputConfig) -> String {
    match action {
        SyncAction::Created | SyncAction::Synced => success(text, config),
        SyncAction::IdAssigned | SyncAction::Updated => warning(text, config),
        SyncAction::Unchanged => dimmed(text, config),
        SyncAction::Error => error(text, config),
    }
}
