//! Workspace-level commands that run before an [`App`](crate::app::App)
//! exists.

pub mod init;
