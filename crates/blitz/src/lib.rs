//! Blitz - developer workspace bootstrapper.
//!
//! The core of this crate is the issue sync engine in [`sync`]: it keeps a
//! directory of Markdown issue files and the `issues` table of a local
//! `SQLite` database consistent in both directions. Around it sit the
//! project registry, container provisioning for a project's Postgres and
//! pgAdmin, and Python package scaffolding.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod db;
pub mod domain;
pub mod error;
pub mod identity;
pub mod report;
pub mod sync;

// Workspace context and configuration
pub mod app;
pub mod config;
pub mod output;

// External collaborators
pub mod provision;
pub mod scaffold;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

pub use error::{Error, Result};
