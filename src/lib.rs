//! pyproject-validate core library.
//!
//! This crate validates a `pyproject.toml` manifest against the packaging
//! metadata specification and can rewrite it with mechanical fixes.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Effective settings from CLI flags and the tool table.
//! - `manifest`: Locating, loading, and saving the manifest.
//! - `checks`: Evaluation of the declarative schema in `models::schema`.
//! - `requirement`: Dependency specifier parsing and rendering.
//! - `normalize`: Canonical project names and specifiers.
//! - `validators`: The validator trait and the registered validators.
//! - `lint`: The pipeline runner and persistence decision.
//! - `output`: Human/JSON printers.
//! - `models`: Outcome and run result structs, schema model.
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod lint;
pub mod manifest;
pub mod models;
pub mod normalize;
pub mod output;
pub mod requirement;
pub mod utils;
pub mod validators;
