//! Canonical forms for project names and dependency specifiers.

use crate::requirement::{ParseError, Requirement};
use regex::Regex;
use std::sync::LazyLock;

static VALID_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([A-Z0-9]|[A-Z0-9][A-Z0-9._-]*[A-Z0-9])$").expect("valid name pattern")
});

static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("valid separator pattern"));

/// ASCII letters/digits with inner `-`, `_`, `.`; no leading or trailing separator.
pub fn is_valid_project_name(name: &str) -> bool {
    VALID_NAME_RE.is_match(name)
}

/// Collapse every run of `-`, `_`, `.` into `-` and lower-case the result.
pub fn normalize_project_name(name: &str) -> String {
    SEPARATOR_RUN_RE.replace_all(name, "-").to_lowercase()
}

/// Canonical string for a dependency specifier.
///
/// The name is normalized and everything is lower-cased. Double quotes
/// become single quotes so the result sits inside a double-quoted TOML
/// string, except around a marker literal that itself contains `'`.
pub fn canonical_specifier(raw: &str) -> Result<String, ParseError> {
    let mut req = Requirement::parse(raw)?;
    req.name = normalize_project_name(&req.name);
    // Fold case before rendering so the rendered sort order is stable
    for extra in req.extras.iter_mut() {
        *extra = extra.to_lowercase();
    }
    for spec in req.specifiers.iter_mut() {
        spec.version = spec.version.to_lowercase().replace('"', "'");
    }
    if let Some(url) = req.url.as_mut() {
        *url = url.replace('"', "'");
    }
    Ok(req.to_string().to_lowercase())
}
