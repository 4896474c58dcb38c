//! Load/save failures for the manifest file.
//!
//! Every variant renders as a single line; the binary prints it verbatim and
//! exits with status 1 before (or instead of) persisting anything.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while locating, reading, parsing, or writing the manifest.
pub enum ManifestError {
    /// No `pyproject.toml` exists in the start directory or any ancestor.
    #[error("could not locate a `pyproject.toml` file")]
    NotFound,

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not well-formed TOML.
    #[error("{}: invalid TOML at line {line}, column {column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("could not serialize manifest: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_is_single_line() {
        let msg = ManifestError::NotFound.to_string();
        assert_eq!(msg, "could not locate a `pyproject.toml` file");
        assert!(!msg.contains('\n'));
    }

    #[test]
    fn test_parse_message_names_position() {
        let err = ManifestError::Parse {
            path: PathBuf::from("pyproject.toml"),
            line: 3,
            column: 7,
            message: "expected `=`".into(),
        };
        assert_eq!(
            err.to_string(),
            "pyproject.toml: invalid TOML at line 3, column 7: expected `=`"
        );
    }
}
