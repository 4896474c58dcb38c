//! Manifest file access: location, TOML load, and TOML save.
//!
//! The document is kept as a `toml::Table` with insertion order preserved
//! (`preserve_order`), so a save writes keys back in the order they were read.
//! Comments and layout are not preserved.

use crate::error::ManifestError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name searched for during auto-location.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// The whole parsed manifest.
pub type Document = toml::Table;

/// Walk upward from `start` until a directory containing `pyproject.toml`
/// is found. Fails with `NotFound` once the filesystem root is passed.
pub fn locate(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut cur = start;
    loop {
        let candidate = cur.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return Err(ManifestError::NotFound),
        }
    }
}

#[derive(Debug, Clone)]
/// Handle to the manifest on disk. Read once, written at most once.
pub struct ManifestFile {
    pub path: PathBuf,
}

impl ManifestFile {
    /// Use `explicit` as-is when given, otherwise locate from `start`.
    pub fn resolve(explicit: Option<&Path>, start: &Path) -> Result<Self, ManifestError> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => locate(start)?,
        };
        debug!(path = %path.display(), "using manifest");
        Ok(Self { path })
    }

    pub fn read(&self) -> Result<String, ManifestError> {
        fs::read_to_string(&self.path).map_err(|source| ManifestError::Read {
            path: self.path.clone(),
            source,
        })
    }

    pub fn load(&self) -> Result<Document, ManifestError> {
        let text = self.read()?;
        parse_document(&text, &self.path)
    }

    pub fn save(&self, doc: &Document) -> Result<(), ManifestError> {
        let text = render_document(doc)?;
        fs::write(&self.path, text).map_err(|source| ManifestError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "saved manifest");
        Ok(())
    }
}

/// Deserialize manifest text, mapping parser failures to a single-line error.
pub fn parse_document(text: &str, path: &Path) -> Result<Document, ManifestError> {
    toml::from_str::<Document>(text).map_err(|e| {
        let offset = e.span().map(|s| s.start).unwrap_or(0);
        let (line, column) = line_column(text, offset);
        ManifestError::Parse {
            path: path.to_path_buf(),
            line,
            column,
            message: e.message().trim().replace('\n', " "),
        }
    })
}

/// Serialize the document, expanding arrays one element per line.
pub fn render_document(doc: &Document) -> Result<String, ManifestError> {
    Ok(toml::to_string_pretty(doc)?)
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0)
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_locate_walks_to_parent() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(MANIFEST_FILE), "[project]\nname = \"foo\"\n").unwrap();
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = locate(&nested).unwrap();
        assert_eq!(found, root.join(MANIFEST_FILE));
    }

    #[test]
    fn test_locate_ignores_directory_named_like_manifest() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(MANIFEST_FILE), "").unwrap();
        let nested = root.join("sub");
        fs::create_dir_all(nested.join(MANIFEST_FILE)).unwrap();

        assert_eq!(locate(&nested).unwrap(), root.join(MANIFEST_FILE));
    }

    #[test]
    fn test_explicit_path_is_not_searched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mf = ManifestFile::resolve(Some(&path), dir.path()).unwrap();
        assert_eq!(mf.path, path);
        // Missing explicit file is a read failure, not NotFound
        assert!(matches!(mf.load(), Err(ManifestError::Read { .. })));
    }

    #[test]
    fn test_parse_error_reports_line_and_column() {
        let text = "[project]\nname = \n";
        let err = parse_document(text, Path::new("pyproject.toml")).unwrap_err();
        match err {
            ManifestError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_preserves_key_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let text = "[project]\nversion = \"1\"\nname = \"foo\"\n";
        fs::write(&path, text).unwrap();
        let mf = ManifestFile { path: path.clone() };
        let doc = mf.load().unwrap();
        mf.save(&doc).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        let v = saved.find("version").unwrap();
        let n = saved.find("name").unwrap();
        assert!(v < n);
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
        assert_eq!(line_column("", 0), (1, 1));
    }
}
