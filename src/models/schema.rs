//! Declarative schema for the `build-system` and `project` tables.
//!
//! Key components:
//! - `SectionSpec`: one top-level table with its explicit field list and the
//!   cross-field rules evaluated after the per-field checks.
//! - `FieldSpec`: key, presence requirement, and expected `Shape`.
//! - `SchemaError`: structured violation (`FieldPath` + `Defect`), rendered to
//!   text only at the reporting boundary.
//!
//! Unknown keys are never reported. The evaluator lives in `crate::checks`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a field must be present.
pub enum Presence {
    Required,
    Optional,
    /// Required unless listed in `project.dynamic`.
    RequiredUnlessDynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Value shapes understood by the evaluator.
pub enum Shape {
    String,
    StringArray,
    /// Table of string values (`scripts`, `gui-scripts`, `urls`).
    StringTable,
    /// Table of tables of string values (`entry-points`).
    NestedStringTable,
    /// Table of string arrays (`optional-dependencies`).
    StringArrayTable,
    /// Array of `{ name, email }` tables.
    People,
    /// String, or table with exactly one of `file`/`text`.
    License,
    /// Table with `globs` and/or `paths` string arrays.
    LicenseFiles,
    /// String with a known extension, or table with `content-type` and
    /// exactly one of `file`/`text`.
    Readme,
    /// String array that must not contain `name`.
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Rules that look at several fields of one section at once.
pub enum SectionRule {
    /// Required fields must be static or dynamic; dynamic fields must not
    /// also be defined statically.
    DynamicFields,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub presence: Presence,
    pub shape: Shape,
}

#[derive(Debug, Clone, Copy)]
/// One top-level table of the manifest.
pub struct SectionSpec {
    pub key: &'static str,
    pub fields: &'static [FieldSpec],
    pub rules: &'static [SectionRule],
}

const fn field(key: &'static str, presence: Presence, shape: Shape) -> FieldSpec {
    FieldSpec {
        key,
        presence,
        shape,
    }
}

// Fields are listed alphabetically; errors are reported in this order.
pub const BUILD_SYSTEM: SectionSpec = SectionSpec {
    key: "build-system",
    fields: &[
        field("backend-path", Presence::Optional, Shape::StringArray),
        field("build-backend", Presence::Required, Shape::String),
        field("requires", Presence::Required, Shape::StringArray),
    ],
    rules: &[],
};

pub const PROJECT: SectionSpec = SectionSpec {
    key: "project",
    fields: &[
        field("authors", Presence::Optional, Shape::People),
        field("classifiers", Presence::Optional, Shape::StringArray),
        field("dependencies", Presence::Optional, Shape::StringArray),
        field("description", Presence::Optional, Shape::String),
        field("dynamic", Presence::Optional, Shape::Dynamic),
        field("entry-points", Presence::Optional, Shape::NestedStringTable),
        field("gui-scripts", Presence::Optional, Shape::StringTable),
        field("keywords", Presence::Optional, Shape::StringArray),
        field("license", Presence::Optional, Shape::License),
        field("license-files", Presence::Optional, Shape::LicenseFiles),
        field("maintainers", Presence::Optional, Shape::People),
        field("name", Presence::Required, Shape::String),
        field(
            "optional-dependencies",
            Presence::Optional,
            Shape::StringArrayTable,
        ),
        field("readme", Presence::Optional, Shape::Readme),
        field("scripts", Presence::Optional, Shape::StringTable),
        field("urls", Presence::Optional, Shape::StringTable),
        field("version", Presence::RequiredUnlessDynamic, Shape::String),
    ],
    rules: &[SectionRule::DynamicFields],
};

pub const SECTIONS: &[SectionSpec] = &[BUILD_SYSTEM, PROJECT];

pub const README_EXTENSIONS: &[&str] = &[".md", ".rst", ".txt"];
pub const README_CONTENT_TYPES: &[&str] = &["text/markdown", "text/x-rst", "text/plain"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
/// Location of a value inside the document, e.g. `project -> authors -> 0`.
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn root(section: &str) -> Self {
        Self(vec![Segment::Key(section.to_string())])
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segs = self.0.clone();
        segs.push(Segment::Key(key.to_string()));
        Self(segs)
    }

    pub fn index(&self, i: usize) -> Self {
        let mut segs = self.0.clone();
        segs.push(Segment::Index(i));
        Self(segs)
    }

    /// True when `self` equals `other` or lies underneath it.
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            match seg {
                Segment::Key(k) => f.write_str(k)?,
                Segment::Index(n) => write!(f, "{}", n)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    Missing,
    /// Wrong type; holds the expected kind (`string`, `array`, ...).
    Expected(&'static str),
    /// Violated value or cross-field rule.
    Rule(String),
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::Missing => f.write_str("field required"),
            Defect::Expected(kind) => write!(f, "{} expected", kind),
            Defect::Rule(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single structural violation.
pub struct SchemaError {
    pub path: FieldPath,
    pub defect: Defect,
}

impl SchemaError {
    pub fn missing(path: FieldPath) -> Self {
        Self {
            path,
            defect: Defect::Missing,
        }
    }

    pub fn expected(path: FieldPath, kind: &'static str) -> Self {
        Self {
            path,
            defect: Defect::Expected(kind),
        }
    }

    pub fn rule(path: FieldPath, msg: impl Into<String>) -> Self {
        Self {
            path,
            defect: Defect::Rule(msg.into()),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.defect)
    }
}
