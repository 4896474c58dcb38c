//! Evaluation of the declarative schema in `models::schema`.
//!
//! Each section is checked field by field first, then its cross-field rules
//! run. All violations are collected; nothing short-circuits except that a
//! rule is skipped when the fields it reads are themselves malformed.

use crate::models::schema::{
    FieldPath, Presence, SchemaError, SectionRule, SectionSpec, Shape, README_CONTENT_TYPES,
    README_EXTENSIONS, SECTIONS,
};
use toml::{Table, Value};

/// Check every schema section of `doc`, returning violations in report order.
pub fn check_document(doc: &Table) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    for section in SECTIONS {
        check_section(doc, section, &mut errors);
    }
    errors
}

/// Check one section. A missing section is treated as an empty table.
pub fn check_section(doc: &Table, spec: &SectionSpec, errors: &mut Vec<SchemaError>) {
    let path = FieldPath::root(spec.key);
    let empty = Table::new();
    let table = match doc.get(spec.key) {
        None => &empty,
        Some(Value::Table(t)) => t,
        Some(_) => {
            errors.push(SchemaError::expected(path, "table"));
            return;
        }
    };

    for field in spec.fields {
        let field_path = path.key(field.key);
        match table.get(field.key) {
            Some(value) => check_shape(value, field.shape, &field_path, errors),
            None if field.presence == Presence::Required => {
                errors.push(SchemaError::missing(field_path))
            }
            None => {}
        }
    }

    for rule in spec.rules {
        match rule {
            SectionRule::DynamicFields => check_dynamic_fields(table, spec, &path, errors),
        }
    }
}

fn check_shape(value: &Value, shape: Shape, path: &FieldPath, errors: &mut Vec<SchemaError>) {
    match shape {
        Shape::String => {
            expect_str(value, path, errors);
        }
        Shape::StringArray => {
            string_array(value, path, errors);
        }
        Shape::StringTable => {
            if let Some(t) = expect_table(value, path, errors) {
                for (k, v) in t {
                    expect_str(v, &path.key(k), errors);
                }
            }
        }
        Shape::NestedStringTable => {
            if let Some(t) = expect_table(value, path, errors) {
                for (group, entries) in t {
                    check_shape(entries, Shape::StringTable, &path.key(group), errors);
                }
            }
        }
        Shape::StringArrayTable => {
            if let Some(t) = expect_table(value, path, errors) {
                for (k, v) in t {
                    string_array(v, &path.key(k), errors);
                }
            }
        }
        Shape::People => {
            if let Some(items) = expect_array(value, path, errors) {
                for (i, item) in items.iter().enumerate() {
                    let item_path = path.index(i);
                    if let Some(person) = expect_table(item, &item_path, errors) {
                        optional_str(person, "email", &item_path, errors);
                        optional_str(person, "name", &item_path, errors);
                    }
                }
            }
        }
        Shape::License => match value {
            Value::String(_) => {}
            Value::Table(t) => {
                optional_str(t, "file", path, errors);
                optional_str(t, "text", path, errors);
                file_xor_text(t, path, errors);
            }
            _ => errors.push(SchemaError::expected(path.clone(), "string or table")),
        },
        Shape::LicenseFiles => {
            if let Some(t) = expect_table(value, path, errors) {
                for key in ["globs", "paths"] {
                    if let Some(v) = t.get(key) {
                        string_array(v, &path.key(key), errors);
                    }
                }
                if !t.contains_key("globs") && !t.contains_key("paths") {
                    errors.push(SchemaError::rule(
                        path.clone(),
                        "must contain either a `globs` or `paths` field",
                    ));
                }
            }
        }
        Shape::Readme => check_readme(value, path, errors),
        Shape::Dynamic => {
            if let Some(list) = string_array(value, path, errors) {
                if list.contains(&"name") {
                    errors.push(SchemaError::rule(
                        path.clone(),
                        "the `name` field must not be listed as dynamic",
                    ));
                }
            }
        }
    }
}

fn check_readme(value: &Value, path: &FieldPath, errors: &mut Vec<SchemaError>) {
    match value {
        Value::String(s) => {
            let lower = s.to_lowercase();
            if !README_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
                errors.push(SchemaError::rule(
                    path.clone(),
                    format!(
                        "must have one of the following extensions: {}",
                        README_EXTENSIONS.join(", ")
                    ),
                ));
            }
        }
        Value::Table(t) => {
            optional_str(t, "charset", path, errors);
            let ct_path = path.key("content-type");
            match t.get("content-type") {
                None => errors.push(SchemaError::missing(ct_path)),
                Some(v) => {
                    if let Some(ct) = expect_str(v, &ct_path, errors) {
                        if !README_CONTENT_TYPES.contains(&ct) {
                            errors.push(SchemaError::rule(
                                ct_path,
                                format!("must be one of: {}", README_CONTENT_TYPES.join(", ")),
                            ));
                        }
                    }
                }
            }
            optional_str(t, "file", path, errors);
            optional_str(t, "text", path, errors);
            file_xor_text(t, path, errors);
        }
        _ => errors.push(SchemaError::expected(path.clone(), "string or table")),
    }
}

fn file_xor_text(t: &Table, path: &FieldPath, errors: &mut Vec<SchemaError>) {
    match (t.contains_key("file"), t.contains_key("text")) {
        (true, true) => errors.push(SchemaError::rule(
            path.clone(),
            "cannot contain both a `file` and `text` field",
        )),
        (false, false) => errors.push(SchemaError::rule(
            path.clone(),
            "must contain either a `file` or `text` field",
        )),
        _ => {}
    }
}

/// `dynamic` against the static fields of the section. Skipped when
/// `dynamic` itself failed its field check.
fn check_dynamic_fields(
    table: &Table,
    spec: &SectionSpec,
    path: &FieldPath,
    errors: &mut Vec<SchemaError>,
) {
    let dynamic_path = path.key("dynamic");
    if errors.iter().any(|e| e.path.starts_with(&dynamic_path)) {
        return;
    }
    let dynamic: Vec<&str> = table
        .get("dynamic")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let missing: Vec<&str> = spec
        .fields
        .iter()
        .filter(|f| f.presence == Presence::RequiredUnlessDynamic)
        .filter(|f| !table.contains_key(f.key) && !dynamic.contains(&f.key))
        .map(|f| f.key)
        .collect();
    if !missing.is_empty() {
        errors.push(SchemaError::rule(
            path.clone(),
            format!("missing field(s): {}", missing.join(", ")),
        ));
    }

    let redefined: Vec<&str> = spec
        .fields
        .iter()
        .filter(|f| f.key != "dynamic")
        .filter(|f| table.contains_key(f.key) && dynamic.contains(&f.key))
        .map(|f| f.key)
        .collect();
    if !redefined.is_empty() {
        errors.push(SchemaError::rule(
            path.clone(),
            format!(
                "field(s) defined but also listed as dynamic: {}",
                redefined.join(", ")
            ),
        ));
    }
}

fn expect_str<'a>(
    value: &'a Value,
    path: &FieldPath,
    errors: &mut Vec<SchemaError>,
) -> Option<&'a str> {
    let s = value.as_str();
    if s.is_none() {
        errors.push(SchemaError::expected(path.clone(), "string"));
    }
    s
}

fn expect_array<'a>(
    value: &'a Value,
    path: &FieldPath,
    errors: &mut Vec<SchemaError>,
) -> Option<&'a Vec<Value>> {
    let a = value.as_array();
    if a.is_none() {
        errors.push(SchemaError::expected(path.clone(), "array"));
    }
    a
}

fn expect_table<'a>(
    value: &'a Value,
    path: &FieldPath,
    errors: &mut Vec<SchemaError>,
) -> Option<&'a Table> {
    let t = value.as_table();
    if t.is_none() {
        errors.push(SchemaError::expected(path.clone(), "table"));
    }
    t
}

/// Array whose items are all strings; `None` if any item is not.
fn string_array<'a>(
    value: &'a Value,
    path: &FieldPath,
    errors: &mut Vec<SchemaError>,
) -> Option<Vec<&'a str>> {
    let items = expect_array(value, path, errors)?;
    let mut out = Vec::with_capacity(items.len());
    let mut ok = true;
    for (i, item) in items.iter().enumerate() {
        match expect_str(item, &path.index(i), errors) {
            Some(s) => out.push(s),
            None => ok = false,
        }
    }
    ok.then_some(out)
}

fn optional_str(t: &Table, key: &str, path: &FieldPath, errors: &mut Vec<SchemaError>) {
    if let Some(v) = t.get(key) {
        expect_str(v, &path.key(key), errors);
    }
}
