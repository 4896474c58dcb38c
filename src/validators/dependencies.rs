//! Normalization and ordering of `dependencies` and `optional-dependencies`.

use super::Validator;
use crate::manifest::Document;
use crate::models::Outcome;
use crate::normalize::canonical_specifier;
use toml::{Table, Value};
use tracing::debug;

#[derive(Default)]
pub struct DependencyValidator {
    dependencies: Option<Vec<String>>,
    optional: Vec<(String, Vec<String>)>,
}

impl Validator for DependencyValidator {
    fn name(&self) -> &'static str {
        "dependencies"
    }

    fn validate(&mut self, doc: &Document, outcome: &mut Outcome) {
        self.dependencies = None;
        self.optional.clear();
        let Some(project) = doc.get("project").and_then(Value::as_table) else {
            return;
        };

        if let Some(deps) = project.get("dependencies").and_then(Value::as_array) {
            let raw = strings(deps);
            self.dependencies = Some(check_list(&raw, "dependencies", outcome));
        }

        if let Some(groups) = project
            .get("optional-dependencies")
            .and_then(Value::as_table)
        {
            for (group, deps) in groups {
                let Some(deps) = deps.as_array() else {
                    continue;
                };
                let raw = strings(deps);
                let prefix = format!("optional `{}` dependencies", group);
                let normalized = check_list(&raw, &prefix, outcome);
                self.optional.push((group.clone(), normalized));
            }
        }
    }

    fn fix(&self, doc: &mut Document) {
        let Some(Value::Table(project)) = doc.get_mut("project") else {
            return;
        };
        if let Some(deps) = &self.dependencies {
            project.insert("dependencies".to_string(), string_array(deps));
        }
        if !self.optional.is_empty() {
            let mut groups = Table::new();
            for (group, deps) in &self.optional {
                groups.insert(group.clone(), string_array(deps));
            }
            project.insert("optional-dependencies".to_string(), Value::Table(groups));
        }
    }
}

/// Validate one list, returning its normalized and sorted form.
///
/// Entries that fail to parse are reported, make the validator unfixable,
/// and are left out of the returned list. The ordering check only runs when
/// every entry parsed and was already canonical.
fn check_list(raw: &[&str], prefix: &str, outcome: &mut Outcome) -> Vec<String> {
    let mut normalized = Vec::with_capacity(raw.len());
    let mut entry_errors = false;
    for (i, spec) in raw.iter().enumerate() {
        let pos = i + 1;
        match canonical_specifier(spec) {
            Ok(canonical) => {
                if canonical != *spec {
                    entry_errors = true;
                    outcome.error(format!("{} #{} should be: {}", prefix, pos, canonical));
                }
                normalized.push(canonical);
            }
            Err(e) => {
                debug!(prefix, pos, error = %e, "unparseable dependency specifier");
                entry_errors = true;
                outcome.unfixable(format!("{} #{}: {}", prefix, pos, e));
            }
        }
    }
    normalized.sort();
    if !entry_errors && !raw.iter().copied().eq(normalized.iter().map(String::as_str)) {
        outcome.error(format!("{} are not sorted", prefix));
    }
    normalized
}

// Non-string items are reported by the schema checks, which stop the pipeline.
fn strings(values: &[Value]) -> Vec<&str> {
    values.iter().filter_map(Value::as_str).collect()
}

fn string_array(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}
