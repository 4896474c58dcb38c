//! `project.name` validation and normalization.

use super::Validator;
use crate::manifest::Document;
use crate::models::Outcome;
use crate::normalize::{is_valid_project_name, normalize_project_name};
use toml::Value;

#[derive(Default)]
pub struct NameValidator {
    canonical: Option<String>,
}

impl Validator for NameValidator {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn validate(&mut self, doc: &Document, outcome: &mut Outcome) {
        self.canonical = None;
        let name = match doc
            .get("project")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
        {
            Some(n) => n,
            // Already reported by the schema checks
            None => return,
        };

        if !is_valid_project_name(name) {
            outcome.unfixable(
                "must only contain ASCII letters/digits, underscores, hyphens, and periods",
            );
            return;
        }

        let canonical = normalize_project_name(name);
        if canonical != name {
            outcome.error(format!("should be {}", canonical));
            self.canonical = Some(canonical);
        }
    }

    fn fix(&self, doc: &mut Document) {
        let Some(canonical) = &self.canonical else {
            return;
        };
        if let Some(Value::Table(project)) = doc.get_mut("project") {
            project.insert("name".to_string(), Value::String(canonical.clone()));
        }
    }
}
