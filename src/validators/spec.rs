//! Structural checks against the declarative schema.

use super::Validator;
use crate::checks::check_document;
use crate::manifest::Document;
use crate::models::Outcome;

/// Reports schema violations. Never fixable; any error stops the pipeline,
/// since later validators assume well-formed `project` fields.
pub struct SpecValidator;

impl Validator for SpecValidator {
    fn name(&self) -> &'static str {
        "specs"
    }

    fn validate(&mut self, doc: &Document, outcome: &mut Outcome) {
        let errors = check_document(doc);
        if errors.is_empty() {
            return;
        }
        outcome.request_exit_early();
        for e in errors {
            outcome.unfixable(e.to_string());
        }
    }

    fn fix(&self, _doc: &mut Document) {}
}
