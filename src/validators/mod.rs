//! The validator pipeline.
//!
//! Each validator inspects the shared document in `validate`, recording
//! errors/warnings and its `fixable`/`exit_early` flags in an `Outcome`.
//! `fix` is only called when the validator reported errors and stayed
//! fixable; it rewrites the document from state captured during `validate`.

mod dependencies;
mod name;
mod spec;

pub use dependencies::DependencyValidator;
pub use name::NameValidator;
pub use spec::SpecValidator;

use crate::manifest::Document;
use crate::models::Outcome;

/// A single check over the manifest with an optional mechanical fix.
pub trait Validator {
    /// Header used when reporting, e.g. `specs`.
    fn name(&self) -> &'static str;

    /// Inspect `doc` without modifying it.
    fn validate(&mut self, doc: &Document, outcome: &mut Outcome);

    /// Apply the fix computed by the preceding `validate` call.
    fn fix(&self, doc: &mut Document);
}

/// Validators in the order they run.
pub fn registry() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(SpecValidator),
        Box::new(NameValidator::default()),
        Box::new(DependencyValidator::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let names: Vec<_> = registry().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["specs", "naming", "dependencies"]);
    }
}
