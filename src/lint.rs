//! Pipeline runner: validate, report, fix, and decide on persistence.
//!
//! Produces a `RunResult` holding the validator blocks selected for
//! printing and the aggregate flags that drive the exit code. The document
//! is only written when every erroring validator was fixable and fixed.

use crate::error::ManifestError;
use crate::manifest::{Document, ManifestFile};
use crate::models::{Outcome, RunResult, ValidatorReport};
use crate::validators::{registry, Validator};
use tracing::debug;

/// Run `validators` in order against `doc`, applying fixes in memory when
/// `fix` is set. Does not touch the filesystem.
pub fn run_validators(
    doc: &mut Document,
    validators: &mut [Box<dyn Validator>],
    fix: bool,
) -> RunResult {
    let mut result = RunResult::default();
    for validator in validators.iter_mut() {
        let mut outcome = Outcome::default();
        validator.validate(doc, &mut outcome);
        debug!(
            validator = validator.name(),
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            fixable = outcome.fixable,
            exit_early = outcome.exit_early,
            "validated"
        );

        // Fixable findings are silent in fix mode; unfixable ones always print
        if (!outcome.is_clean() && !fix) || !outcome.fixable {
            result.reports.push(ValidatorReport {
                name: validator.name().to_string(),
                errors: outcome.errors.clone(),
                warnings: outcome.warnings.clone(),
                fixable: outcome.fixable,
            });
        }

        if outcome.errors.is_empty() {
            continue;
        }
        result.errors_occurred = true;
        if fix && outcome.fixable {
            validator.fix(doc);
            result.need_fixing = true;
        } else {
            result.unfixable_errors = true;
            if outcome.exit_early {
                debug!(validator = validator.name(), "stopping pipeline");
                break;
            }
        }
    }
    result
}

/// Run the registered validators over `doc` and write it back through
/// `manifest` when the run fixed everything it found.
pub fn run_lint(
    manifest: &ManifestFile,
    mut doc: Document,
    fix: bool,
) -> Result<RunResult, ManifestError> {
    let mut validators = registry();
    let mut result = run_validators(&mut doc, &mut validators, fix);
    if result.should_save() {
        manifest.save(&doc)?;
        result.mark_saved();
    }
    Ok(result)
}
