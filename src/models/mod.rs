//! Shared data models for validator outcomes and run results.

pub mod schema;

use serde::Serialize;

#[derive(Debug, Clone)]
/// What one validator found during one `validate` call.
///
/// `fixable` starts true and only ever flips to false; `exit_early` starts
/// false and only ever flips to true.
pub struct Outcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub fixable: bool,
    pub exit_early: bool,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            fixable: true,
            exit_early: false,
        }
    }
}

impl Outcome {
    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Record an error that `fix` cannot resolve.
    pub fn unfixable(&mut self, msg: impl Into<String>) {
        self.fixable = false;
        self.error(msg);
    }

    pub fn request_exit_early(&mut self) {
        self.exit_early = true;
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
/// A validator block selected for printing.
pub struct ValidatorReport {
    pub name: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub fixable: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
/// Aggregate state of one pass over the validator pipeline.
pub struct RunResult {
    pub reports: Vec<ValidatorReport>,
    pub errors_occurred: bool,
    pub unfixable_errors: bool,
    pub need_fixing: bool,
    /// Set once the fixed document has been written back.
    pub saved: bool,
}

impl RunResult {
    /// Fixes were applied and nothing unfixable was seen anywhere.
    pub fn should_save(&self) -> bool {
        self.need_fixing && !self.unfixable_errors
    }

    /// A successful fix run reports success even though errors existed.
    pub fn mark_saved(&mut self) {
        self.saved = true;
        self.errors_occurred = false;
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.errors_occurred)
    }

    pub fn error_count(&self) -> usize {
        self.reports.iter().map(|r| r.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.reports.iter().map(|r| r.warnings.len()).sum()
    }
}
