//! Output rendering for validation runs.
//!
//! Supports `human` (default) and `json` outputs. The human form is one block
//! per reported validator: a `<<< name >>>` header, then `error:` lines, then
//! `warning:` lines. The JSON form carries the same blocks plus a summary.

use crate::config::OutputMode;
use crate::error::ManifestError;
use crate::models::RunResult;
use crate::utils::{error_prefix, header, use_colors, warning_prefix};
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::{Path, PathBuf};

/// Print a finished run in the requested format.
pub fn print_run(res: &RunResult, output: OutputMode, file: &Path) {
    match output {
        OutputMode::Json => println!("{}", pretty(&compose_run_json(res, file))),
        OutputMode::Human => print!("{}", render_human(res, use_colors())),
    }
}

/// Print a load/save failure as a single line.
pub fn print_error(err: &ManifestError, output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", pretty(&json!({ "error": err.to_string() }))),
        OutputMode::Human => println!("{}", err),
    }
}

/// Human report text (pure, for testing).
pub fn render_human(res: &RunResult, color: bool) -> String {
    let mut out = String::new();
    for r in &res.reports {
        out.push_str(&header(&r.name, color));
        out.push('\n');
        for e in &r.errors {
            out.push_str(&format!("{} {}\n", error_prefix(color), e));
        }
        for w in &r.warnings {
            out.push_str(&format!("{} {}\n", warning_prefix(color), w));
        }
    }
    out
}

/// Compose the JSON report object (pure, for testing).
pub fn compose_run_json(res: &RunResult, file: &Path) -> JsonVal {
    json!({
        "file": display_path(file).to_string_lossy(),
        "validators": res.reports,
        "summary": {
            "errors": res.error_count(),
            "warnings": res.warning_count(),
            "fixed": res.saved,
            "exit_code": res.exit_code(),
        },
    })
}

fn pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

/// `file` relative to the working directory when that is shorter.
fn display_path(file: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(file, cwd))
        .filter(|rel| rel.as_os_str().len() < file.as_os_str().len())
        .unwrap_or_else(|| file.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidatorReport;

    fn sample() -> RunResult {
        RunResult {
            reports: vec![
                ValidatorReport {
                    name: "naming".into(),
                    errors: vec!["should be foo-bar".into()],
                    warnings: vec![],
                    fixable: true,
                },
                ValidatorReport {
                    name: "dependencies".into(),
                    errors: vec!["dependencies #2: expected package name at column 1, found end of input".into()],
                    warnings: vec!["note".into()],
                    fixable: false,
                },
            ],
            errors_occurred: true,
            unfixable_errors: true,
            need_fixing: false,
            saved: false,
        }
    }

    #[test]
    fn test_render_human_blocks() {
        let text = render_human(&sample(), false);
        assert_eq!(
            text,
            "<<< naming >>>\n\
             error: should be foo-bar\n\
             <<< dependencies >>>\n\
             error: dependencies #2: expected package name at column 1, found end of input\n\
             warning: note\n"
        );
    }

    #[test]
    fn test_render_human_empty() {
        assert_eq!(render_human(&RunResult::default(), false), "");
    }

    #[test]
    fn test_compose_run_json_shape() {
        let out = compose_run_json(&sample(), Path::new("/tmp/x/pyproject.toml"));
        assert_eq!(out["summary"]["errors"], 2);
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["summary"]["exit_code"], 1);
        assert_eq!(out["summary"]["fixed"], false);
        assert_eq!(out["validators"][0]["name"], "naming");
        assert_eq!(out["validators"][1]["fixable"], false);
        assert!(out["file"].as_str().unwrap().ends_with("pyproject.toml"));
    }
}
