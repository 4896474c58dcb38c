//! Effective settings resolution.
//!
//! Settings come from CLI flags and the manifest's own
//! `[tool.pyproject-validate]` table. Defaults:
//! - `fix`: false
//! - `output`: `human`
//!
//! Overrides precedence: CLI > tool table > defaults.

use crate::manifest::Document;
use serde::Deserialize;
use tracing::warn;

/// Key of this tool's table under `[tool]`.
pub const TOOL_KEY: &str = "pyproject-validate";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
/// Report rendering mode.
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
/// `[tool.pyproject-validate]` as written in the manifest.
pub struct ToolConfig {
    pub fix: Option<bool>,
    pub output: Option<OutputMode>,
}

#[derive(Debug, Clone, Copy)]
/// Fully-resolved settings used by a run after applying precedence.
pub struct Effective {
    pub fix: bool,
    pub output: OutputMode,
}

/// Read the tool table from `doc`. An absent table yields defaults; an
/// unusable one is logged and ignored.
pub fn load_tool_config(doc: &Document) -> ToolConfig {
    let Some(value) = doc.get("tool").and_then(|t| t.get(TOOL_KEY)) else {
        return ToolConfig::default();
    };
    match ToolConfig::deserialize(value.clone()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "ignoring invalid [tool.{}] table", TOOL_KEY);
            ToolConfig::default()
        }
    }
}

/// Resolve `Effective` by merging CLI flags, the tool table, and defaults.
///
/// `--fix` can only switch fixing on; without it the tool table decides.
pub fn resolve_effective(
    cli_fix: bool,
    cli_output: Option<OutputMode>,
    doc: &Document,
) -> Effective {
    let cfg = load_tool_config(doc);
    let fix = cli_fix || cfg.fix.unwrap_or(false);
    let output = cli_output.or(cfg.output).unwrap_or_default();
    Effective { fix, output }
}
