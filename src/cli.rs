//! CLI argument parsing via `clap`.

use crate::config::OutputMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pyproject-validate",
    version,
    about = "Validate and auto-fix pyproject.toml metadata",
    long_about = "Validate pyproject.toml metadata against the packaging specification.\n\nThe manifest is found by walking upward from the current directory unless --config is given. With --fix, fixable problems are corrected and the file is rewritten, but only when nothing unfixable was found.\n\nConfiguration precedence: CLI > [tool.pyproject-validate] > defaults.",
    after_help = "Examples:\n  pyproject-validate\n  pyproject-validate --fix\n  pyproject-validate --config path/to/pyproject.toml --output json"
)]
/// Top-level CLI options. There are no subcommands.
pub struct Cli {
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Apply fixes and rewrite the manifest when safe")]
    pub fix: bool,
    #[arg(long, value_name = "PATH", help = "Path to pyproject.toml (default: search upward from current dir)")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, help = "Output mode: human|json (default: human)")]
    pub output: Option<OutputMode>,
}
