//! pyproject-validate binary entry point.
//! Resolves the manifest, runs the validator pipeline, and prints results.

use clap::Parser;
use pyproject_validate::cli::Cli;
use pyproject_validate::config::{self, OutputMode};
use pyproject_validate::lint;
use pyproject_validate::manifest::ManifestFile;
use pyproject_validate::output;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    // Load failures happen before the tool table is known
    let early_output = cli.output.unwrap_or(OutputMode::Human);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let loaded = ManifestFile::resolve(cli.config.as_deref(), &cwd)
        .and_then(|mf| mf.load().map(|doc| (mf, doc)));
    let (manifest, doc) = match loaded {
        Ok(v) => v,
        Err(e) => {
            output::print_error(&e, early_output);
            return ExitCode::from(1);
        }
    };

    let eff = config::resolve_effective(cli.fix, cli.output, &doc);
    match lint::run_lint(&manifest, doc, eff.fix) {
        Ok(result) => {
            output::print_run(&result, eff.output, &manifest.path);
            ExitCode::from(u8::from(result.errors_occurred))
        }
        Err(e) => {
            output::print_error(&e, eff.output);
            ExitCode::from(1)
        }
    }
}
