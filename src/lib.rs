//! Shared plumbing for the `glycan-builder` and `glycheck` command-line tools

use std::{fs, path::Path};

use glycan::Catalog;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, IntoDiagnostic, Result, WrapErr};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr, filtered by `RUST_LOG`, with everything from DEBUG up let through when `verbose` is set
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the catalog at `path`, or falls back to the one bundled with the `glycan` crate
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let Some(path) = path else {
        debug!("using the bundled glycan catalog");
        return Ok(Catalog::default());
    };

    let kdl = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read the glycan catalog at {}", path.display()))?;
    Catalog::new(path.display().to_string(), kdl)
}

pub fn render_error(diagnostic: &dyn Diagnostic) -> String {
    let mut buf = String::new();
    // SAFETY: Writing to a `String` can't fail, and every label in these diagnostics points inside its own source
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode())
        .render_report(&mut buf, diagnostic)
        .unwrap();
    buf
}
