use std::{
    io::{self, BufRead},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use glycan::{Catalog, GlycanBuilder};
use glycanbench::{init_logging, load_catalog, render_error};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

/// Check that glycan sequences are well-formed and that all of their branches are closed
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// A KDL file of sugars and bonds to use instead of the bundled catalog
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Sequences to check, one per argument; read from stdin (one per line) if none are given
    sequences: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);
    let catalog = load_catalog(args.catalog.as_deref())?;

    let sequences = if args.sequences.is_empty() {
        debug!("reading sequences from stdin");
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .into_diagnostic()?
    } else {
        args.sequences
    };

    let mut failures = 0;
    let mut checked = 0;
    for sequence in sequences.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        checked += 1;
        if let Err(report) = check(&catalog, sequence) {
            failures += 1;
            eprintln!("{report}");
        } else {
            println!("ok: {sequence}");
        }
    }
    info!(checked, failures, "finished checking glycan sequences");

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Returns a rendered report of the first problem found with `sequence`
fn check(catalog: &Catalog, sequence: &str) -> Result<(), String> {
    let builder = GlycanBuilder::load(catalog, sequence).map_err(|e| render_error(e.as_ref()))?;
    builder
        .sequence()
        .bracket_report()
        .map_err(|e| render_error(&e))
}
