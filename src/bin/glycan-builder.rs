use std::path::PathBuf;

use clap::Parser;
use glycan::{Catalog, GlycanBuilder, TokenKind};
use glycanbench::{init_logging, load_catalog, render_error};
use itertools::Itertools;
use miette::{IntoDiagnostic, Result};
use rustyline::DefaultEditor;

/// Interactively build a glycan sequence, one sugar, bond, or branch symbol at a time
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// A KDL file of sugars and bonds to use instead of the bundled catalog
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

const HELP: &str = "\
Enter whitespace-separated tokens to add them to the sequence: sugars (like Glc),
bonds (like (b1-4) or b1-4), and the branch symbols ( ) [ ]

Commands:
  :clear      start over with an empty sequence
  :status     show the sequence, and what can be added next
  :check      check that every branch is properly closed
  :sugars     list every sugar in the catalog
  :bonds      list every bond in the catalog
  :load SEQ   replace the sequence with a serialized one, like Gal(b1-4)GlcNAc
  :submit     show the requests that would be sent for this sequence
  :help       show this message
";

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let catalog = load_catalog(args.catalog.as_deref())?;

    let mut builder = GlycanBuilder::new(&catalog);
    let mut rl = DefaultEditor::new().into_diagnostic()?;
    println!("{HELP}");
    while let Ok(line) = rl.readline(&prompt(&builder)) {
        rl.add_history_entry(&line).into_diagnostic()?;
        match line.trim().split_once(' ').unwrap_or((line.trim(), "")) {
            ("", _) => (),
            (":clear", _) => {
                builder.clear();
                println!("Cleared the sequence\n");
            }
            (":status", _) => print!("{}", status(&builder)),
            (":check", _) => match builder.sequence().bracket_report() {
                Ok(()) => println!("Every branch is properly closed\n"),
                Err(error) => println!("{}", render_error(&error)),
            },
            (":sugars", _) => print!("{}", sugars(&catalog)),
            (":bonds", _) => println!("{}\n", catalog.bonds().iter().join(" ")),
            (":load", sequence) => match GlycanBuilder::load(&catalog, sequence.trim()) {
                Ok(loaded) => {
                    builder = loaded;
                    print!("{}", status(&builder));
                }
                Err(error) => println!("{}", render_error(error.as_ref())),
            },
            (":submit", _) => submit(&builder),
            (":help", _) => println!("{HELP}"),
            (command, _) if command.starts_with(':') => {
                println!("Unknown command {command:?}, try :help\n");
            }
            _ => add_tokens(&mut builder, &line),
        }
    }

    Ok(())
}

fn add_tokens(builder: &mut GlycanBuilder, line: &str) {
    for text in line.split_whitespace() {
        if let Err(error) = builder.add(text) {
            println!("{}", render_error(error.as_ref()));
            return;
        }
    }
    println!("{}\n", builder.serialize());
}

fn prompt(builder: &GlycanBuilder) -> String {
    let next = next_kinds(builder).iter().join(" | ");
    format!("{} [{next}]> ", builder.serialize())
}

fn next_kinds(builder: &GlycanBuilder) -> Vec<TokenKind> {
    [TokenKind::Sugar, TokenKind::Bond, TokenKind::Branch]
        .into_iter()
        .filter(|&kind| builder.can_add(kind))
        .collect()
}

fn status(builder: &GlycanBuilder) -> String {
    let sequence = builder.sequence();
    let mut buf = format!(
        "Sequence: {}\nTokens: {}\nNext: {}\n",
        sequence,
        sequence.len(),
        next_kinds(builder).iter().join(", ")
    );
    if let Some(rejection) = builder.rejection() {
        buf.push_str(&format!("Last rejection: {rejection}\n"));
    }
    buf.push('\n');
    buf
}

fn sugars(catalog: &Catalog) -> String {
    let mut buf = String::new();
    for (class, sugars) in &catalog.sugars().chunk_by(|sugar| sugar.class()) {
        buf.push_str(&format!("{class}: {}\n", sugars.map(|s| s.abbr()).join(" ")));
    }
    buf.push('\n');
    buf
}

fn submit(builder: &GlycanBuilder) {
    let submission = match builder.submission() {
        Ok(submission) => submission,
        Err(error) => {
            println!("{}", render_error(error.as_ref()));
            return;
        }
    };

    let requests = [
        ("draw", serde_json::to_string(&submission.draw_request())),
        ("convert", serde_json::to_string(&submission.convert_request())),
        ("visualize", serde_json::to_string(&submission.structure_request())),
    ];
    for (service, request) in requests {
        match request {
            Ok(json) => println!("{service}: {json}"),
            Err(error) => println!("{service}: failed to serialize request: {error}"),
        }
    }
    println!();
}
