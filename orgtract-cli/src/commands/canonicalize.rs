//! Canonicalize command: show what the resolver will see for each text

use std::io::{self, BufRead, Write};

use clap::Parser;
use orgtract::TextCanonicalizer;

use super::super::output::format_error;

/// Print the canonical form of each text
#[derive(Parser, Debug)]
pub struct CanonicalizeArgs {
    /// Texts to canonicalize (reads stdin lines when empty)
    #[arg(value_name = "TEXT")]
    pub texts: Vec<String>,

    /// Show every rule that changed the text
    #[arg(long)]
    pub trace: bool,
}

pub fn run(args: CanonicalizeArgs) -> Result<(), String> {
    let canonicalizer = TextCanonicalizer::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.texts.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.map_err(|e| format_error("read stdin", &e.to_string()))?;
            emit(&canonicalizer, &line, args.trace, &mut out)?;
        }
    } else {
        for text in &args.texts {
            emit(&canonicalizer, text, args.trace, &mut out)?;
        }
    }
    Ok(())
}

fn emit<W: Write>(
    canonicalizer: &TextCanonicalizer,
    text: &str,
    trace: bool,
    out: &mut W,
) -> Result<(), String> {
    let write_err = |e: io::Error| format_error("write stdout", &e.to_string());
    if trace {
        writeln!(out, "{}", text).map_err(write_err)?;
        for (step, current) in trace_rules(canonicalizer, text) {
            writeln!(out, "  {:<18} {}", step, current).map_err(write_err)?;
        }
    }
    writeln!(out, "{}", canonicalizer.canonicalize(text)).map_err(write_err)
}

/// Rule names and intermediate text for every rule that changed the input
/// during the first pass.
fn trace_rules(canonicalizer: &TextCanonicalizer, text: &str) -> Vec<(&'static str, String)> {
    let mut steps = Vec::new();
    let mut current = text.to_string();
    for rule in canonicalizer.rules() {
        let next = rule.apply(&current);
        if next != current {
            steps.push((rule.name(), next.clone()));
            current = next;
        }
    }
    steps
}
