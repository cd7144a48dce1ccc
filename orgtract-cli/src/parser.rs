//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{CanonicalizeArgs, PredictArgs};

/// Canonical organization names for noisy ledger descriptions
#[derive(Parser)]
#[command(name = "orgtract")]
#[command(
    author,
    version,
    about = "Canonical organization names for noisy ledger descriptions",
    long_about = r#"
orgtract - resolve the organization behind each ledger description

PIPELINE:
  canonicalize  -> uppercase, separators, reference codes, legal suffixes
  extract       -> candidate names from the configured extractor
  merge         -> fold labels contained in a longer label (--max-variation)
  fallback      -> reuse known labels found inside unresolved text
  disambiguate  -> ask the operator about multi-candidate records

EXTRACTORS:
  suffix   - spans ending in a legal-entity abbreviation (LTDA, S.A, B.V, ...)
  lexicon  - known organization names from a file (--lexicon)
  command  - external NER process speaking one JSON array per line (--command)

EXAMPLES:
  orgtract predict --data ledger.csv --output out/ --src-col HISTORICO --sep SEMICOLON
  orgtract predict -d ledger.csv -o out.csv --src-col desc --max-variation 2 --no-interactive
  orgtract canonicalize "Pagto NF.1234- Acme Ltda - ME"
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug-level logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the organization of every row in a CSV file
    #[command(visible_alias = "p")]
    Predict(PredictArgs),

    /// Print the canonical form of each text
    #[command(visible_alias = "c")]
    Canonicalize(CanonicalizeArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Which candidate extractor feeds the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExtractorKind {
    /// Legal-entity suffix heuristic
    #[default]
    Suffix,
    /// Gazetteer of known names (requires --lexicon)
    Lexicon,
    /// External process (requires --command)
    Command,
}

/// Cache strategy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheArg {
    /// Reuse the previous record's label after sorting
    Adjacent,
    /// Remember every canonical text seen in the run
    Memo,
}

impl From<CacheArg> for orgtract::CacheMode {
    fn from(arg: CacheArg) -> Self {
        match arg {
            CacheArg::Adjacent => orgtract::CacheMode::Adjacent,
            CacheArg::Memo => orgtract::CacheMode::Memo,
        }
    }
}
