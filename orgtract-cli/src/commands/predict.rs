//! Predict command: resolve the organization of every row in a CSV ledger

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use is_terminal::IsTerminal;

use orgtract::{
    CommandExtractor, Disambiguator, Extractor, LexiconExtractor, PromptDisambiguator, Resolver,
    ResolverConfig, SkipDisambiguator, SuffixExtractor,
};

use super::super::output::{
    default_output_column, format_error, output_path, print_summary, write_table, OutputLayout,
};
use super::super::parser::{CacheArg, ExtractorKind};
use super::super::progress::ProgressObserver;
use super::super::prompt::{choose_column, choose_output_column, choose_separator};
use super::super::table::{self, DEFAULT_SEPARATOR};

/// Resolve the organization of every row in a CSV file
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Input CSV file
    #[arg(short, long, value_name = "PATH")]
    pub data: PathBuf,

    /// Output file, or an existing directory to write `<input stem>.csv` into
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Column holding the ledger description
    #[arg(long, value_name = "COLUMN")]
    pub src_col: Option<String>,

    /// Column to write labels into [default: <SRC>_OUTPUT]
    #[arg(long, value_name = "COLUMN")]
    pub out_col: Option<String>,

    /// Separator: SEMICOLON, COMMA, TAB, PIPE or a single character
    #[arg(long, value_name = "SEP")]
    pub sep: Option<String>,

    /// Line index of the header row (discovered when absent)
    #[arg(long, value_name = "N")]
    pub start_header: Option<usize>,

    /// Max containing labels accepted for a merge (<= 0 disables)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_variation: Option<i64>,

    /// Cache strategy
    #[arg(long, value_enum)]
    pub cache: Option<CacheArg>,

    /// Extraction threads
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Candidate extractor
    #[arg(short, long, value_enum, default_value_t = ExtractorKind::Suffix)]
    pub extractor: ExtractorKind,

    /// Known organization names, one per line (for --extractor lexicon)
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<PathBuf>,

    /// External extractor command line (for --extractor command)
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,

    /// Resolver settings in TOML; flags override file values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append a RESOLUTION_STATE column
    #[arg(long)]
    pub audit: bool,

    /// Never prompt; unanswered questions are skipped
    #[arg(long)]
    pub no_interactive: bool,

    /// Write run statistics as JSON
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl PredictArgs {
    fn resolver_config(&self) -> Result<ResolverConfig, String> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::from_toml_file(path).map_err(|e| e.to_string())?,
            None => ResolverConfig::default(),
        };
        if let Some(v) = self.max_variation {
            config = config.with_max_variation(v);
        }
        if let Some(cache) = self.cache {
            config = config.with_cache_mode(cache.into());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if self.no_interactive {
            config = config.with_interactive(false);
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    fn build_extractor(&self) -> Result<Box<dyn Extractor>, String> {
        let extractor: Box<dyn Extractor> = match self.extractor {
            ExtractorKind::Suffix => Box::new(SuffixExtractor::new()),
            ExtractorKind::Lexicon => {
                let path = self
                    .lexicon
                    .as_ref()
                    .ok_or("--extractor lexicon needs --lexicon <PATH>")?;
                Box::new(LexiconExtractor::from_file(path).map_err(|e| e.to_string())?)
            }
            ExtractorKind::Command => {
                let line = self
                    .command
                    .as_deref()
                    .ok_or("--extractor command needs --command <CMD>")?;
                Box::new(CommandExtractor::from_command_line(line).map_err(|e| e.to_string())?)
            }
        };
        Ok(extractor)
    }
}

pub fn run(args: PredictArgs, quiet: bool) -> Result<(), String> {
    let start = Instant::now();
    if !args.data.is_file() {
        return Err(format_error(
            "invalid input",
            &format!("{} is not a file", args.data.display()),
        ));
    }

    let mut config = args.resolver_config()?;
    let terminal = io::stdin().is_terminal();
    if config.interactive && !terminal {
        log::debug!("stdin is not a terminal; prompts disabled");
        config = config.with_interactive(false);
    }
    let interactive = config.interactive;

    let separator = match &args.sep {
        Some(sep) => table::parse_separator(sep).map_err(|e| e.to_string())?,
        None if interactive => choose_separator(&mut io::stdin().lock(), &mut io::stderr())?,
        None => DEFAULT_SEPARATOR,
    };

    let text = table::read_text(&args.data).map_err(|e| e.to_string())?;
    let start_header = args
        .start_header
        .unwrap_or_else(|| table::discover_header(&text, separator, args.src_col.as_deref()));
    log::debug!("header row at line {}", start_header);
    let table = table::parse(&text, separator, start_header).map_err(|e| e.to_string())?;

    let source_index = match &args.src_col {
        Some(name) => table.column(name).map_err(|e| e.to_string())?,
        None if table.headers.len() == 1 => 0,
        None if interactive => choose_column(
            "Select the source column",
            &table.headers,
            &mut io::stdin().lock(),
            &mut io::stderr(),
        )?,
        None => {
            return Err(format!(
                "Invalid input: --src-col is required (columns: {})",
                table.headers.join(", ")
            ))
        }
    };
    let source_name = table.headers[source_index].trim().to_string();

    let default_column = default_output_column(&source_name);
    let output_column = match &args.out_col {
        Some(name) if !name.trim().is_empty() => name.clone(),
        _ if interactive => {
            choose_output_column(&default_column, &mut io::stdin().lock(), &mut io::stderr())?
        }
        _ => default_column,
    };

    let extractor = args.build_extractor()?;
    log::info!(
        "Resolving {} rows of '{}' with the {} extractor",
        table.rows.len(),
        source_name,
        extractor.name()
    );

    let observer = ProgressObserver::new(!quiet && io::stderr().is_terminal());
    let mut disambiguator: Box<dyn Disambiguator> = if interactive {
        Box::new(PromptDisambiguator::new(io::stdin().lock(), io::stderr()))
    } else {
        Box::new(SkipDisambiguator)
    };
    let resolution = Resolver::new(config, &*extractor)
        .with_observer(&observer)
        .resolve_fields(table.fields(source_index), &mut *disambiguator);
    observer.finish();
    let resolution = resolution.map_err(|e| e.to_string())?;

    let path = output_path(&args.output, &args.data);
    let layout = OutputLayout {
        separator,
        source_index,
        output_column: &output_column,
        audit: args.audit,
    };
    log::info!("Saving output file: {}", path.display());
    write_table(&path, &table, resolution.records_by_input_order(), &layout)?;

    if let Some(report) = &args.report {
        let json = serde_json::to_string_pretty(&resolution.stats)
            .map_err(|e| format_error("serialize report", &e.to_string()))?;
        fs::write(report, json)
            .map_err(|e| format_error("write report", &format!("{}: {}", report.display(), e)))?;
    }

    if !quiet {
        print_summary(&resolution.stats, resolution.organizations(), &path);
    }
    log::info!("Done in {:.2?}", start.elapsed());
    Ok(())
}
