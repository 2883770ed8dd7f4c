//! cidian command-line front end.
//!
//! Usage:
//!   cidian --snapshot data/lexicon.bincode lookup 你好
//!   cidian --redb data/lexicon.redb lookup car --page 2 --page-size 10
//!   cidian classify ni3hao3
//!   cidian variants nihao
//!   cidian --snapshot data/lexicon.bincode interactive

use anyhow::Context;
use cidian::{Engine, InputClassifier, LookupConfig, PinyinVariantGenerator, SyllableTable};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cidian")]
#[command(about = "Look up Chinese, pinyin or English queries in a bilingual lexicon")]
struct Cli {
    /// Bincode lexicon snapshot (from import_cedict --snapshot)
    #[arg(long, global = true, conflicts_with = "redb")]
    snapshot: Option<PathBuf>,

    /// Redb lexicon database (from import_cedict --redb)
    #[arg(long, global = true)]
    redb: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a query and print the JSON response
    Lookup {
        text: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Defaults to the configured page size
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Print the detected input category
    Classify { text: String },
    /// Print the pinyin variants tried for a query
    Variants { text: String },
    /// Read queries from stdin, one per line
    Interactive,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LookupConfig> {
    match path {
        Some(p) => LookupConfig::load_toml(p)
            .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", p.display(), e)),
        None => Ok(LookupConfig::default()),
    }
}

fn open_engine(cli: &Cli, config: LookupConfig) -> anyhow::Result<Engine> {
    if let Some(path) = &cli.snapshot {
        return Engine::from_snapshot(path, config)
            .with_context(|| format!("failed to load snapshot {}", path.display()));
    }
    if let Some(path) = &cli.redb {
        return Engine::from_redb(path, config)
            .with_context(|| format!("failed to open redb lexicon {}", path.display()));
    }
    anyhow::bail!("a lexicon is required: pass --snapshot <file> or --redb <file>")
}

fn print_lookup(
    engine: &Engine,
    text: &str,
    page: usize,
    page_size: usize,
) -> anyhow::Result<()> {
    let response = engine.lookup(text, page, page_size)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn run_interactive(engine: &Engine) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            write!(stdout, "> ")?;
            stdout.flush()?;
            continue;
        }
        match engine.lookup_first_page(input) {
            Ok(resp) => {
                println!(
                    "[{}] {} of {} results",
                    resp.input_type,
                    resp.results.len(),
                    resp.pagination.total_count
                );
                for r in &resp.results {
                    println!(
                        "  {} {} [{}] {} ({}, {:.1})",
                        r.simplified,
                        r.traditional,
                        r.pinyin,
                        r.definition,
                        r.match_type,
                        r.relevance_score
                    );
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Command::Lookup {
            text,
            page,
            page_size,
        } => {
            let page_size = page_size.unwrap_or(config.base.default_page_size);
            let engine = open_engine(&cli, config)?;
            print_lookup(&engine, text, *page, page_size)
        }
        Command::Classify { text } => {
            let classifier = InputClassifier::new(SyllableTable::standard(), config.max_syllables);
            println!("{}", classifier.classify(text.trim()));
            Ok(())
        }
        Command::Variants { text } => {
            for v in PinyinVariantGenerator::standard().generate_variants(text.trim()) {
                println!("{v}");
            }
            Ok(())
        }
        Command::Interactive => {
            let engine = open_engine(&cli, config)?;
            run_interactive(&engine)
        }
    }
}
