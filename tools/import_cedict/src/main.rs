//! Build lexicon artifacts from CC-CEDICT.
//!
//! Parses a CC-CEDICT text file, optionally merges HSK level and frequency
//! metadata from a `complete.json` vocabulary list, and writes a bincode
//! snapshot and/or a redb database.
//!
//! Usage:
//!   cargo run -p import_cedict -- --cedict cedict_ts.u8 --snapshot data/lexicon.bincode
//!   cargo run -p import_cedict -- --cedict cedict_ts.u8 --hsk complete.json --redb data/lexicon.redb
//!   cargo run -p import_cedict -- --cedict cedict_ts.u8 --dry-run

use anyhow::Context;
use cidian_core::{apply_hsk_metadata, read_cedict, read_hsk_vocab, LexiconSnapshot, RedbLexicon};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser, Debug)]
#[command(name = "import_cedict")]
#[command(about = "Import CC-CEDICT (plus optional HSK metadata) into lexicon artifacts")]
struct Args {
    /// CC-CEDICT text file
    #[arg(long)]
    cedict: PathBuf,

    /// HSK vocabulary list (complete.json)
    #[arg(long)]
    hsk: Option<PathBuf>,

    /// Output bincode snapshot
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Output redb database
    #[arg(long)]
    redb: Option<PathBuf>,

    /// Records per redb write transaction
    #[arg(long, default_value_t = 5000)]
    batch_size: usize,

    /// Parse and merge only; print a summary without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if !args.dry_run && args.snapshot.is_none() && args.redb.is_none() {
        anyhow::bail!("nothing to write: pass --snapshot, --redb or --dry-run");
    }

    let mut records = read_cedict(&args.cedict)
        .with_context(|| format!("failed to read {}", args.cedict.display()))?;
    println!("Parsed {} entries from {}", records.len(), args.cedict.display());

    if let Some(hsk) = &args.hsk {
        let vocab =
            read_hsk_vocab(hsk).with_context(|| format!("failed to read {}", hsk.display()))?;
        let stats = apply_hsk_metadata(&mut records, &vocab);
        println!(
            "HSK metadata: {} forms matched, {} unmatched, {} entries updated",
            stats.matched, stats.unmatched, stats.updated_records
        );
    }

    if args.dry_run {
        println!("\n[DRY RUN] First entries:");
        for r in records.iter().take(10) {
            let e = &r.entry;
            println!(
                "  {} {} [{}] {} (hsk {:?}, freq {:?})",
                e.simplified,
                e.traditional,
                e.pinyin,
                e.definition,
                e.hsk_level.combined,
                e.frequency_rank
            );
        }
        if records.len() > 10 {
            println!("  ... and {} more", records.len() - 10);
        }
        return Ok(());
    }

    if let Some(path) = &args.redb {
        let lexicon = RedbLexicon::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mut written = 0;
        for chunk in records.chunks(args.batch_size.max(1)) {
            written += lexicon.insert_records(chunk)?;
        }
        println!("✓ Wrote {} entries to {}", written, path.display());
    }

    if let Some(path) = &args.snapshot {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let count = records.len();
        LexiconSnapshot::new(records)
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("✓ Wrote {} entries to {}", count, path.display());
    }

    Ok(())
}
