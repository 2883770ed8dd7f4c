//! CC-CEDICT parsing and HSK metadata merging.
//!
//! CC-CEDICT lines look like:
//!
//! ```text
//! 汽車 汽车 [qi4 che1] /car/automobile/bus/CL:輛|辆[liang4]/
//! ```
//!
//! Each parsed line becomes one `LexiconRecord`. Ids are assigned in file
//! order starting at 1. HSK metadata (level, frequency, radical, parts of
//! speech, transcriptions) comes from a `complete.json` style vocabulary list
//! and is merged by `(simplified, traditional)`.

use crate::entry::{EntryId, HskLevel, LexiconEntry, LexiconRecord};
use crate::store::StoreError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One parsed CC-CEDICT line, before id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CedictLine {
    pub traditional: String,
    pub simplified: String,
    pub pinyin: String,
    pub senses: Vec<String>,
    pub classifiers: Vec<String>,
}

impl CedictLine {
    /// Parse a single line. Comments, blank lines and malformed lines yield
    /// `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (traditional, rest) = line.split_once(' ')?;
        let (simplified, rest) = rest.split_once(' ')?;
        let rest = rest.trim_start().strip_prefix('[')?;
        let (pinyin, rest) = rest.split_once(']')?;
        let body = rest.trim().strip_prefix('/')?.strip_suffix('/')?;

        let mut senses = Vec::new();
        let mut classifiers = Vec::new();
        for sense in body.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            match sense.strip_prefix("CL:") {
                Some(cl) => classifiers.extend(parse_classifiers(cl)),
                None => senses.push(sense.to_string()),
            }
        }
        if senses.is_empty() && classifiers.is_empty() {
            return None;
        }

        Some(Self {
            traditional: traditional.to_string(),
            simplified: simplified.to_string(),
            pinyin: pinyin.split_whitespace().collect::<Vec<_>>().join(" "),
            senses,
            classifiers,
        })
    }

    /// Turn the parsed line into a record with the given id.
    pub fn into_record(self, id: EntryId) -> LexiconRecord {
        let definition = self.senses.join("; ");
        let entry = LexiconEntry::new(
            id,
            self.simplified,
            self.traditional,
            self.pinyin.clone(),
            definition,
        );
        let mut record = LexiconRecord::new(entry);
        record.transcriptions.push(("numeric".to_string(), self.pinyin));
        record.classifiers = self.classifiers;
        record.meanings = self.senses;
        record
    }
}

/// `個|个[ge4],張|张[zhang1]` -> ["个", "张"] (simplified form preferred).
fn parse_classifiers(list: &str) -> Vec<String> {
    list.split(',')
        .filter_map(|item| {
            let hanzi = item.split('[').next()?.trim();
            let simplified = hanzi.rsplit('|').next()?.trim();
            if simplified.is_empty() {
                None
            } else {
                Some(simplified.to_string())
            }
        })
        .collect()
}

/// Parse a CC-CEDICT stream into records.
pub fn parse_cedict<R: BufRead>(reader: R) -> Result<Vec<LexiconRecord>, StoreError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match CedictLine::parse(trimmed) {
            Some(parsed) => {
                let id = records.len() as EntryId + 1;
                records.push(parsed.into_record(id));
            }
            None => {
                skipped += 1;
                tracing::warn!(line = lineno + 1, "skipping malformed CC-CEDICT line");
            }
        }
    }
    tracing::info!(records = records.len(), skipped, "parsed CC-CEDICT");
    Ok(records)
}

/// Read and parse a CC-CEDICT file.
pub fn read_cedict<P: AsRef<Path>>(path: P) -> Result<Vec<LexiconRecord>, StoreError> {
    let f = File::open(path.as_ref())?;
    parse_cedict(BufReader::new(f))
}

/// One item of the HSK vocabulary list (`complete.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HskVocabEntry {
    pub simplified: String,
    #[serde(default)]
    pub radical: Option<String>,
    /// Level tags such as "old-3", "new-2" or "new-7+".
    #[serde(default)]
    pub level: Vec<String>,
    #[serde(default)]
    pub frequency: Option<u32>,
    #[serde(default)]
    pub pos: Vec<String>,
    #[serde(default)]
    pub forms: Vec<HskForm>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HskForm {
    #[serde(default)]
    pub traditional: Option<String>,
    /// System name (pinyin, numeric, wadegiles, bopomofo, romatzyh) -> value.
    #[serde(default)]
    pub transcriptions: BTreeMap<String, String>,
    #[serde(default)]
    pub meanings: Vec<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
}

/// Read an HSK vocabulary list from JSON.
pub fn read_hsk_vocab<P: AsRef<Path>>(path: P) -> Result<Vec<HskVocabEntry>, StoreError> {
    let f = File::open(path.as_ref())?;
    let vocab: Vec<HskVocabEntry> = serde_json::from_reader(BufReader::new(f))?;
    Ok(vocab)
}

/// Parse level tags into both systems. "new-7+" counts as level 7.
pub fn parse_hsk_levels(tags: &[String]) -> HskLevel {
    fn level_of(tags: &[String], prefix: &str) -> Option<u32> {
        tags.iter().find_map(|tag| {
            let rest = tag.strip_prefix(prefix)?;
            rest.trim_end_matches('+').parse::<u32>().ok()
        })
    }
    HskLevel::from_systems(level_of(tags, "old-"), level_of(tags, "new-"))
}

/// Counters reported by `apply_hsk_metadata`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Vocabulary forms that matched at least one record.
    pub matched: usize,
    /// Vocabulary forms with no record for their `(simplified, traditional)`.
    pub unmatched: usize,
    /// Records that received metadata.
    pub updated_records: usize,
}

/// Merge HSK metadata into records keyed by `(simplified, traditional)`.
///
/// A form without a traditional spelling uses the simplified one. Every
/// record sharing the key is updated. Existing parts of speech and
/// classifiers are kept; transcriptions are appended (later values win on
/// read).
pub fn apply_hsk_metadata(records: &mut [LexiconRecord], vocab: &[HskVocabEntry]) -> MergeStats {
    let mut by_key: AHashMap<(String, String), Vec<usize>> = AHashMap::new();
    for (pos, record) in records.iter().enumerate() {
        by_key
            .entry((
                record.entry.simplified.clone(),
                record.entry.traditional.clone(),
            ))
            .or_default()
            .push(pos);
    }

    let mut stats = MergeStats::default();
    for item in vocab {
        let level = parse_hsk_levels(&item.level);
        for form in &item.forms {
            let traditional = form
                .traditional
                .clone()
                .unwrap_or_else(|| item.simplified.clone());
            let Some(positions) = by_key.get(&(item.simplified.clone(), traditional)) else {
                stats.unmatched += 1;
                continue;
            };
            stats.matched += 1;
            for &pos in positions {
                merge_into(&mut records[pos], item, form, level);
                stats.updated_records += 1;
            }
        }
    }

    if stats.unmatched > 0 {
        tracing::warn!(
            unmatched = stats.unmatched,
            "HSK vocabulary forms without a lexicon entry"
        );
    }
    tracing::info!(
        matched = stats.matched,
        updated = stats.updated_records,
        "merged HSK metadata"
    );
    stats
}

fn merge_into(record: &mut LexiconRecord, item: &HskVocabEntry, form: &HskForm, level: HskLevel) {
    if level.combined.is_some() {
        record.entry.hsk_level = level;
    }
    if item.frequency.is_some() {
        record.entry.frequency_rank = item.frequency;
    }
    if let Some(radical) = &item.radical {
        record.entry.radical = Some(radical.clone());
    }
    if record.parts_of_speech.is_empty() {
        record.parts_of_speech = item.pos.clone();
    }
    if record.classifiers.is_empty() {
        record.classifiers = form.classifiers.clone();
    }
    for (system, value) in &form.transcriptions {
        record.transcriptions.push((system.clone(), value.clone()));
    }
}
