//! In-memory lexicon backed by FST key indexes.
//!
//! Exact hanzi lookups and pinyin prefix lookups go through `fst::Map`
//! indexes built at load time; the remaining queries scan the record list.
//! Records are persisted as a bincode `LexiconSnapshot`.

use crate::entry::{EntryId, LexiconEntry, LexiconRecord, RelatedData};
use crate::fulltext::{rank_hits, FullTextIndex, FullTextQuery};
use crate::matching::{self, Needle};
use crate::store::{LexiconStore, StoreError, Window};
use crate::utils::strip_tone_digits;
use ahash::AHashMap;
use fst::automaton::Str;
use fst::{Automaton, IntoStreamer, Map, Streamer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk format version of `LexiconSnapshot`.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable lexicon contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconSnapshot {
    pub version: u32,
    pub records: Vec<LexiconRecord>,
}

impl LexiconSnapshot {
    pub fn new(records: Vec<LexiconRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            records,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let f = File::create(path.as_ref())?;
        bincode::serialize_into(BufWriter::new(f), self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let snapshot: LexiconSnapshot = bincode::deserialize_from(BufReader::new(f))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::Unavailable(format!(
                "unsupported snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }
        Ok(snapshot)
    }
}

/// Key -> posting list index, where each posting list holds record positions.
#[derive(Debug)]
struct KeyIndex {
    map: Map<Vec<u8>>,
    postings: Vec<Vec<usize>>,
}

impl KeyIndex {
    fn build(keys: BTreeMap<String, BTreeSet<usize>>) -> Result<Self, StoreError> {
        let mut postings = Vec::with_capacity(keys.len());
        let mut pairs = Vec::with_capacity(keys.len());
        for (key, positions) in keys {
            pairs.push((key, postings.len() as u64));
            postings.push(positions.into_iter().collect());
        }
        let map = Map::from_iter(pairs)?;
        Ok(Self { map, postings })
    }

    fn get(&self, key: &str) -> &[usize] {
        match self.map.get(key) {
            Some(idx) => self.postings[idx as usize].as_slice(),
            None => &[],
        }
    }

    fn prefixed(&self, prefix: &str, out: &mut BTreeSet<usize>) {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.map.search(matcher).into_stream();
        while let Some((_, idx)) = stream.next() {
            out.extend(self.postings[idx as usize].iter().copied());
        }
    }
}

/// Read-only lexicon held entirely in memory.
#[derive(Debug)]
pub struct MemoryLexicon {
    records: Vec<LexiconRecord>,
    by_id: AHashMap<EntryId, usize>,
    hanzi: KeyIndex,
    pinyin: KeyIndex,
    toneless_pinyin: KeyIndex,
    fulltext: FullTextIndex,
}

impl MemoryLexicon {
    /// Build the indexes over `records`. Later records with an id already
    /// seen are dropped.
    pub fn from_records(records: Vec<LexiconRecord>) -> Result<Self, StoreError> {
        let mut by_id = AHashMap::with_capacity(records.len());
        let mut kept: Vec<LexiconRecord> = Vec::with_capacity(records.len());
        for record in records {
            if by_id.contains_key(&record.id()) {
                tracing::warn!(id = record.id(), "duplicate lexicon id ignored");
                continue;
            }
            by_id.insert(record.id(), kept.len());
            kept.push(record);
        }

        let mut hanzi_keys: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        let mut pinyin_keys: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        let mut toneless_keys: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
        for (pos, record) in kept.iter().enumerate() {
            let e = &record.entry;
            hanzi_keys.entry(e.simplified.clone()).or_default().insert(pos);
            hanzi_keys.entry(e.traditional.clone()).or_default().insert(pos);
            let lower = e.pinyin.to_lowercase();
            toneless_keys
                .entry(strip_tone_digits(&lower))
                .or_default()
                .insert(pos);
            pinyin_keys.entry(lower).or_default().insert(pos);
        }

        let fulltext = FullTextIndex::build(kept.iter().map(|r| r.entry.definition.as_str()));

        tracing::info!(entries = kept.len(), "built in-memory lexicon");
        Ok(Self {
            hanzi: KeyIndex::build(hanzi_keys)?,
            pinyin: KeyIndex::build(pinyin_keys)?,
            toneless_pinyin: KeyIndex::build(toneless_keys)?,
            fulltext,
            records: kept,
            by_id,
        })
    }

    pub fn from_snapshot(snapshot: LexiconSnapshot) -> Result<Self, StoreError> {
        Self::from_records(snapshot.records)
    }

    /// Load a bincode snapshot written by `LexiconSnapshot::save`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_snapshot(LexiconSnapshot::load(path)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LexiconRecord] {
        &self.records
    }

    fn entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.records.iter().map(|r| &r.entry)
    }

    fn at_positions<'a, I>(&'a self, positions: I) -> impl Iterator<Item = &'a LexiconEntry>
    where
        I: IntoIterator<Item = &'a usize>,
    {
        positions.into_iter().map(move |&pos| &self.records[pos].entry)
    }

    fn scan<F>(&self, window: Window, pred: F) -> Vec<LexiconEntry>
    where
        F: FnMut(&LexiconEntry) -> bool,
    {
        matching::select(self.entries(), window, pred)
    }
}

impl LexiconStore for MemoryLexicon {
    fn find_exact_by_hanzi(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let positions = self.hanzi.get(text);
        Ok(matching::select(self.at_positions(positions), window, |_| true))
    }

    fn find_partial_by_hanzi(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        Ok(self.scan(window, |e| matching::hanzi_contains(e, &needle)))
    }

    fn find_exact_by_pinyin(
        &self,
        variant: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(variant);
        let positions = self.pinyin.get(&needle.lower);
        Ok(matching::select(self.at_positions(positions), window, |e| {
            matching::pinyin_exact(e, &needle)
        }))
    }

    fn find_pinyin_prefix(
        &self,
        stem: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let stem = stem.to_lowercase();
        let mut positions = BTreeSet::new();
        self.pinyin.prefixed(&stem, &mut positions);
        self.toneless_pinyin.prefixed(&stem, &mut positions);
        Ok(matching::select(self.at_positions(&positions), window, |_| true))
    }

    fn find_pinyin_substring(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        Ok(self.scan(window, |e| matching::pinyin_contains(e, &needle)))
    }

    fn find_definition_prefix(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        Ok(self.scan(window, |e| matching::definition_prefix(e, &needle)))
    }

    fn find_definition_phrase(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        Ok(self.scan(window, |e| matching::definition_phrase(e, &needle)))
    }

    fn find_definition_full_text(
        &self,
        query: &FullTextQuery,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let hits = self
            .fulltext
            .search(query)
            .into_iter()
            .map(|(pos, score)| (self.records[pos].entry.clone(), score))
            .collect();
        Ok(window.apply(rank_hits(hits)))
    }

    fn find_definition_substring(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        Ok(self.scan(window, |e| matching::definition_contains(e, &needle)))
    }

    fn fetch_related(&self, ids: &[EntryId]) -> Result<RelatedData, StoreError> {
        let mut related = RelatedData::new();
        let distinct: BTreeSet<EntryId> = ids.iter().copied().collect();
        for id in distinct {
            if let Some(&pos) = self.by_id.get(&id) {
                related.insert_record(&self.records[pos]);
            }
        }
        Ok(related)
    }

    fn count_hanzi_containing(&self, text: &str) -> Result<usize, StoreError> {
        let needle = Needle::new(text);
        Ok(self
            .entries()
            .filter(|e| {
                e.simplified.to_lowercase().contains(needle.lower.as_str())
                    || e.traditional.to_lowercase().contains(needle.lower.as_str())
            })
            .count())
    }

    fn count_pinyin_containing(&self, text: &str) -> Result<usize, StoreError> {
        let needle = Needle::new(text);
        Ok(self
            .entries()
            .filter(|e| matching::pinyin_contains(e, &needle))
            .count())
    }

    fn count_definition_containing(&self, text: &str) -> Result<usize, StoreError> {
        let needle = Needle::new(text);
        Ok(self
            .entries()
            .filter(|e| matching::definition_contains(e, &needle))
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::HskLevel;

    fn record(id: EntryId, simp: &str, trad: &str, pinyin: &str, def: &str) -> LexiconRecord {
        LexiconRecord::new(LexiconEntry::new(id, simp, trad, pinyin, def))
    }

    fn sample() -> MemoryLexicon {
        let mut hao = record(2, "好", "好", "hao3", "good; well");
        hao.entry = hao.entry.with_hsk(HskLevel::from_systems(Some(1), Some(1)));
        MemoryLexicon::from_records(vec![
            record(1, "你好", "你好", "ni3 hao3", "hello; hi"),
            hao,
            record(3, "号", "號", "hao4", "number; day of a month"),
            record(4, "好看", "好看", "hao3 kan4", "good-looking; nice"),
        ])
        .unwrap()
    }

    #[test]
    fn exact_hanzi_uses_both_scripts() {
        let lex = sample();
        let rows = lex.find_exact_by_hanzi("號", Window::all()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
        assert!(lex.find_exact_by_hanzi("你", Window::all()).unwrap().is_empty());
    }

    #[test]
    fn pinyin_prefix_walks_both_indexes() {
        let lex = sample();
        let ids: Vec<EntryId> = lex
            .find_pinyin_prefix("hao", Window::all())
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        // HSK-graded entry first, then by id
        assert_eq!(ids, vec![2, 3, 4]);

        let rows = lex.find_pinyin_prefix("ni hao", Window::all()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[test]
    fn exact_pinyin_is_case_sensitive() {
        let beijing = record(9, "北京", "北京", "Bei3 jing1", "Beijing");
        let lex = MemoryLexicon::from_records(vec![beijing]).unwrap();
        let hits = lex.find_exact_by_pinyin("Bei3 jing1", Window::all()).unwrap();
        assert_eq!(hits.len(), 1);
        let misses = lex.find_exact_by_pinyin("bei3 jing1", Window::all()).unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let lex = MemoryLexicon::from_records(vec![
            record(1, "一", "一", "yi1", "one"),
            record(1, "二", "二", "er4", "two"),
        ])
        .unwrap();
        assert_eq!(lex.len(), 1);
        assert_eq!(lex.records()[0].entry.simplified, "一");
    }

    #[test]
    fn snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.bincode");
        let snapshot = LexiconSnapshot::new(sample().records().to_vec());
        snapshot.save(&path).unwrap();

        let lex = MemoryLexicon::load(&path).unwrap();
        assert_eq!(lex.len(), 4);
        assert_eq!(lex.count_definition_containing("GOOD").unwrap(), 2);
    }
}
