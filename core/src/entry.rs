//! Lexicon entry types.
//!
//! This module provides:
//! - `LexiconEntry`: the core columns of one dictionary entry
//! - `LexiconRecord`: an entry plus its auxiliary collections (storage shape)
//! - `RelatedData`: auxiliary collections grouped by entry id (query shape)

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier of a lexicon entry.
pub type EntryId = u64;

/// Sort value used for entries without an HSK level.
pub const MISSING_HSK_LEVEL: u32 = 999;

/// Sort value used for entries without a frequency rank.
pub const MISSING_FREQUENCY_RANK: u32 = 999_999;

/// HSK grading of an entry in both numbering systems.
///
/// `combined` is the level used for ranking (new system preferred, old as
/// fallback).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HskLevel {
    pub combined: Option<u32>,
    pub old: Option<u32>,
    pub new: Option<u32>,
}

impl HskLevel {
    /// Build a level from the two systems, deriving `combined`.
    pub fn from_systems(old: Option<u32>, new: Option<u32>) -> Self {
        Self {
            combined: new.or(old),
            old,
            new,
        }
    }
}

/// Core columns of a dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub id: EntryId,
    pub simplified: String,
    pub traditional: String,
    /// Numbered pinyin, syllables separated by spaces (e.g. "ni3 hao3").
    pub pinyin: String,
    /// English definition text, senses separated by "; ".
    pub definition: String,
    pub hsk_level: HskLevel,
    /// Corpus frequency position; lower is more common.
    pub frequency_rank: Option<u32>,
    pub radical: Option<String>,
}

impl LexiconEntry {
    pub fn new<S, T, P, D>(
        id: EntryId,
        simplified: S,
        traditional: T,
        pinyin: P,
        definition: D,
    ) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        P: Into<String>,
        D: Into<String>,
    {
        Self {
            id,
            simplified: simplified.into(),
            traditional: traditional.into(),
            pinyin: pinyin.into(),
            definition: definition.into(),
            hsk_level: HskLevel::default(),
            frequency_rank: None,
            radical: None,
        }
    }

    pub fn with_hsk(mut self, hsk_level: HskLevel) -> Self {
        self.hsk_level = hsk_level;
        self
    }

    pub fn with_frequency_rank(mut self, rank: u32) -> Self {
        self.frequency_rank = Some(rank);
        self
    }

    /// Ranking key shared by every non full-text query: HSK level ascending,
    /// frequency rank ascending, then id for a deterministic order.
    pub fn rank_key(&self) -> (u32, u32, EntryId) {
        (
            self.hsk_level.combined.unwrap_or(MISSING_HSK_LEVEL),
            self.frequency_rank.unwrap_or(MISSING_FREQUENCY_RANK),
            self.id,
        )
    }
}

/// An entry together with its auxiliary collections, as stored and imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRecord {
    pub entry: LexiconEntry,
    pub parts_of_speech: Vec<String>,
    pub classifiers: Vec<String>,
    /// `(system, value)` pairs; a later pair for the same system wins.
    pub transcriptions: Vec<(String, String)>,
    pub meanings: Vec<String>,
}

impl LexiconRecord {
    pub fn new(entry: LexiconEntry) -> Self {
        Self {
            entry,
            parts_of_speech: Vec::new(),
            classifiers: Vec::new(),
            transcriptions: Vec::new(),
            meanings: Vec::new(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.entry.id
    }
}

/// Auxiliary collections for a batch of entries, grouped by entry id.
///
/// Entries without rows in a collection are simply absent from that map.
#[derive(Debug, Clone, Default)]
pub struct RelatedData {
    pub parts_of_speech: AHashMap<EntryId, Vec<String>>,
    pub classifiers: AHashMap<EntryId, Vec<String>>,
    pub transcriptions: AHashMap<EntryId, BTreeMap<String, String>>,
    pub meanings: AHashMap<EntryId, Vec<String>>,
}

impl RelatedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group the collections of one record under its id. Parts of speech
    /// and classifiers are sets: repeats are dropped, first position kept.
    pub fn insert_record(&mut self, record: &LexiconRecord) {
        let id = record.id();
        if !record.parts_of_speech.is_empty() {
            extend_unique(
                self.parts_of_speech.entry(id).or_default(),
                &record.parts_of_speech,
            );
        }
        if !record.classifiers.is_empty() {
            extend_unique(self.classifiers.entry(id).or_default(), &record.classifiers);
        }
        for (system, value) in &record.transcriptions {
            self.transcriptions
                .entry(id)
                .or_default()
                .insert(system.clone(), value.clone());
        }
        if !record.meanings.is_empty() {
            self.meanings
                .entry(id)
                .or_default()
                .extend(record.meanings.iter().cloned());
        }
    }
}

fn extend_unique(list: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !list.contains(item) {
            list.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_level_prefers_new_system() {
        let lvl = HskLevel::from_systems(Some(3), Some(1));
        assert_eq!(lvl.combined, Some(1));
        let lvl = HskLevel::from_systems(Some(3), None);
        assert_eq!(lvl.combined, Some(3));
        assert_eq!(HskLevel::from_systems(None, None).combined, None);
    }

    #[test]
    fn rank_key_uses_sentinels_for_missing_values() {
        let e = LexiconEntry::new(7, "车", "車", "che1", "car; vehicle");
        assert_eq!(e.rank_key(), (MISSING_HSK_LEVEL, MISSING_FREQUENCY_RANK, 7));

        let e = e
            .with_hsk(HskLevel::from_systems(None, Some(2)))
            .with_frequency_rank(120);
        assert_eq!(e.rank_key(), (2, 120, 7));
    }

    #[test]
    fn related_transcriptions_last_write_wins() {
        let entry = LexiconEntry::new(1, "你好", "你好", "ni3 hao3", "hello");
        let mut rec = LexiconRecord::new(entry);
        rec.transcriptions.push(("numeric".into(), "ni3hao3".into()));
        rec.transcriptions.push(("numeric".into(), "ni3 hao3".into()));
        rec.parts_of_speech.push("i".into());

        let mut related = RelatedData::new();
        related.insert_record(&rec);

        assert_eq!(related.transcriptions[&1]["numeric"], "ni3 hao3");
        assert_eq!(related.parts_of_speech[&1], vec!["i".to_string()]);
        assert!(!related.meanings.contains_key(&1));
        assert!(!related.classifiers.contains_key(&1));
    }

    #[test]
    fn related_sets_drop_repeats_in_order() {
        let entry = LexiconEntry::new(4, "车", "車", "che1", "car");
        let mut rec = LexiconRecord::new(entry);
        rec.classifiers = vec!["辆".into(), "部".into(), "辆".into()];
        rec.parts_of_speech = vec!["n".into(), "n".into()];

        let mut related = RelatedData::new();
        related.insert_record(&rec);
        related.insert_record(&rec);

        assert_eq!(related.classifiers[&4], vec!["辆".to_string(), "部".to_string()]);
        assert_eq!(related.parts_of_speech[&4], vec!["n".to_string()]);
    }
}
