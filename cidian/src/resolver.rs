// cidian/src/resolver.rs
//
// Tiered search over a `LexiconStore`. Chinese and pinyin queries stop at
// the first tier that yields rows; English queries union every tier and
// deduplicate by entry id.

use crate::classify::Category;
use crate::variants::PinyinVariantGenerator;
use ahash::AHashSet;
use cidian_core::utils::strip_tone_digits;
use cidian_core::{FullTextQuery, LexiconEntry, LexiconStore, StoreError, Window};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Matching strategy that produced a row, with a fixed relevance weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Partial,
    ExactTone,
    ToneInsensitive,
    DirectTranslation,
    FtsExact,
    Fts,
}

impl MatchTier {
    pub fn score(&self) -> f64 {
        match self {
            MatchTier::Exact => 1.0,
            MatchTier::Partial => 0.5,
            MatchTier::ExactTone => 1.0,
            MatchTier::ToneInsensitive => 0.8,
            MatchTier::DirectTranslation => 2.0,
            MatchTier::FtsExact => 1.0,
            MatchTier::Fts => 0.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Partial => "partial",
            MatchTier::ExactTone => "exact_tone",
            MatchTier::ToneInsensitive => "tone_insensitive",
            MatchTier::DirectTranslation => "direct_translation",
            MatchTier::FtsExact => "fts_exact",
            MatchTier::Fts => "fts",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexicon row tagged with the tier that matched it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRow {
    pub entry: LexiconEntry,
    pub tier: MatchTier,
}

impl TaggedRow {
    pub fn new(entry: LexiconEntry, tier: MatchTier) -> Self {
        Self { entry, tier }
    }

    pub fn score(&self) -> f64 {
        self.tier.score()
    }
}

fn tag(rows: Vec<LexiconEntry>, tier: MatchTier) -> Vec<TaggedRow> {
    rows.into_iter().map(|e| TaggedRow::new(e, tier)).collect()
}

pub struct SearchResolver {
    store: Arc<dyn LexiconStore>,
    variants: PinyinVariantGenerator,
}

impl SearchResolver {
    pub fn new(store: Arc<dyn LexiconStore>, variants: PinyinVariantGenerator) -> Self {
        Self { store, variants }
    }

    pub fn store(&self) -> &Arc<dyn LexiconStore> {
        &self.store
    }

    /// Run the tier protocol for `category`. Any store failure aborts the
    /// whole resolve.
    pub fn resolve(
        &self,
        category: Category,
        text: &str,
        window: Window,
    ) -> Result<Vec<TaggedRow>, StoreError> {
        match category {
            Category::Chinese => self.resolve_chinese(text, window),
            Category::Pinyin => self.resolve_pinyin(text, window),
            Category::English => self.resolve_english(text, window),
        }
    }

    fn resolve_chinese(&self, text: &str, window: Window) -> Result<Vec<TaggedRow>, StoreError> {
        let rows = self.store.find_exact_by_hanzi(text, window)?;
        if !rows.is_empty() {
            tracing::debug!(text, rows = rows.len(), "hanzi exact match");
            return Ok(tag(rows, MatchTier::Exact));
        }
        let rows = self.store.find_partial_by_hanzi(text, window)?;
        tracing::debug!(text, rows = rows.len(), "hanzi partial match");
        Ok(tag(rows, MatchTier::Partial))
    }

    fn resolve_pinyin(&self, text: &str, window: Window) -> Result<Vec<TaggedRow>, StoreError> {
        let variants = self.variants.generate_variants(text);

        for variant in &variants {
            let rows = self.store.find_exact_by_pinyin(variant, window)?;
            if !rows.is_empty() {
                tracing::debug!(variant = %variant, rows = rows.len(), "pinyin exact match");
                return Ok(tag(rows, MatchTier::ExactTone));
            }
        }

        for variant in &variants {
            let stem = strip_tone_digits(variant);
            let rows = self.store.find_pinyin_prefix(&stem, window)?;
            if !rows.is_empty() {
                tracing::debug!(stem = %stem, rows = rows.len(), "pinyin prefix match");
                return Ok(tag(rows, MatchTier::ToneInsensitive));
            }
        }

        let rows = self.store.find_pinyin_substring(text, window)?;
        tracing::debug!(text, rows = rows.len(), "pinyin substring match");
        Ok(tag(rows, MatchTier::Partial))
    }

    fn resolve_english(&self, text: &str, window: Window) -> Result<Vec<TaggedRow>, StoreError> {
        let all = Window::all();
        let mut combined = Vec::new();

        let single_word = !text.contains(char::is_whitespace);
        if single_word {
            let rows = self.store.find_definition_prefix(text, all)?;
            combined.extend(tag(rows, MatchTier::DirectTranslation));
        }

        let rows = self.store.find_definition_phrase(text, all)?;
        combined.extend(tag(rows, MatchTier::FtsExact));

        if let Some(query) = FullTextQuery::from_text(text) {
            let rows = self.store.find_definition_full_text(&query, all)?;
            combined.extend(tag(rows, MatchTier::Fts));
        }

        let rows = self.store.find_definition_substring(text, all)?;
        combined.extend(tag(rows, MatchTier::Partial));

        let before = combined.len();
        let mut seen = AHashSet::new();
        combined.retain(|row| seen.insert(row.entry.id));
        tracing::debug!(
            text,
            rows = combined.len(),
            dropped = before - combined.len(),
            "english union"
        );

        Ok(window.apply(combined))
    }
}
