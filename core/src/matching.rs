//! Row predicates shared by the lexicon backends.
//!
//! Case-insensitive predicates expect their needle already lowercased (see
//! `Needle`), so a scan lowercases the query once rather than per row.

use crate::entry::LexiconEntry;
use crate::store::Window;
use crate::utils::strip_tone_digits;

/// A query string in its raw and lowercased forms.
#[derive(Debug, Clone)]
pub struct Needle {
    pub raw: String,
    pub lower: String,
}

impl Needle {
    pub fn new(text: &str) -> Self {
        Self {
            raw: text.to_string(),
            lower: text.to_lowercase(),
        }
    }
}

pub fn hanzi_exact(entry: &LexiconEntry, needle: &Needle) -> bool {
    entry.simplified == needle.raw || entry.traditional == needle.raw
}

pub fn hanzi_contains(entry: &LexiconEntry, needle: &Needle) -> bool {
    entry.simplified.contains(needle.raw.as_str())
        || entry.traditional.contains(needle.raw.as_str())
}

pub fn pinyin_exact(entry: &LexiconEntry, needle: &Needle) -> bool {
    entry.pinyin == needle.raw
}

/// Prefix match on the stored pinyin, either as written or with its tone
/// digits removed.
pub fn pinyin_prefix(entry: &LexiconEntry, needle: &Needle) -> bool {
    let stored = entry.pinyin.to_lowercase();
    stored.starts_with(needle.lower.as_str())
        || strip_tone_digits(&stored).starts_with(needle.lower.as_str())
}

pub fn pinyin_contains(entry: &LexiconEntry, needle: &Needle) -> bool {
    entry.pinyin.to_lowercase().contains(needle.lower.as_str())
}

/// The definition opens with the needle as its primary sense:
/// "needle;", "needle," or "needle ".
pub fn definition_prefix(entry: &LexiconEntry, needle: &Needle) -> bool {
    let def = entry.definition.to_lowercase();
    match def.strip_prefix(needle.lower.as_str()) {
        Some(rest) => rest.starts_with(';') || rest.starts_with(',') || rest.starts_with(' '),
        None => false,
    }
}

/// The definition contains the needle surrounded by single spaces.
pub fn definition_phrase(entry: &LexiconEntry, needle: &Needle) -> bool {
    let padded = format!(" {} ", needle.lower);
    entry.definition.to_lowercase().contains(padded.as_str())
}

pub fn definition_contains(entry: &LexiconEntry, needle: &Needle) -> bool {
    entry.definition.to_lowercase().contains(needle.lower.as_str())
}

/// Filter, order by `rank_key` and window a set of entries.
pub fn select<'a, I, F>(entries: I, window: Window, mut pred: F) -> Vec<LexiconEntry>
where
    I: IntoIterator<Item = &'a LexiconEntry>,
    F: FnMut(&LexiconEntry) -> bool,
{
    let mut rows: Vec<LexiconEntry> = entries.into_iter().filter(|e| pred(e)).cloned().collect();
    rows.sort_by_key(LexiconEntry::rank_key);
    window.apply(rows)
}
