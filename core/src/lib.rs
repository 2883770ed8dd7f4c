//! cidian-core
//!
//! Data model, storage backends and configuration shared by the lookup crate
//! (`cidian`) and the import tooling.
//!
//! The in-memory lexicon uses FST key indexes over a bincode snapshot; the
//! persistent lexicon lives in redb.
//!
//! Public API:
//! - `LexiconEntry` / `LexiconRecord` / `RelatedData` - entry data model
//! - `LexiconStore` - query capability implemented by every backend
//! - `MemoryLexicon` - fst-indexed lexicon loaded from a `LexiconSnapshot`
//! - `RedbLexicon` - redb-backed lexicon
//! - `FullTextQuery` / `FullTextIndex` - definition search with BM25 ranking
//! - `TrieNode` - prefix trie used for syllable segmentation
//! - `Config` - paging and cache configuration
use serde::{Deserialize, Serialize};

pub mod entry;
pub use entry::{
    EntryId, HskLevel, LexiconEntry, LexiconRecord, RelatedData, MISSING_FREQUENCY_RANK,
    MISSING_HSK_LEVEL,
};

pub mod store;
pub use store::{LexiconStore, StoreError, Window};

pub mod fulltext;
pub use fulltext::{FullTextIndex, FullTextQuery};

pub mod matching;

pub mod memory;
pub use memory::{LexiconSnapshot, MemoryLexicon, SNAPSHOT_VERSION};

pub mod redb_store;
pub use redb_store::RedbLexicon;

pub mod import;
pub use import::{apply_hsk_metadata, parse_cedict, read_cedict, read_hsk_vocab, HskVocabEntry};

pub mod trie;
pub use trie::TrieNode;

/// Hard upper bound on results per page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Generic configuration for the lookup service.
///
/// Language-specific options (syllable segmentation limits and the like)
/// belong in `LookupConfig` in the `cidian` crate, which flattens this one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Page size used when a caller does not pick one
    pub default_page_size: usize,

    /// Largest accepted page size, capped at `MAX_PAGE_SIZE`
    pub max_page_size: usize,

    // Cache Management
    /// Maximum number of cached responses; 0 disables the cache
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: MAX_PAGE_SIZE,
            max_cache_size: 256,
        }
    }
}

impl Config {
    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Effective page size bound: the configured value, capped at
    /// `MAX_PAGE_SIZE`.
    pub fn page_size_limit(&self) -> usize {
        self.max_page_size.min(MAX_PAGE_SIZE)
    }

    /// Whether `page_size` is inside the accepted range.
    pub fn accepts_page_size(&self, page_size: usize) -> bool {
        (1..=self.page_size_limit()).contains(&page_size)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }

    /// Convert full-width characters back to ASCII (half-width).
    pub fn to_halfwidth(s: &str) -> String {
        s.chars()
            .map(|ch| match ch {
                // Ideographic space -> ASCII space
                '\u{3000}' => ' ',
                // Full-width range (0xFF01-0xFF5E) -> ASCII (0x21-0x7E)
                '\u{FF01}'..='\u{FF5E}' => {
                    let code = ch as u32;
                    char::from_u32(code - 0xFF01 + 0x21).unwrap_or(ch)
                }
                _ => ch,
            })
            .collect()
    }

    /// Pinyin tone digits. The neutral tone (5) is not one of them.
    pub fn is_tone_digit(ch: char) -> bool {
        matches!(ch, '1'..='4')
    }

    pub fn has_tone_digit(s: &str) -> bool {
        s.chars().any(is_tone_digit)
    }

    /// Remove every tone digit 1-4.
    pub fn strip_tone_digits(s: &str) -> String {
        s.chars().filter(|c| !is_tone_digit(*c)).collect()
    }

    /// Remove tone digits 1-4 from the end of `s` only.
    pub fn strip_trailing_tone_digits(s: &str) -> &str {
        s.trim_end_matches(is_tone_digit)
    }
}
