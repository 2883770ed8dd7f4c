//! cidian crate root
//!
//! Bilingual Chinese/English lexicon lookup. A query is classified as
//! Chinese, pinyin or English, resolved through a category-specific tier
//! protocol against a `LexiconStore`, and assembled into a paginated
//! response.
//!
//! Public API exported here:
//! - `Engine` from `engine`
//! - `InputClassifier` and `Category` from `classify`
//! - `PinyinVariantGenerator` from `variants`
//! - `SearchResolver`, `MatchTier` and `TaggedRow` from `resolver`
//! - `ResultAssembler` and the response types from `assembler`

pub mod assembler;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod phrases;
pub mod query;
pub mod resolver;
pub mod syllables;
pub mod variants;

// Convenience re-exports for common types used by callers.
pub use assembler::{LookupResponse, Pagination, ResultAssembler, SearchResult};
pub use classify::{Category, InputClassifier};
pub use config::LookupConfig;
pub use engine::Engine;
pub use error::LookupError;
pub use query::SearchQuery;
pub use resolver::{MatchTier, SearchResolver, TaggedRow};
pub use syllables::{SyllableTable, PINYIN_SYLLABLES};
pub use variants::PinyinVariantGenerator;

pub use cidian_core::{LexiconStore, MemoryLexicon, RedbLexicon, StoreError};
