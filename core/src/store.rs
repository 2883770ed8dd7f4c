// core/src/store.rs
//
// Capability trait implemented by every lexicon backend. The lookup engine
// only depends on this trait, never on a concrete store.

use crate::entry::{EntryId, LexiconEntry, RelatedData};
use crate::fulltext::FullTextQuery;

/// Errors raised by a lexicon backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("index error: {0}")]
    Index(#[from] fst::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

macro_rules! redb_error_into_store {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StoreError {
                fn from(e: $ty) -> Self {
                    StoreError::Redb(e.into())
                }
            }
        )*
    };
}

redb_error_into_store!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// A limit/offset window over an ordered result sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Window {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    /// The unbounded window (every row).
    pub fn all() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    /// Slice an already ordered sequence.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let rest = items.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => rest.take(limit).collect(),
            None => rest.collect(),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::all()
    }
}

/// Read-only query surface of a lexicon.
///
/// Unless noted otherwise, every `find_*` method returns rows ordered by
/// `LexiconEntry::rank_key` and then sliced by `window`.
pub trait LexiconStore: Send + Sync {
    /// simplified == text OR traditional == text
    fn find_exact_by_hanzi(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// simplified or traditional contains text
    fn find_partial_by_hanzi(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// pinyin == variant (case-sensitive)
    fn find_exact_by_pinyin(
        &self,
        variant: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// pinyin starts with `stem`, ignoring case and tone digits
    fn find_pinyin_prefix(
        &self,
        stem: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// pinyin contains text, ignoring case
    fn find_pinyin_substring(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// definition starts with "text;", "text," or "text "
    fn find_definition_prefix(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// definition contains " text "
    fn find_definition_phrase(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// Full-text match over definitions. Ordered by relevance first, then
    /// by `rank_key`.
    fn find_definition_full_text(
        &self,
        query: &FullTextQuery,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// definition contains text anywhere, ignoring case
    fn find_definition_substring(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError>;

    /// Batch-fetch auxiliary collections for the given entries.
    fn fetch_related(&self, ids: &[EntryId]) -> Result<RelatedData, StoreError>;

    fn count_hanzi_containing(&self, text: &str) -> Result<usize, StoreError>;

    fn count_pinyin_containing(&self, text: &str) -> Result<usize, StoreError>;

    fn count_definition_containing(&self, text: &str) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_slices_after_offset() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(Window::new(3, 2).apply(items.clone()), vec![2, 3, 4]);
        assert_eq!(Window::new(5, 8).apply(items.clone()), vec![8, 9]);
        assert!(Window::new(5, 20).apply(items.clone()).is_empty());
        assert_eq!(Window::all().apply(items).len(), 10);
    }
}
