// core/src/redb_store.rs
//
// Persistent lexicon stored in a redb database. Each record is kept as a
// bincode blob keyed by entry id; queries run inside a single read
// transaction and scan the table.

use crate::entry::{EntryId, LexiconEntry, LexiconRecord, RelatedData};
use crate::fulltext::{rank_hits, FullTextIndex, FullTextQuery};
use crate::matching::{self, Needle};
use crate::store::{LexiconStore, StoreError, Window};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::{Path, PathBuf};

const RECORDS: TableDefinition<u64, &[u8]> = TableDefinition::new("lexicon_records");

/// Redb-backed lexicon.
///
/// Reads are safe to run concurrently; writes (`insert_records`) are meant
/// for import tooling, not for the lookup path.
pub struct RedbLexicon {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for RedbLexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbLexicon").field("path", &self.path).finish()
    }
}

impl RedbLexicon {
    /// Create or open a redb database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path.as_ref())?;

        // make sure the table exists so read transactions can open it
        let write_txn = db.begin_write()?;
        write_txn.open_table(RECORDS)?;
        write_txn.commit()?;

        tracing::info!(path = %path.as_ref().display(), "opened redb lexicon");
        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert (or replace) records in one write transaction.
    pub fn insert_records(&self, records: &[LexiconRecord]) -> Result<usize, StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(RECORDS)?;
            for record in records {
                let bytes = bincode::serialize(record)?;
                table.insert(record.id(), bytes.as_slice())?;
            }
        }
        write_txn.commit()?;
        Ok(records.len())
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<u64, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Every stored record, in id order.
    pub fn records(&self) -> Result<Vec<LexiconRecord>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;
        let mut out = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            out.push(bincode::deserialize::<LexiconRecord>(value.value())?);
        }
        Ok(out)
    }

    fn entries(&self) -> Result<Vec<LexiconEntry>, StoreError> {
        Ok(self.records()?.into_iter().map(|r| r.entry).collect())
    }

    fn scan<F>(&self, window: Window, pred: F) -> Result<Vec<LexiconEntry>, StoreError>
    where
        F: FnMut(&LexiconEntry) -> bool,
    {
        let entries = self.entries()?;
        Ok(matching::select(&entries, window, pred))
    }

    fn count<F>(&self, mut pred: F) -> Result<usize, StoreError>
    where
        F: FnMut(&LexiconEntry) -> bool,
    {
        Ok(self.entries()?.iter().filter(|e| pred(e)).count())
    }
}

impl LexiconStore for RedbLexicon {
    fn find_exact_by_hanzi(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        self.scan(window, |e| matching::hanzi_exact(e, &needle))
    }

    fn find_partial_by_hanzi(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        self.scan(window, |e| matching::hanzi_contains(e, &needle))
    }

    fn find_exact_by_pinyin(
        &self,
        variant: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(variant);
        self.scan(window, |e| matching::pinyin_exact(e, &needle))
    }

    fn find_pinyin_prefix(
        &self,
        stem: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(stem);
        self.scan(window, |e| matching::pinyin_prefix(e, &needle))
    }

    fn find_pinyin_substring(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        self.scan(window, |e| matching::pinyin_contains(e, &needle))
    }

    fn find_definition_prefix(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        self.scan(window, |e| matching::definition_prefix(e, &needle))
    }

    fn find_definition_phrase(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        self.scan(window, |e| matching::definition_phrase(e, &needle))
    }

    fn find_definition_full_text(
        &self,
        query: &FullTextQuery,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let entries = self.entries()?;
        let index = FullTextIndex::build(entries.iter().map(|e| e.definition.as_str()));
        let hits = index
            .search(query)
            .into_iter()
            .map(|(pos, score)| (entries[pos].clone(), score))
            .collect();
        Ok(window.apply(rank_hits(hits)))
    }

    fn find_definition_substring(
        &self,
        text: &str,
        window: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        let needle = Needle::new(text);
        self.scan(window, |e| matching::definition_contains(e, &needle))
    }

    fn fetch_related(&self, ids: &[EntryId]) -> Result<RelatedData, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS)?;
        let mut related = RelatedData::new();
        let mut distinct: Vec<EntryId> = ids.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        for id in distinct {
            if let Some(value) = table.get(id)? {
                let record: LexiconRecord = bincode::deserialize(value.value())?;
                related.insert_record(&record);
            }
        }
        Ok(related)
    }

    fn count_hanzi_containing(&self, text: &str) -> Result<usize, StoreError> {
        let lower = text.to_lowercase();
        self.count(|e| {
            e.simplified.to_lowercase().contains(lower.as_str())
                || e.traditional.to_lowercase().contains(lower.as_str())
        })
    }

    fn count_pinyin_containing(&self, text: &str) -> Result<usize, StoreError> {
        let needle = Needle::new(text);
        self.count(|e| matching::pinyin_contains(e, &needle))
    }

    fn count_definition_containing(&self, text: &str) -> Result<usize, StoreError> {
        let needle = Needle::new(text);
        self.count(|e| matching::definition_contains(e, &needle))
    }
}
