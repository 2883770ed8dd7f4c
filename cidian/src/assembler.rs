//! Response assembly.
//!
//! Joins the auxiliary collections of every tagged row with one batched
//! store call, computes pagination and builds the response envelope. Row
//! order is never changed here.

use crate::classify::Category;
use crate::query::SearchQuery;
use crate::resolver::{MatchTier, TaggedRow};
use cidian_core::{EntryId, HskLevel, LexiconStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One result row as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: EntryId,
    pub simplified: String,
    pub traditional: String,
    pub pinyin: String,
    pub definition: String,
    pub hsk_level: HskLevel,
    pub frequency_rank: Option<u32>,
    pub radical: Option<String>,
    pub match_type: MatchTier,
    pub relevance_score: f64,
    pub parts_of_speech: Vec<String>,
    pub classifiers: Vec<String>,
    pub transcriptions: BTreeMap<String, String>,
    pub meanings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: usize, page_size: usize, total_count: usize) -> Self {
        Self {
            page,
            page_size,
            total_count,
            total_pages: total_count.div_ceil(page_size.max(1)),
        }
    }
}

/// The lookup response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub input_type: Category,
    pub results: Vec<SearchResult>,
    pub pagination: Pagination,
}

pub struct ResultAssembler {
    store: Arc<dyn LexiconStore>,
}

impl ResultAssembler {
    pub fn new(store: Arc<dyn LexiconStore>) -> Self {
        Self { store }
    }

    pub fn assemble(
        &self,
        rows: Vec<TaggedRow>,
        category: Category,
        query: &SearchQuery,
    ) -> Result<LookupResponse, StoreError> {
        let ids: Vec<EntryId> = rows.iter().map(|r| r.entry.id).collect();
        let mut related = if ids.is_empty() {
            Default::default()
        } else {
            self.store.fetch_related(&ids)?
        };

        let results = rows
            .into_iter()
            .map(|row| {
                let id = row.entry.id;
                let score = row.score();
                let e = row.entry;
                let meanings = related
                    .meanings
                    .remove(&id)
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| vec![e.definition.clone()]);
                SearchResult {
                    id,
                    simplified: e.simplified,
                    traditional: e.traditional,
                    pinyin: e.pinyin,
                    definition: e.definition,
                    hsk_level: e.hsk_level,
                    frequency_rank: e.frequency_rank,
                    radical: e.radical,
                    match_type: row.tier,
                    relevance_score: score,
                    parts_of_speech: related.parts_of_speech.remove(&id).unwrap_or_default(),
                    classifiers: related.classifiers.remove(&id).unwrap_or_default(),
                    transcriptions: related.transcriptions.remove(&id).unwrap_or_default(),
                    meanings,
                }
            })
            .collect();

        let total_count = match category {
            Category::Chinese => self.store.count_hanzi_containing(&query.text)?,
            Category::Pinyin => self.store.count_pinyin_containing(&query.text)?,
            Category::English => self.store.count_definition_containing(&query.text)?,
        };

        Ok(LookupResponse {
            input_type: category,
            results,
            pagination: Pagination::new(query.page, query.page_size, total_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cidian_core::{Config, LexiconEntry, LexiconRecord, MemoryLexicon};

    #[test]
    fn pagination_rounds_up() {
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 20, 20).total_pages, 1);
        assert_eq!(Pagination::new(1, 20, 21).total_pages, 2);
        assert_eq!(Pagination::new(2, 7, 50).total_pages, 8);
    }

    #[test]
    fn joins_related_data_and_keeps_order() {
        let mut car = LexiconRecord::new(LexiconEntry::new(
            3,
            "汽车",
            "汽車",
            "qi4 che1",
            "car; automobile",
        ));
        car.classifiers.push("辆".into());
        car.meanings = vec!["car".into(), "automobile".into()];
        car.transcriptions.push(("numeric".into(), "qi4 che1".into()));
        let cart = LexiconRecord::new(LexiconEntry::new(4, "车", "車", "che1", "cart"));
        let store: Arc<dyn LexiconStore> =
            Arc::new(MemoryLexicon::from_records(vec![car.clone(), cart.clone()]).unwrap());

        let rows = vec![
            TaggedRow::new(cart.entry.clone(), MatchTier::Partial),
            TaggedRow::new(car.entry.clone(), MatchTier::DirectTranslation),
        ];
        let query = SearchQuery::new("car", 1, 20, &Config::default()).unwrap();
        let resp = ResultAssembler::new(store)
            .assemble(rows, Category::English, &query)
            .unwrap();

        assert_eq!(resp.results[0].id, 4);
        assert_eq!(resp.results[0].meanings, vec!["cart".to_string()]);
        assert!(resp.results[0].classifiers.is_empty());
        assert_eq!(resp.results[1].classifiers, vec!["辆".to_string()]);
        assert_eq!(resp.results[1].meanings.len(), 2);
        assert_eq!(resp.results[1].transcriptions["numeric"], "qi4 che1");
        assert_eq!(resp.results[1].relevance_score, 2.0);
        assert_eq!(resp.pagination.total_count, 2);
        assert_eq!(resp.pagination.total_pages, 1);
    }

    #[test]
    fn response_serializes_with_public_field_names() {
        let resp = LookupResponse {
            input_type: Category::Chinese,
            results: Vec::new(),
            pagination: Pagination::new(1, 20, 0),
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["input_type"], "chinese");
        assert_eq!(value["pagination"]["total_pages"], 0);
    }
}
