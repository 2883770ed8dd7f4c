// cidian/tests/lookup.rs
//
// End-to-end lookups through `Engine` over a small CC-CEDICT sample.
//
// Tests cover:
// - Category detection and the tier reported for each category
// - Pagination across pages of the same query
// - English union without duplicate ids
// - Stable output for repeated lookups
// - Out-of-range pages and full-width input
// - Store failures surfacing as `LookupError::StoreUnavailable`
// - The redb backend behind the same engine

use std::sync::Arc;

use cidian::{Category, Engine, LexiconStore, LookupConfig, LookupError, MatchTier, StoreError};
use cidian_core::{
    apply_hsk_metadata, parse_cedict, EntryId, FullTextQuery, HskVocabEntry, LexiconEntry,
    LexiconRecord, MemoryLexicon, RedbLexicon, RelatedData, Window,
};

const CEDICT: &str = "\
你好 你好 [ni3 hao3] /hello/hi/
好 好 [hao3] /good/well/proper/
號 号 [hao4] /ordinal number/day of a month/mark/
汽車 汽车 [qi4 che1] /car/automobile/bus/CL:輛|辆[liang4]/
車 车 [che1] /car/vehicle/cart/CL:輛|辆[liang4]/
開車 开车 [kai1 che1] /to drive a car/to start a machine/
車站 车站 [che1 zhan4] /rail station/bus stop/
火車站 火车站 [huo3 che1 zhan4] /train station/
卡 卡 [ka3] /to stop/to block/card/
北京 北京 [Bei3 jing1] /Beijing, capital of the People's Republic of China/
";

const HSK: &str = r#"[
  {"simplified": "好", "level": ["new-1"], "frequency": 40, "pos": ["a"],
   "forms": [{"traditional": "好"}]},
  {"simplified": "车", "level": ["new-2"], "frequency": 700,
   "forms": [{"traditional": "車"}]},
  {"simplified": "汽车", "level": ["new-2"], "frequency": 900,
   "forms": [{"traditional": "汽車"}]}
]"#;

fn records() -> Vec<LexiconRecord> {
    let mut records = parse_cedict(CEDICT.as_bytes()).unwrap();
    let vocab: Vec<HskVocabEntry> = serde_json::from_str(HSK).unwrap();
    apply_hsk_metadata(&mut records, &vocab);
    records
}

fn engine() -> Engine {
    let store = Arc::new(MemoryLexicon::from_records(records()).unwrap());
    Engine::new(store, LookupConfig::default())
}

fn ids(engine: &Engine, text: &str, page: usize, page_size: usize) -> Vec<u64> {
    engine
        .lookup(text, page, page_size)
        .unwrap()
        .results
        .iter()
        .map(|r| r.id)
        .collect()
}

#[test]
fn hanzi_query_matches_exactly() {
    let resp = engine().lookup("你好", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::Chinese);
    assert_eq!(resp.results.len(), 1);
    let hit = &resp.results[0];
    assert_eq!(hit.simplified, "你好");
    assert_eq!(hit.match_type, MatchTier::Exact);
    assert_eq!(hit.relevance_score, 1.0);
    assert_eq!(hit.meanings, vec!["hello".to_string(), "hi".to_string()]);
    assert_eq!(resp.pagination.total_count, 1);
}

#[test]
fn hanzi_query_falls_back_to_partial() {
    let resp = engine().lookup("汽", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::Chinese);
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].match_type, MatchTier::Partial);
    assert_eq!(resp.results[0].classifiers, vec!["辆".to_string()]);
}

#[test]
fn toned_pinyin_matches_spaced_form() {
    let resp = engine().lookup("ni3hao3", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::Pinyin);
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].pinyin, "ni3 hao3");
    assert_eq!(resp.results[0].match_type, MatchTier::ExactTone);
}

#[test]
fn toneless_pinyin_matches_ignoring_tones() {
    let e = engine();
    let resp = e.lookup("hao", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::Pinyin);
    assert!(resp
        .results
        .iter()
        .all(|r| r.match_type == MatchTier::ToneInsensitive));
    assert_eq!(ids(&e, "hao", 1, 20), vec![2, 3]);
    assert_eq!(resp.pagination.total_count, 3);

    let resp = e.lookup("beijing", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::Pinyin);
    assert_eq!(resp.results[0].simplified, "北京");
    assert_eq!(resp.results[0].match_type, MatchTier::ToneInsensitive);
}

#[test]
fn english_direct_translation_ranks_first() {
    let resp = engine().lookup("car", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::English);
    let first = &resp.results[0];
    assert_eq!(first.simplified, "车");
    assert_eq!(first.match_type, MatchTier::DirectTranslation);
    assert_eq!(first.relevance_score, 2.0);
    assert_eq!(resp.results[1].simplified, "汽车");
    assert_eq!(resp.pagination.total_count, 4);
}

#[test]
fn english_union_has_no_duplicate_ids() {
    let found = ids(&engine(), "car", 1, 20);
    let mut unique = found.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(found.len(), unique.len());
    assert_eq!(found.len(), 4);
}

#[test]
fn multi_word_english_skips_direct_translation() {
    let resp = engine().lookup("drive a car", 1, 20).unwrap();
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].simplified, "开车");
    assert_eq!(resp.results[0].match_type, MatchTier::Fts);
}

#[test]
fn pages_slice_one_ordering() {
    let e = engine();
    let wide = ids(&e, "car", 1, 4);
    assert_eq!(ids(&e, "car", 1, 2), wide[..2].to_vec());
    assert_eq!(ids(&e, "car", 2, 2), wide[2..].to_vec());
    assert!(ids(&e, "car", 3, 2).is_empty());

    let resp = e.lookup("车", 1, 2).unwrap();
    assert_eq!(resp.pagination.page_size, 2);
    assert_eq!(resp.pagination.total_count, 5);
    assert_eq!(resp.pagination.total_pages, 3);
}

#[test]
fn repeated_lookups_serialize_identically() {
    let mut config = LookupConfig::default();
    config.base.max_cache_size = 0;
    let store = Arc::new(MemoryLexicon::from_records(records()).unwrap());
    let e = Engine::new(store, config);
    for text in ["你好", "ni3hao3", "car", "train station"] {
        let a = serde_json::to_string(&e.lookup(text, 1, 20).unwrap()).unwrap();
        let b = serde_json::to_string(&e.lookup(text, 1, 20).unwrap()).unwrap();
        assert_eq!(a, b, "unstable output for {text}");
    }
}

#[test]
fn response_json_uses_wire_names() {
    let resp = engine().lookup("ni3hao3", 1, 20).unwrap();
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["input_type"], "pinyin");
    assert_eq!(json["results"][0]["match_type"], "exact_tone");
    assert_eq!(json["pagination"]["page"], 1);
}

#[test]
fn invalid_requests_are_rejected() {
    let e = engine();
    for (text, page, size) in [("   ", 1, 20), ("car", 0, 20), ("car", 1, 0), ("car", 1, 101)] {
        assert!(
            matches!(e.lookup(text, page, size), Err(LookupError::InvalidArgument(_))),
            "accepted {text:?} page {page} size {size}"
        );
    }
}

#[test]
fn huge_page_number_is_rejected_not_wrapped() {
    let e = engine();
    assert!(matches!(
        e.lookup("car", usize::MAX / 10, 100),
        Err(LookupError::InvalidArgument(_))
    ));
    let far = e.lookup("car", usize::MAX / 1000, 100).unwrap();
    assert!(far.results.is_empty());
    assert_eq!(far.pagination.total_count, 4);
}

#[test]
fn full_width_pinyin_is_folded_before_classification() {
    let e = engine();
    let resp = e.lookup("ｎｉ３ｈａｏ３", 1, 20).unwrap();
    assert_eq!(resp.input_type, Category::Pinyin);
    assert_eq!(resp.results[0].pinyin, "ni3 hao3");
    assert_eq!(resp.results[0].match_type, MatchTier::ExactTone);
}

#[test]
fn first_page_uses_configured_size() {
    let mut config = LookupConfig::default();
    config.base.default_page_size = 2;
    let store = Arc::new(MemoryLexicon::from_records(records()).unwrap());
    let e = Engine::new(store, config);
    let resp = e.lookup_first_page("car").unwrap();
    assert_eq!(resp.results.len(), 2);
    assert_eq!(resp.pagination.page_size, 2);
}

struct OfflineStore;

fn offline<T>() -> Result<T, StoreError> {
    Err(StoreError::Unavailable("connection refused".into()))
}

impl LexiconStore for OfflineStore {
    fn find_exact_by_hanzi(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_partial_by_hanzi(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_exact_by_pinyin(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_pinyin_prefix(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_pinyin_substring(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_definition_prefix(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_definition_phrase(&self, _: &str, _: Window) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_definition_full_text(
        &self,
        _: &FullTextQuery,
        _: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn find_definition_substring(
        &self,
        _: &str,
        _: Window,
    ) -> Result<Vec<LexiconEntry>, StoreError> {
        offline()
    }
    fn fetch_related(&self, _: &[EntryId]) -> Result<RelatedData, StoreError> {
        offline()
    }
    fn count_hanzi_containing(&self, _: &str) -> Result<usize, StoreError> {
        offline()
    }
    fn count_pinyin_containing(&self, _: &str) -> Result<usize, StoreError> {
        offline()
    }
    fn count_definition_containing(&self, _: &str) -> Result<usize, StoreError> {
        offline()
    }
}

#[test]
fn store_failure_is_reported_as_unavailable() {
    let e = Engine::new(Arc::new(OfflineStore), LookupConfig::default());
    for text in ["你好", "nihao", "car"] {
        let err = e.lookup(text, 1, 20).unwrap_err();
        assert!(matches!(err, LookupError::StoreUnavailable { .. }), "{err}");
    }
    assert_eq!(e.cache_size(), 0);
}

#[test]
fn redb_backend_answers_like_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lexicon.redb");
    {
        let lexicon = RedbLexicon::open(&path).unwrap();
        lexicon.insert_records(&records()).unwrap();
    }
    let on_disk = Engine::from_redb(&path, LookupConfig::default()).unwrap();
    let in_memory = engine();
    for text in ["你好", "车", "ni3hao3", "hao", "car", "station"] {
        assert_eq!(
            on_disk.lookup(text, 1, 20).unwrap(),
            in_memory.lookup(text, 1, 20).unwrap(),
            "backends disagree on {text}"
        );
    }
}
