//! Lookup engine
//!
//! Composes the classifier, the tiered resolver and the assembler into a
//! single `lookup(text, page, page_size)` call with response caching.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cidian_core::{LexiconStore, MemoryLexicon, RedbLexicon, StoreError};
use lru::LruCache;

use crate::assembler::{LookupResponse, ResultAssembler};
use crate::classify::{Category, InputClassifier};
use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::query::SearchQuery;
use crate::resolver::SearchResolver;
use crate::syllables::SyllableTable;
use crate::variants::PinyinVariantGenerator;

type CacheKey = (String, usize, usize);

/// Lookup service over a shared lexicon store.
///
/// The store and syllable table are shared read-only; the response cache is
/// the only mutable state.
pub struct Engine {
    config: LookupConfig,
    classifier: InputClassifier,
    variants: PinyinVariantGenerator,
    resolver: SearchResolver,
    assembler: ResultAssembler,
    cache: Option<Mutex<LruCache<CacheKey, LookupResponse>>>,
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
}

impl Engine {
    /// Build an engine over `store` with the standard syllable table.
    pub fn new(store: Arc<dyn LexiconStore>, config: LookupConfig) -> Self {
        Self::with_table(store, SyllableTable::standard(), config)
    }

    pub fn with_table(
        store: Arc<dyn LexiconStore>,
        table: Arc<SyllableTable>,
        config: LookupConfig,
    ) -> Self {
        let classifier = InputClassifier::new(Arc::clone(&table), config.max_syllables);
        let variants = PinyinVariantGenerator::new(table);
        let cache = NonZeroUsize::new(config.base.max_cache_size)
            .map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            resolver: SearchResolver::new(Arc::clone(&store), variants.clone()),
            assembler: ResultAssembler::new(store),
            classifier,
            variants,
            cache,
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
            config,
        }
    }

    /// Load an engine from a bincode snapshot.
    pub fn from_snapshot<P: AsRef<Path>>(
        path: P,
        config: LookupConfig,
    ) -> Result<Self, StoreError> {
        let lexicon = MemoryLexicon::load(path)?;
        Ok(Self::new(Arc::new(lexicon), config))
    }

    /// Open an engine over a redb lexicon.
    pub fn from_redb<P: AsRef<Path>>(
        path: P,
        config: LookupConfig,
    ) -> Result<Self, StoreError> {
        let lexicon = RedbLexicon::open(path)?;
        Ok(Self::new(Arc::new(lexicon), config))
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn classify(&self, text: &str) -> Category {
        self.classifier.classify(text)
    }

    pub fn variants(&self, text: &str) -> Vec<String> {
        self.variants.generate_variants(text)
    }

    /// Resolve one page of results for `text`.
    ///
    /// Process:
    /// 1. Validate and normalize the request
    /// 2. Return a cached response when present
    /// 3. Classify, resolve the tiers, assemble and cache the response
    pub fn lookup(
        &self,
        text: &str,
        page: usize,
        page_size: usize,
    ) -> Result<LookupResponse, LookupError> {
        let query = SearchQuery::new(text, page, page_size, &self.config.base)?;
        let key: CacheKey = (query.text.clone(), query.page, query.page_size);

        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                if let Some(hit) = guard.get(&key) {
                    self.cache_hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(hit.clone());
                }
            }
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }

        let category = self.classifier.classify(&query.text);
        tracing::debug!(text = %query.text, %category, "classified query");

        let rows = self.resolver.resolve(category, &query.text, query.window())?;
        let response = self.assembler.assemble(rows, category, &query)?;

        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                guard.put(key, response.clone());
            }
        }
        Ok(response)
    }

    /// Lookup with the configured default page size.
    pub fn lookup_first_page(&self, text: &str) -> Result<LookupResponse, LookupError> {
        self.lookup(text, 1, self.config.base.default_page_size)
    }

    /// Get cache statistics as `(hits, misses)`.
    pub fn cache_stats(&self) -> (usize, usize) {
        (
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_misses.load(Ordering::Relaxed),
        )
    }

    /// Get cache hit rate as a percentage (0.0 to 100.0).
    ///
    /// Returns None if no cache accesses have been made yet.
    pub fn cache_hit_rate(&self) -> Option<f32> {
        let (hits, misses) = self.cache_stats();
        let total = hits + misses;
        if total == 0 {
            None
        } else {
            Some(hits as f32 / total as f32 * 100.0)
        }
    }

    /// Current number of cached responses.
    pub fn cache_size(&self) -> usize {
        self.cache
            .as_ref()
            .and_then(|c| c.lock().ok().map(|g| g.len()))
            .unwrap_or(0)
    }

    /// Drop every cached response and reset the statistics.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            if let Ok(mut guard) = cache.lock() {
                guard.clear();
            }
        }
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
    }
}
