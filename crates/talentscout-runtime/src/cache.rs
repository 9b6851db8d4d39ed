//! Translation cache.
//!
//! The fixed prompts of the interview script are translated on every turn
//! for a non-English candidate. Caching them by language pair and text
//! saves a model call per turn.

use moka::future::Cache;
use std::time::Duration;
use talentscout_core::Language;

/// Cache key: language pair plus the exact source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    source: Language,
    target: Language,
    text: String,
}

impl TranslationKey {
    pub fn new(source: Language, target: Language, text: impl Into<String>) -> Self {
        Self {
            source,
            target,
            text: text.into(),
        }
    }
}

/// Translation cache using moka.
pub struct TranslationCache {
    cache: Cache<TranslationKey, String>,
}

impl TranslationCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &TranslationKey) -> Option<String> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: TranslationKey, translated: String) {
        self.cache.insert(key, translated).await;
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(1_000, Duration::from_secs(3600))
    }
}
