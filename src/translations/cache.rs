use super::TranslationDictionary;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Identifies one dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationCacheKey {
    pub environment: String,
    pub language: String,
    pub translation_id: String,
}

impl TranslationCacheKey {
    pub fn new(
        environment: impl Into<String>,
        language: impl Into<String>,
        translation_id: impl Into<String>,
    ) -> Self {
        Self {
            environment: environment.into(),
            language: language.into(),
            translation_id: translation_id.into(),
        }
    }
}

impl fmt::Display for TranslationCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.environment, self.language, self.translation_id
        )
    }
}

type Slot = Arc<OnceCell<Arc<TranslationDictionary>>>;

/// Dictionaries shared by every request handled by one middleware.
///
/// Each key owns a slot that is filled at most once, so concurrent first
/// lookups for the same key wait on a single fetch. Entries live until
/// [`invalidate`](Self::invalidate) or [`clear`](Self::clear).
#[derive(Clone, Default)]
pub struct TranslationCache {
    slots: Arc<Mutex<HashMap<TranslationCacheKey, Slot>>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dictionary, running `fetch` only if no dictionary
    /// is stored for `key` yet.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &TranslationCacheKey,
        fetch: F,
    ) -> Arc<TranslationDictionary>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TranslationDictionary>,
    {
        let slot = self.slot(key).await;
        let dictionary = slot
            .get_or_init(|| async move { Arc::new(fetch().await) })
            .await;
        dictionary.clone()
    }

    pub async fn get(&self, key: &TranslationCacheKey) -> Option<Arc<TranslationDictionary>> {
        let slots = self.slots.lock().await;
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Store `dictionary` under `key`, replacing any previous entry.
    pub async fn insert(&self, key: TranslationCacheKey, dictionary: TranslationDictionary) {
        let slot = Arc::new(OnceCell::new_with(Some(Arc::new(dictionary))));
        self.slots.lock().await.insert(key, slot);
    }

    /// Returns whether an entry was removed.
    pub async fn invalidate(&self, key: &TranslationCacheKey) -> bool {
        self.slots.lock().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    /// Number of populated entries.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn slot(&self, key: &TranslationCacheKey) -> Slot {
        let mut slots = self.slots.lock().await;
        slots.entry(key.clone()).or_default().clone()
    }
}
