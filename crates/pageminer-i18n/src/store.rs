//! Per-locale dictionary store.
//!
//! # Design
//! - The store only grows: a locale is inserted at most once and never evicted.
//! - Loads are best-effort. Each locale is fetched independently and
//!   concurrently; failures are logged and reported, never propagated.

use std::collections::HashMap;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::dictionary::Dictionary;
use crate::error::FetchError;
use crate::locale::Locale;
use crate::source::{DictionaryFetcher, SourceChain};

/// Locale that could not be loaded from any source.
#[derive(Debug)]
pub struct LoadFailure {
    /// Locale that stayed absent.
    pub locale: Locale,
    /// Last failure observed along the source chain.
    pub error: FetchError,
}

/// Outcome of a load pass, for diagnostics.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Locales inserted by this pass.
    pub loaded: Vec<Locale>,
    /// Locales already present and therefore not fetched.
    pub skipped: Vec<Locale>,
    /// Locales left absent.
    pub failed: Vec<LoadFailure>,
}

impl LoadReport {
    /// Whether `locale` ended up absent after this pass.
    #[must_use]
    pub fn is_failed(&self, locale: &str) -> bool {
        self.failed
            .iter()
            .any(|failure| failure.locale.as_str() == locale)
    }
}

/// Mapping from locale to its dictionary; absent locales simply have no entry.
#[derive(Clone, Debug, Default)]
pub struct TranslationStore {
    dictionaries: HashMap<Locale, Dictionary>,
}

impl TranslationStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dictionary unless the locale is already loaded.
    ///
    /// Returns `false` and keeps the existing dictionary when the locale was
    /// present.
    pub fn insert(&mut self, locale: Locale, dictionary: Dictionary) -> bool {
        if self.dictionaries.contains_key(&locale) {
            return false;
        }
        self.dictionaries.insert(locale, dictionary);
        true
    }

    /// Dictionary for `locale`, if loaded.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&Dictionary> {
        self.dictionaries.get(locale)
    }

    /// Whether `locale` has a dictionary.
    #[must_use]
    pub fn contains(&self, locale: &str) -> bool {
        self.dictionaries.contains_key(locale)
    }

    /// Loaded locales, sorted.
    #[must_use]
    pub fn loaded_locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<&Locale> = self.dictionaries.keys().collect();
        locales.sort();
        locales
    }

    /// Number of loaded dictionaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    /// Whether nothing has loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }

    /// Fetch every locale not yet present, concurrently, and settle all of
    /// them before returning.
    pub async fn load<'a, F, I>(
        &mut self,
        fetcher: &F,
        chain: &SourceChain,
        locales: I,
    ) -> LoadReport
    where
        F: DictionaryFetcher + ?Sized,
        I: IntoIterator<Item = &'a Locale>,
    {
        let mut report = LoadReport::default();
        let mut pending: Vec<&Locale> = Vec::new();
        for locale in locales {
            if self.contains(locale.as_str()) {
                report.skipped.push(locale.clone());
            } else if !pending.contains(&locale) {
                pending.push(locale);
            }
        }

        let attempts = pending
            .iter()
            .map(|locale| async move { (*locale, chain.fetch(fetcher, locale).await) });
        for (locale, outcome) in join_all(attempts).await {
            match outcome {
                Ok(dictionary) => {
                    self.insert(locale.clone(), dictionary);
                    report.loaded.push(locale.clone());
                }
                Err(error) => {
                    warn!(locale = %locale, error = %error, "translations unavailable");
                    report.failed.push(LoadFailure {
                        locale: locale.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "translation load settled"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::Cell;

    struct OnlyEnglish {
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl DictionaryFetcher for OnlyEnglish {
        async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if location == "locales/en.json" {
                Ok(br#"{"meta":{"title":"Hello"}}"#.to_vec())
            } else {
                Err(FetchError::Status {
                    location: location.to_string(),
                    status: 404,
                })
            }
        }
    }

    fn chain() -> SourceChain {
        SourceChain::new(vec!["locales/{locale}.json".into()])
    }

    #[test]
    fn insert_keeps_first_dictionary() {
        let mut store = TranslationStore::new();
        let first = Dictionary::from_slice(br#"{"a":"1"}"#).expect("object");
        let second = Dictionary::from_slice(br#"{"a":"2"}"#).expect("object");
        assert!(store.insert(Locale::from("en"), first));
        assert!(!store.insert(Locale::from("en"), second));
        assert_eq!(store.get("en").and_then(|dict| dict.lookup("a")), Some("1"));
    }

    #[tokio::test]
    async fn partial_loads_are_not_errors() {
        let fetcher = OnlyEnglish { calls: Cell::new(0) };
        let locales = [Locale::from("en"), Locale::from("zh-CN")];
        let mut store = TranslationStore::new();

        let report = store.load(&fetcher, &chain(), &locales).await;
        assert_eq!(report.loaded, vec![Locale::from("en")]);
        assert!(report.is_failed("zh-CN"));
        assert!(store.contains("en"));
        assert!(!store.contains("zh-CN"));
        assert_eq!(store.loaded_locales(), vec![&Locale::from("en")]);
    }

    #[tokio::test]
    async fn loaded_locales_are_not_refetched() {
        let fetcher = OnlyEnglish { calls: Cell::new(0) };
        let locales = [Locale::from("en"), Locale::from("en")];
        let mut store = TranslationStore::new();

        store.load(&fetcher, &chain(), &locales).await;
        assert_eq!(fetcher.calls.get(), 1);

        let report = store.load(&fetcher, &chain(), &locales).await;
        assert_eq!(fetcher.calls.get(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert!(report.loaded.is_empty());
    }
}
