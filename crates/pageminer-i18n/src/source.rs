//! Dictionary source chain and the fetcher seam.
//!
//! # Design
//! - One ordered list of location templates replaces hard-coded primary and
//!   secondary branches; the first source yielding a valid dictionary wins.
//! - Fetchers only move bytes. Parsing and fallthrough live here so browser and
//!   native fetchers behave identically.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::dictionary::Dictionary;
use crate::error::FetchError;
use crate::locale::Locale;

/// Placeholder replaced by the locale code.
pub const LOCALE_PLACEHOLDER: &str = "{locale}";
/// Placeholder replaced by the page origin (`https://host:port`).
pub const ORIGIN_PLACEHOLDER: &str = "{origin}";

/// Retrieves raw dictionary documents.
///
/// Futures are not `Send`: the browser runs everything on one thread.
#[async_trait(?Send)]
pub trait DictionaryFetcher {
    /// Fetch the body at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] or [`FetchError::Status`] when the
    /// document is unavailable.
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError>;

    /// Origin used to expand `{origin}` templates; templates needing it are
    /// skipped when `None`.
    fn origin(&self) -> Option<String> {
        None
    }
}

/// Ordered dictionary location templates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceChain {
    templates: Vec<String>,
}

impl SourceChain {
    /// Build a chain from templates. Validation lives in
    /// [`crate::I18nConfig::source_chain`].
    #[must_use]
    pub const fn new(templates: Vec<String>) -> Self {
        Self { templates }
    }

    /// Templates in probe order.
    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Concrete locations for `locale`, skipping origin templates when no
    /// origin is known.
    #[must_use]
    pub fn locations(&self, locale: &Locale, origin: Option<&str>) -> Vec<String> {
        let origin = origin.map(|value| value.trim_end_matches('/'));
        self.templates
            .iter()
            .filter_map(|template| {
                let expanded = template.replace(LOCALE_PLACEHOLDER, locale.as_str());
                if expanded.contains(ORIGIN_PLACEHOLDER) {
                    origin.map(|origin| expanded.replace(ORIGIN_PLACEHOLDER, origin))
                } else {
                    Some(expanded)
                }
            })
            .collect()
    }

    /// Probe each location in order and return the first valid dictionary.
    ///
    /// # Errors
    ///
    /// Returns the last failure when no location produced a dictionary, or
    /// [`FetchError::NoSources`] when no template applied.
    pub async fn fetch<F>(&self, fetcher: &F, locale: &Locale) -> Result<Dictionary, FetchError>
    where
        F: DictionaryFetcher + ?Sized,
    {
        let origin = fetcher.origin();
        let mut last_error = None;
        for location in self.locations(locale, origin.as_deref()) {
            let outcome = match fetcher.fetch(&location).await {
                Ok(body) => Dictionary::from_slice(&body).map_err(|source| FetchError::Malformed {
                    location: location.clone(),
                    source,
                }),
                Err(err) => Err(err),
            };
            match outcome {
                Ok(dictionary) => {
                    debug!(locale = %locale, location = %location, "dictionary loaded");
                    return Ok(dictionary);
                }
                Err(err) => {
                    warn!(
                        locale = %locale,
                        location = %location,
                        error = %err,
                        "dictionary source failed"
                    );
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| FetchError::NoSources {
            locale: locale.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapFetcher {
        bodies: HashMap<String, Result<Vec<u8>, u16>>,
        origin: Option<String>,
        probed: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl DictionaryFetcher for MapFetcher {
        async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
            self.probed.borrow_mut().push(location.to_string());
            match self.bodies.get(location) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    location: location.to_string(),
                    status: *status,
                }),
                None => Err(FetchError::Transport {
                    location: location.to_string(),
                    detail: "unreachable".into(),
                }),
            }
        }

        fn origin(&self) -> Option<String> {
            self.origin.clone()
        }
    }

    fn chain() -> SourceChain {
        SourceChain::new(vec![
            "locales/{locale}.json".into(),
            "{origin}/locales/{locale}.json".into(),
        ])
    }

    #[test]
    fn locations_expand_placeholders() {
        let locale = Locale::from("zh-CN");
        assert_eq!(
            chain().locations(&locale, Some("https://example.test/")),
            vec![
                "locales/zh-CN.json".to_string(),
                "https://example.test/locales/zh-CN.json".to_string()
            ]
        );
        assert_eq!(
            chain().locations(&locale, None),
            vec!["locales/zh-CN.json".to_string()]
        );
    }

    #[tokio::test]
    async fn falls_through_to_secondary_source() {
        let mut fetcher = MapFetcher {
            origin: Some("https://example.test".into()),
            ..MapFetcher::default()
        };
        fetcher.bodies.insert("locales/en.json".into(), Err(404));
        fetcher.bodies.insert(
            "https://example.test/locales/en.json".into(),
            Ok(br#"{"nav":{"home":"Home"}}"#.to_vec()),
        );

        let dictionary = chain()
            .fetch(&fetcher, &Locale::from("en"))
            .await
            .expect("secondary source succeeds");
        assert_eq!(dictionary.lookup("nav.home"), Some("Home"));
        assert_eq!(fetcher.probed.borrow().len(), 2);
    }

    #[tokio::test]
    async fn malformed_primary_is_skipped() {
        let mut fetcher = MapFetcher {
            origin: Some("https://example.test".into()),
            ..MapFetcher::default()
        };
        fetcher
            .bodies
            .insert("locales/en.json".into(), Ok(b"<html>".to_vec()));
        fetcher.bodies.insert(
            "https://example.test/locales/en.json".into(),
            Ok(br#"{"a":"b"}"#.to_vec()),
        );

        let dictionary = chain()
            .fetch(&fetcher, &Locale::from("en"))
            .await
            .expect("secondary source succeeds");
        assert_eq!(dictionary.lookup("a"), Some("b"));
    }

    #[tokio::test]
    async fn reports_last_failure_when_all_sources_fail() {
        let fetcher = MapFetcher {
            origin: Some("https://example.test".into()),
            ..MapFetcher::default()
        };
        let err = chain()
            .fetch(&fetcher, &Locale::from("ja"))
            .await
            .expect_err("nothing reachable");
        assert_eq!(err.location(), Some("https://example.test/locales/ja.json"));
    }

    #[tokio::test]
    async fn no_applicable_template_is_reported() {
        let origin_only = SourceChain::new(vec!["{origin}/{locale}.json".into()]);
        let err = origin_only
            .fetch(&MapFetcher::default(), &Locale::from("en"))
            .await
            .expect_err("no origin available");
        assert!(matches!(err, FetchError::NoSources { locale } if locale == "en"));
    }
}
