//! Startup locale detection.

use tracing::{debug, warn};

use crate::error::EnvironmentError;
use crate::locale::{Locale, LocaleSet};

/// Page environment the detector and switch control read from and write to.
///
/// The browser binding maps these onto `location.search`, `localStorage`,
/// `navigator.languages`, and `history.replaceState`.
pub trait LanguageEnvironment {
    /// Value of query parameter `name` on the current location.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Persisted value stored under `key`.
    fn stored_value(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] when storage is unavailable.
    fn store_value(&mut self, key: &str, value: &str) -> Result<(), EnvironmentError>;

    /// Runtime-reported language preferences, most preferred first.
    fn preferred_languages(&self) -> Vec<String>;

    /// Rewrite query parameter `name` without navigating.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] when the location cannot be rewritten.
    fn replace_query_param(&mut self, name: &str, value: &str) -> Result<(), EnvironmentError>;
}

/// Which input decided the detected locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionSource {
    /// Explicit query parameter.
    Query,
    /// Previously persisted preference.
    Persisted,
    /// Runtime language preference.
    Runtime,
    /// Configured default.
    Default,
}

/// Resolves the startup locale: query, persisted value, runtime preference,
/// then the configured default.
#[derive(Clone, Copy, Debug)]
pub struct LanguageDetector<'a> {
    supported: &'a LocaleSet,
    default_locale: &'a Locale,
    query_param: &'a str,
    storage_key: &'a str,
}

impl<'a> LanguageDetector<'a> {
    /// Build a detector over a validated locale set.
    #[must_use]
    pub const fn new(
        supported: &'a LocaleSet,
        default_locale: &'a Locale,
        query_param: &'a str,
        storage_key: &'a str,
    ) -> Self {
        Self {
            supported,
            default_locale,
            query_param,
            storage_key,
        }
    }

    /// Detect the locale and persist it as the last known preference.
    pub fn detect<E>(&self, env: &mut E) -> Locale
    where
        E: LanguageEnvironment + ?Sized,
    {
        self.detect_with_source(env).0
    }

    /// Same as [`Self::detect`], also reporting which input won.
    pub fn detect_with_source<E>(&self, env: &mut E) -> (Locale, DetectionSource)
    where
        E: LanguageEnvironment + ?Sized,
    {
        let (locale, source) = self.candidate(env);
        debug!(locale = %locale, source = ?source, "locale detected");
        if let Err(err) = env.store_value(self.storage_key, locale.as_str()) {
            warn!(
                operation = err.operation,
                detail = %err.detail,
                "failed to persist detected locale"
            );
        }
        (locale, source)
    }

    fn candidate<E>(&self, env: &E) -> (Locale, DetectionSource)
    where
        E: LanguageEnvironment + ?Sized,
    {
        if let Some(locale) = env
            .query_param(self.query_param)
            .and_then(|code| self.supported.get(&code).cloned())
        {
            return (locale, DetectionSource::Query);
        }
        if let Some(locale) = env
            .stored_value(self.storage_key)
            .and_then(|code| self.supported.get(&code).cloned())
        {
            return (locale, DetectionSource::Persisted);
        }
        if let Some(locale) = env
            .preferred_languages()
            .iter()
            .find_map(|tag| self.supported.match_tag(tag))
        {
            return (locale.clone(), DetectionSource::Runtime);
        }
        (self.default_locale.clone(), DetectionSource::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeEnv {
        query: HashMap<String, String>,
        storage: HashMap<String, String>,
        languages: Vec<String>,
        fail_writes: bool,
    }

    impl LanguageEnvironment for FakeEnv {
        fn query_param(&self, name: &str) -> Option<String> {
            self.query.get(name).cloned()
        }

        fn stored_value(&self, key: &str) -> Option<String> {
            self.storage.get(key).cloned()
        }

        fn store_value(&mut self, key: &str, value: &str) -> Result<(), EnvironmentError> {
            if self.fail_writes {
                return Err(EnvironmentError::new("storage.set", "denied"));
            }
            self.storage.insert(key.into(), value.into());
            Ok(())
        }

        fn preferred_languages(&self) -> Vec<String> {
            self.languages.clone()
        }

        fn replace_query_param(&mut self, name: &str, value: &str) -> Result<(), EnvironmentError> {
            self.query.insert(name.into(), value.into());
            Ok(())
        }
    }

    fn supported() -> LocaleSet {
        LocaleSet::new(vec!["en".into(), "zh-CN".into()]).expect("valid set")
    }

    fn detect(env: &mut FakeEnv) -> (Locale, DetectionSource) {
        let set = supported();
        let default = Locale::from("zh-CN");
        LanguageDetector::new(&set, &default, "lang", "pageminer-lang").detect_with_source(env)
    }

    #[test]
    fn query_parameter_beats_persisted_value() {
        let mut env = FakeEnv::default();
        env.query.insert("lang".into(), "en".into());
        env.storage.insert("pageminer-lang".into(), "zh-CN".into());

        assert_eq!(detect(&mut env), (Locale::from("en"), DetectionSource::Query));
        assert_eq!(env.storage.get("pageminer-lang").map(String::as_str), Some("en"));
    }

    #[test]
    fn unsupported_query_falls_through_to_persisted() {
        let mut env = FakeEnv::default();
        env.query.insert("lang".into(), "pt".into());
        env.storage.insert("pageminer-lang".into(), "en".into());

        assert_eq!(
            detect(&mut env),
            (Locale::from("en"), DetectionSource::Persisted)
        );
    }

    #[test]
    fn runtime_preference_matches_primary_subtag() {
        let mut env = FakeEnv {
            languages: vec!["en-GB".into()],
            ..FakeEnv::default()
        };
        assert_eq!(detect(&mut env), (Locale::from("en"), DetectionSource::Runtime));
    }

    #[test]
    fn later_runtime_preferences_are_considered() {
        let mut env = FakeEnv {
            languages: vec!["pt-BR".into(), "zh-TW".into()],
            ..FakeEnv::default()
        };
        assert_eq!(
            detect(&mut env),
            (Locale::from("zh-CN"), DetectionSource::Runtime)
        );
    }

    #[test]
    fn falls_back_to_default_and_tolerates_storage_failure() {
        let mut env = FakeEnv {
            languages: vec!["pt-BR".into()],
            fail_writes: true,
            ..FakeEnv::default()
        };
        assert_eq!(
            detect(&mut env),
            (Locale::from("zh-CN"), DetectionSource::Default)
        );
        assert!(env.storage.is_empty());
    }
}
