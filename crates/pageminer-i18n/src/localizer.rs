//! Composition root for detection, loading, resolution, and synchronization.
//!
//! # Design
//! - An explicitly constructed, owned component; callers pass it to whatever
//!   composes the page instead of reaching for a global.
//! - The active locale is single-writer: only [`Localizer::detect`] and
//!   [`Localizer::switch_locale`] change it, and both keep it inside the
//!   supported set.
//! - [`Localizer::initialize`] settles the whole load pass before the first
//!   apply.

use tracing::{info, warn};

use crate::config::I18nConfig;
use crate::detect::{LanguageDetector, LanguageEnvironment};
use crate::document::Document;
use crate::error::ConfigError;
use crate::events::{ListenerId, LocaleChanged};
use crate::locale::{self, Locale, LocaleSet};
use crate::resolve::Resolver;
use crate::source::{DictionaryFetcher, SourceChain};
use crate::store::{LoadReport, TranslationStore};
use crate::sync::{ApplySummary, DomSynchronizer, SyncState};

/// Result of a [`Localizer::switch_locale`] request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The active locale changed.
    Switched {
        /// Locale active before the switch.
        previous: Locale,
    },
    /// The requested locale was already active; the document was re-applied.
    Unchanged,
    /// The requested locale is not supported; nothing changed.
    Rejected,
}

/// Owned localization component for one page.
#[derive(Debug)]
pub struct Localizer {
    config: I18nConfig,
    supported: LocaleSet,
    sources: SourceChain,
    store: TranslationStore,
    active: Locale,
    synchronizer: DomSynchronizer,
}

impl Localizer {
    /// Build a localizer; the default locale is active until detection runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn new(config: I18nConfig) -> Result<Self, ConfigError> {
        let supported = config.locale_set()?;
        let sources = config.source_chain()?;
        let synchronizer = DomSynchronizer::new(config.marker_attribute.clone());
        Ok(Self {
            active: config.default_locale.clone(),
            config,
            supported,
            sources,
            store: TranslationStore::new(),
            synchronizer,
        })
    }

    /// Detect, load, then apply, in that order.
    pub async fn initialize<E, F, D>(
        &mut self,
        env: &mut E,
        fetcher: &F,
        document: &mut D,
    ) -> LoadReport
    where
        E: LanguageEnvironment + ?Sized,
        F: DictionaryFetcher + ?Sized,
        D: Document + ?Sized,
    {
        self.detect(env);
        let report = self.load(fetcher).await;
        self.apply(document);
        info!(
            locale = %self.active,
            loaded = self.store.len(),
            "localization initialized"
        );
        report
    }

    /// Run the detector and make its result active.
    pub fn detect<E>(&mut self, env: &mut E) -> &Locale
    where
        E: LanguageEnvironment + ?Sized,
    {
        let detector = LanguageDetector::new(
            &self.supported,
            &self.config.default_locale,
            &self.config.query_param,
            &self.config.storage_key,
        );
        self.active = detector.detect(env);
        &self.active
    }

    /// Load dictionaries for every supported locale not yet in the store.
    pub async fn load<F>(&mut self, fetcher: &F) -> LoadReport
    where
        F: DictionaryFetcher + ?Sized,
    {
        self.store
            .load(fetcher, &self.sources, self.supported.iter())
            .await
    }

    /// Rewrite `document` for the active locale.
    pub fn apply<D>(&mut self, document: &mut D) -> ApplySummary
    where
        D: Document + ?Sized,
    {
        let resolver = Resolver::new(&self.store, &self.active, &self.config.fallback_locale);
        self.synchronizer.apply(document, &resolver, &self.active)
    }

    /// Switch to `code`, persist it, rewrite the URL, and re-apply.
    ///
    /// Unsupported codes are rejected without touching the environment or the
    /// document.
    pub fn switch_locale<E, D>(
        &mut self,
        code: &str,
        env: &mut E,
        document: &mut D,
    ) -> SwitchOutcome
    where
        E: LanguageEnvironment + ?Sized,
        D: Document + ?Sized,
    {
        let Some(next) = self.supported.get(code).cloned() else {
            warn!(locale = code, "unsupported locale requested");
            return SwitchOutcome::Rejected;
        };

        let outcome = if next == self.active {
            SwitchOutcome::Unchanged
        } else {
            SwitchOutcome::Switched {
                previous: std::mem::replace(&mut self.active, next),
            }
        };

        if let Err(err) = env.store_value(&self.config.storage_key, self.active.as_str()) {
            warn!(operation = err.operation, detail = %err.detail, "failed to persist locale");
        }
        if let Err(err) = env.replace_query_param(&self.config.query_param, self.active.as_str()) {
            warn!(operation = err.operation, detail = %err.detail, "failed to update location");
        }
        self.apply(document);
        outcome
    }

    /// Translation for `key`, degrading to the key itself.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.resolver().resolve(key, None, None)
    }

    /// Translation for `key`, degrading to `default`.
    #[must_use]
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.resolver().resolve(key, Some(default), None)
    }

    /// Translation for `key` in an explicit locale.
    #[must_use]
    pub fn text_in(&self, key: &str, default: Option<&str>, locale: &str) -> String {
        self.resolver().resolve(key, default, Some(locale))
    }

    /// Resolver over the current state.
    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store, &self.active, &self.config.fallback_locale)
    }

    /// Active locale.
    #[must_use]
    pub const fn active_locale(&self) -> &Locale {
        &self.active
    }

    /// Fallback locale.
    #[must_use]
    pub const fn fallback_locale(&self) -> &Locale {
        &self.config.fallback_locale
    }

    /// Supported locales in display order.
    #[must_use]
    pub const fn supported_locales(&self) -> &LocaleSet {
        &self.supported
    }

    /// Whether `code` is supported.
    #[must_use]
    pub fn is_supported(&self, code: &str) -> bool {
        self.supported.contains(code)
    }

    /// Display name: configured override, built-in name, then the code.
    #[must_use]
    pub fn locale_label(&self, code: &str) -> String {
        self.config
            .labels
            .get(code)
            .map(String::as_str)
            .or_else(|| locale::builtin_label(code))
            .unwrap_or(code)
            .to_string()
    }

    /// Flag glyph for `code`.
    #[must_use]
    pub fn locale_flag(&self, code: &str) -> &'static str {
        locale::flag(code)
    }

    /// Register a locale-changed listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&LocaleChanged) + 'static,
    {
        self.synchronizer.subscribe(listener)
    }

    /// Remove a locale-changed listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.synchronizer.unsubscribe(id)
    }

    /// Loaded dictionaries.
    #[must_use]
    pub const fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Synchronizer lifecycle state.
    #[must_use]
    pub const fn sync_state(&self) -> &SyncState {
        self.synchronizer.state()
    }

    /// Validated configuration.
    #[must_use]
    pub const fn config(&self) -> &I18nConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        let config = I18nConfig {
            supported_locales: vec![Locale::from("en")],
            ..I18nConfig::default()
        };
        assert!(matches!(
            Localizer::new(config),
            Err(ConfigError::UnsupportedDefault { .. })
        ));
    }

    #[test]
    fn starts_on_default_locale_and_uninitialized() {
        let localizer = Localizer::new(I18nConfig::default()).expect("valid config");
        assert_eq!(localizer.active_locale().as_str(), "zh-CN");
        assert_eq!(localizer.sync_state(), &SyncState::Uninitialized);
        assert_eq!(localizer.text("meta.title"), "meta.title");
        assert_eq!(localizer.text_or("meta.title", "PageMiner"), "PageMiner");
    }

    #[test]
    fn labels_prefer_overrides() {
        let mut config = I18nConfig::default();
        config.labels.insert("en".into(), "English (US)".into());
        let localizer = Localizer::new(config).expect("valid config");
        assert_eq!(localizer.locale_label("en"), "English (US)");
        assert_eq!(localizer.locale_label("ja"), "日本語");
        assert_eq!(localizer.locale_label("pt"), "pt");
        assert_eq!(localizer.locale_flag("de"), "🇩🇪");
    }
}
