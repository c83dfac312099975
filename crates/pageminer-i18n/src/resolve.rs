//! Total key resolution: active locale, fallback locale, then default or key.

use crate::locale::Locale;
use crate::store::TranslationStore;

/// Borrowed view resolving keys against a store.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    store: &'a TranslationStore,
    active: &'a Locale,
    fallback: &'a Locale,
}

impl<'a> Resolver<'a> {
    /// Resolver for the given active and fallback locales.
    #[must_use]
    pub const fn new(
        store: &'a TranslationStore,
        active: &'a Locale,
        fallback: &'a Locale,
    ) -> Self {
        Self {
            store,
            active,
            fallback,
        }
    }

    /// Translation for `key` in `locale` (or the active locale), then in the
    /// fallback locale.
    #[must_use]
    pub fn lookup(&self, key: &str, locale: Option<&str>) -> Option<&'a str> {
        let primary = locale.unwrap_or_else(|| self.active.as_str());
        self.store
            .get(primary)
            .and_then(|dictionary| dictionary.lookup(key))
            .or_else(|| {
                self.store
                    .get(self.fallback.as_str())
                    .and_then(|dictionary| dictionary.lookup(key))
            })
    }

    /// Resolve `key`; never fails.
    ///
    /// Missing translations degrade to `default` when given, otherwise to the
    /// key itself.
    #[must_use]
    pub fn resolve(&self, key: &str, default: Option<&str>, locale: Option<&str>) -> String {
        self.lookup(key, locale)
            .or(default)
            .unwrap_or(key)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use serde_json::json;

    fn store() -> TranslationStore {
        let mut store = TranslationStore::new();
        store.insert(
            Locale::from("en"),
            Dictionary::from_value(json!({
                "meta": { "title": "Hello", "description": "Mine pages" },
                "nav": { "home": "Home" }
            }))
            .expect("object root"),
        );
        store.insert(
            Locale::from("fr"),
            Dictionary::from_value(json!({ "nav": { "home": "Accueil" } })).expect("object root"),
        );
        store
    }

    #[test]
    fn active_locale_wins() {
        let store = store();
        let (active, fallback) = (Locale::from("fr"), Locale::from("en"));
        let resolver = Resolver::new(&store, &active, &fallback);
        assert_eq!(resolver.resolve("nav.home", None, None), "Accueil");
    }

    #[test]
    fn missing_keys_use_fallback_locale() {
        let store = store();
        let (active, fallback) = (Locale::from("fr"), Locale::from("en"));
        let resolver = Resolver::new(&store, &active, &fallback);
        assert_eq!(resolver.resolve("meta.title", None, None), "Hello");
    }

    #[test]
    fn unresolved_keys_degrade_to_default_or_key() {
        let store = store();
        let (active, fallback) = (Locale::from("fr"), Locale::from("en"));
        let resolver = Resolver::new(&store, &active, &fallback);
        assert_eq!(
            resolver.resolve("hero.cta", Some("Get started"), None),
            "Get started"
        );
        assert_eq!(resolver.resolve("hero.cta", None, None), "hero.cta");
    }

    #[test]
    fn explicit_locale_overrides_active() {
        let store = store();
        let (active, fallback) = (Locale::from("en"), Locale::from("en"));
        let resolver = Resolver::new(&store, &active, &fallback);
        assert_eq!(resolver.resolve("nav.home", None, Some("fr")), "Accueil");
        assert_eq!(resolver.resolve("nav.home", None, Some("ja")), "Home");
    }

    #[test]
    fn empty_store_returns_keys() {
        let store = TranslationStore::new();
        let (active, fallback) = (Locale::from("zh-CN"), Locale::from("en"));
        let resolver = Resolver::new(&store, &active, &fallback);
        assert_eq!(resolver.resolve("meta.title", None, None), "meta.title");
    }
}
