//! Localization configuration and validation.
//!
//! # Design
//! - Defaults reproduce the landing page's shipped constants so an empty
//!   document is a valid configuration.
//! - Validation happens once, before a [`crate::Localizer`] is built; nothing
//!   downstream re-checks membership of the default or fallback locale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::locale::{Locale, LocaleSet};
use crate::source::{LOCALE_PLACEHOLDER, SourceChain};

/// Local storage entry holding the last resolved locale.
pub const DEFAULT_STORAGE_KEY: &str = "pageminer-lang";
/// Query parameter carrying the active locale.
pub const DEFAULT_QUERY_PARAM: &str = "lang";
/// Attribute marking translatable elements.
pub const DEFAULT_MARKER_ATTRIBUTE: &str = "data-i18n";
/// Relative dictionary location, resolved against the page.
pub const PRIMARY_SOURCE: &str = "locales/{locale}.json";
/// Fully-qualified dictionary location on the page origin.
pub const ORIGIN_SOURCE: &str = "{origin}/locales/{locale}.json";

const DEFAULT_SUPPORTED: [&str; 7] = ["zh-CN", "en", "ja", "ko", "es", "fr", "de"];

/// Settings for detection, loading, and document rewriting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported locales in display order.
    pub supported_locales: Vec<Locale>,
    /// Locale used when detection finds nothing.
    pub default_locale: Locale,
    /// Locale consulted when a key is missing from the active dictionary.
    pub fallback_locale: Locale,
    /// Local storage entry for the persisted preference.
    pub storage_key: String,
    /// Query parameter carrying the locale.
    pub query_param: String,
    /// Attribute marking translatable elements.
    pub marker_attribute: String,
    /// Ordered dictionary source templates.
    pub sources: Vec<String>,
    /// Display-name overrides keyed by locale code.
    pub labels: BTreeMap<String, String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            supported_locales: DEFAULT_SUPPORTED.iter().copied().map(Locale::from).collect(),
            default_locale: Locale::from("zh-CN"),
            fallback_locale: Locale::from("en"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            marker_attribute: DEFAULT_MARKER_ATTRIBUTE.to_string(),
            sources: vec![PRIMARY_SOURCE.to_string(), ORIGIN_SOURCE.to_string()],
            labels: BTreeMap::new(),
        }
    }
}

impl I18nConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid JSON and any validation error
    /// raised by [`Self::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locale_set()?;
        self.source_chain()?;
        Ok(())
    }

    /// Validated supported-locale set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the set is malformed or does not contain
    /// the default and fallback locales.
    pub fn locale_set(&self) -> Result<LocaleSet, ConfigError> {
        for (field, value) in [
            ("storage_key", &self.storage_key),
            ("query_param", &self.query_param),
            ("marker_attribute", &self.marker_attribute),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField { field });
            }
        }

        let set = LocaleSet::new(self.supported_locales.clone())?;
        if !set.contains(self.default_locale.as_str()) {
            return Err(ConfigError::UnsupportedDefault {
                locale: self.default_locale.to_string(),
            });
        }
        if !set.contains(self.fallback_locale.as_str()) {
            return Err(ConfigError::UnsupportedFallback {
                locale: self.fallback_locale.to_string(),
            });
        }
        Ok(set)
    }

    /// Validated dictionary source chain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySources`] or
    /// [`ConfigError::MissingPlaceholder`].
    pub fn source_chain(&self) -> Result<SourceChain, ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::EmptySources);
        }
        if let Some(template) = self
            .sources
            .iter()
            .find(|template| !template.contains(LOCALE_PLACEHOLDER))
        {
            return Err(ConfigError::MissingPlaceholder {
                template: template.clone(),
            });
        }
        Ok(SourceChain::new(self.sources.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = I18nConfig::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.supported_locales.len(), 7);
        assert_eq!(config.default_locale.as_str(), "zh-CN");
        assert_eq!(config.fallback_locale.as_str(), "en");
        assert_eq!(config.storage_key, "pageminer-lang");
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let config = I18nConfig::from_json_str(
            r#"{"supported_locales": ["en", "zh-CN"], "default_locale": "en"}"#,
        )
        .expect("valid config");
        assert_eq!(config.supported_locales.len(), 2);
        assert_eq!(config.fallback_locale.as_str(), "en");
        assert_eq!(config.query_param, "lang");
    }

    #[test]
    fn rejects_default_outside_supported_set() {
        let err = I18nConfig::from_json_str(r#"{"supported_locales": ["en"]}"#)
            .expect_err("zh-CN default is not supported");
        assert!(matches!(err, ConfigError::UnsupportedDefault { locale } if locale == "zh-CN"));
    }

    #[test]
    fn rejects_fallback_outside_supported_set() {
        let config = I18nConfig {
            fallback_locale: Locale::from("pt"),
            ..I18nConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnsupportedFallback { .. })
        ));
    }

    #[test]
    fn rejects_bad_sources() {
        let empty = I18nConfig {
            sources: Vec::new(),
            ..I18nConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptySources)));

        let no_placeholder = I18nConfig {
            sources: vec!["locales/all.json".into()],
            ..I18nConfig::default()
        };
        assert!(matches!(
            no_placeholder.validate(),
            Err(ConfigError::MissingPlaceholder { template }) if template == "locales/all.json"
        ));
    }

    #[test]
    fn rejects_blank_fields_and_invalid_json() {
        let blank = I18nConfig {
            storage_key: String::new(),
            ..I18nConfig::default()
        };
        assert!(matches!(
            blank.validate(),
            Err(ConfigError::EmptyField {
                field: "storage_key"
            })
        ));
        assert!(matches!(
            I18nConfig::from_json_str("{"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
