//! Translation audit: load every configured locale the way the page does and
//! report failures and keys missing relative to the fallback locale.

use std::fmt::Write as _;

use pageminer_i18n::{DictionaryFetcher, I18nConfig, LoadReport, Locale, TranslationStore};
use serde::Serialize;
use tracing::info;

use crate::error::{ServerError, ServerResult};

/// Audit result for one locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleAudit {
    /// Locale code.
    pub locale: String,
    /// Whether a dictionary was loaded.
    pub loaded: bool,
    /// Last failure along the source chain, when the locale is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Location of that failure, when one was probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Number of string leaves in the dictionary.
    pub key_count: usize,
    /// Fallback leaf keys this locale cannot resolve.
    pub missing_keys: Vec<String>,
}

/// Audit result across all supported locales, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Fallback locale keys are compared against.
    pub fallback_locale: String,
    /// Per-locale results.
    pub locales: Vec<LocaleAudit>,
}

impl AuditReport {
    /// Build the report from a settled load pass.
    #[must_use]
    pub fn from_store<'a, I>(
        supported: I,
        fallback: &Locale,
        store: &TranslationStore,
        load: &LoadReport,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Locale>,
    {
        let reference = store.get(fallback.as_str());
        let locales = supported
            .into_iter()
            .map(|locale| {
                let failure = load
                    .failed
                    .iter()
                    .find(|failure| &failure.locale == locale);
                match store.get(locale.as_str()) {
                    Some(dictionary) => LocaleAudit {
                        locale: locale.to_string(),
                        loaded: true,
                        error: None,
                        location: None,
                        key_count: dictionary.leaf_keys().len(),
                        missing_keys: match reference {
                            Some(reference) if locale != fallback => {
                                dictionary.missing_from(reference)
                            }
                            _ => Vec::new(),
                        },
                    },
                    None => LocaleAudit {
                        locale: locale.to_string(),
                        loaded: false,
                        error: failure.map(|failure| failure.error.to_string()),
                        location: failure
                            .and_then(|failure| failure.error.location())
                            .map(str::to_string),
                        key_count: 0,
                        missing_keys: Vec::new(),
                    },
                }
            })
            .collect();
        Self {
            fallback_locale: fallback.to_string(),
            locales,
        }
    }

    /// Whether the fallback locale loaded.
    #[must_use]
    pub fn fallback_loaded(&self) -> bool {
        self.locales
            .iter()
            .any(|audit| audit.locale == self.fallback_locale && audit.loaded)
    }

    /// Whether every locale loaded with no missing keys.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.locales
            .iter()
            .all(|audit| audit.loaded && audit.missing_keys.is_empty())
    }

    /// Fail when the fallback locale is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::FallbackUnavailable`].
    pub fn ensure_fallback(&self) -> ServerResult<()> {
        if self.fallback_loaded() {
            Ok(())
        } else {
            Err(ServerError::FallbackUnavailable {
                locale: self.fallback_locale.clone(),
            })
        }
    }

    /// Human-readable summary.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "fallback locale: {}", self.fallback_locale);
        for audit in &self.locales {
            if !audit.loaded {
                let _ = writeln!(
                    out,
                    "{:<8} FAILED   {}{}",
                    audit.locale,
                    audit.error.as_deref().unwrap_or("not loaded"),
                    audit
                        .location
                        .as_deref()
                        .map(|location| format!(" ({location})"))
                        .unwrap_or_default()
                );
                continue;
            }
            let _ = writeln!(
                out,
                "{:<8} ok       {} keys, {} missing",
                audit.locale,
                audit.key_count,
                audit.missing_keys.len()
            );
            for key in &audit.missing_keys {
                let _ = writeln!(out, "           - {key}");
            }
        }
        out
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Render`] if serialization fails.
    pub fn render_json(&self) -> ServerResult<String> {
        serde_json::to_string_pretty(self).map_err(|source| ServerError::Render { source })
    }
}

/// Load every supported locale through `fetcher` and build the report.
///
/// # Errors
///
/// Returns [`ServerError::Config`] when the configuration is invalid.
pub async fn run_audit<F>(config: &I18nConfig, fetcher: &F) -> ServerResult<AuditReport>
where
    F: DictionaryFetcher + ?Sized,
{
    let config_error = |source| ServerError::Config { path: None, source };
    let supported = config.locale_set().map_err(config_error)?;
    let sources = config.source_chain().map_err(config_error)?;

    let mut store = TranslationStore::new();
    let load = store.load(fetcher, &sources, supported.iter()).await;
    let report = AuditReport::from_store(&supported, &config.fallback_locale, &store, &load);
    info!(
        locales = report.locales.len(),
        failed = load.failed.len(),
        complete = report.is_complete(),
        "translation audit finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageminer_test_support::mocks::MemoryFetcher;

    fn config() -> I18nConfig {
        I18nConfig::from_json_str(
            r#"{
                "supported_locales": ["zh-CN", "en", "ja"],
                "default_locale": "zh-CN",
                "fallback_locale": "en",
                "sources": ["locales/{locale}.json"]
            }"#,
        )
        .expect("valid config")
    }

    #[tokio::test]
    async fn reports_missing_keys_relative_to_fallback() {
        let fetcher = MemoryFetcher::new()
            .with_body(
                "locales/en.json",
                r#"{"meta":{"title":"Hello","description":"Mine pages"},"nav":{"home":"Home"}}"#,
            )
            .with_body("locales/zh-CN.json", r#"{"meta":{"title":"你好"}}"#)
            .with_status("locales/ja.json", 404);

        let report = run_audit(&config(), &fetcher).await.expect("valid config");

        assert!(report.fallback_loaded());
        assert!(!report.is_complete());
        assert_eq!(report.locales[0].locale, "zh-CN");
        assert_eq!(
            report.locales[0].missing_keys,
            vec!["meta.description".to_string(), "nav.home".to_string()]
        );
        assert_eq!(report.locales[1].key_count, 3);
        assert!(report.locales[1].missing_keys.is_empty());
        assert!(!report.locales[2].loaded);
        assert_eq!(report.locales[2].location.as_deref(), Some("locales/ja.json"));

        let text = report.render_text();
        assert!(text.contains("zh-CN    ok       1 keys, 2 missing"));
        assert!(text.contains("- nav.home"));
        assert!(text.contains("ja       FAILED"));
    }

    #[tokio::test]
    async fn missing_fallback_is_an_error() {
        let fetcher =
            MemoryFetcher::new().with_body("locales/zh-CN.json", r#"{"meta":{"title":"你好"}}"#);

        let report = run_audit(&config(), &fetcher).await.expect("valid config");

        assert!(!report.fallback_loaded());
        assert!(report.locales[0].missing_keys.is_empty());
        assert!(matches!(
            report.ensure_fallback(),
            Err(ServerError::FallbackUnavailable { locale }) if locale == "en"
        ));
    }

    #[tokio::test]
    async fn json_rendering_omits_empty_failure_fields() {
        let fetcher = MemoryFetcher::new()
            .with_body("locales/en.json", r#"{"a":"b"}"#)
            .with_body("locales/zh-CN.json", r#"{"a":"c"}"#)
            .with_body("locales/ja.json", r#"{"a":"d"}"#);

        let report = run_audit(&config(), &fetcher).await.expect("valid config");
        let json: serde_json::Value =
            serde_json::from_str(&report.render_json().expect("serializable"))
                .expect("valid json");

        assert!(report.is_complete());
        assert_eq!(json["fallback_locale"], "en");
        assert!(json["locales"][0].get("error").is_none());
        assert_eq!(json["locales"][2]["key_count"], 1);
    }
}
