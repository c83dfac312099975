//! Locale identifiers, the supported set, and display metadata.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Flag shown for locales without a built-in entry.
pub const GLOBE_FLAG: &str = "🌐";

/// Language/region identifier such as `en` or `zh-CN`.
///
/// Comparison is exact and case-sensitive; tag matching against runtime
/// preferences goes through [`LocaleSet::match_tag`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    /// Wrap a locale code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Raw locale code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading subtag (`zh` for `zh-CN`).
    #[must_use]
    pub fn primary_subtag(&self) -> &str {
        primary_subtag(&self.0)
    }

    /// Open Graph spelling of the locale (`zh_CN`).
    #[must_use]
    pub fn og_locale(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl Display for Locale {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Ordered set of supported locales, in display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<Locale>,
}

impl LocaleSet {
    /// Build a set, rejecting empty input, blank codes, and duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the list is empty or malformed.
    pub fn new(locales: Vec<Locale>) -> Result<Self, ConfigError> {
        if locales.is_empty() {
            return Err(ConfigError::EmptyLocaleSet);
        }
        for (index, locale) in locales.iter().enumerate() {
            if locale.as_str().trim().is_empty() {
                return Err(ConfigError::BlankLocale);
            }
            if locales[..index].contains(locale) {
                return Err(ConfigError::DuplicateLocale {
                    locale: locale.to_string(),
                });
            }
        }
        Ok(Self { locales })
    }

    /// Whether `code` is a member of the set.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Member matching `code` exactly.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|locale| locale.as_str() == code)
    }

    /// Iterate members in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    /// Number of supported locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Always `false` for a constructed set; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Match a runtime language tag (`en-GB`) against the set.
    ///
    /// Full codes are tried across the whole set before primary subtags, each
    /// pass in display order. Prefixes match on a subtag boundary, ignoring
    /// ASCII case.
    #[must_use]
    pub fn match_tag(&self, tag: &str) -> Option<&Locale> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        self.locales
            .iter()
            .find(|locale| tag_has_prefix(tag, locale.as_str()))
            .or_else(|| {
                self.locales
                    .iter()
                    .find(|locale| tag_has_prefix(tag, locale.primary_subtag()))
            })
    }
}

impl<'a> IntoIterator for &'a LocaleSet {
    type Item = &'a Locale;
    type IntoIter = std::slice::Iter<'a, Locale>;

    fn into_iter(self) -> Self::IntoIter {
        self.locales.iter()
    }
}

/// Built-in display name for a locale code.
#[must_use]
pub fn builtin_label(code: &str) -> Option<&'static str> {
    match code {
        "zh-CN" => Some("中文"),
        "en" => Some("English"),
        "ja" => Some("日本語"),
        "ko" => Some("한국어"),
        "es" => Some("Español"),
        "fr" => Some("Français"),
        "de" => Some("Deutsch"),
        _ => None,
    }
}

/// Flag glyph for a locale code, [`GLOBE_FLAG`] when unknown.
#[must_use]
pub fn flag(code: &str) -> &'static str {
    match code {
        "zh-CN" => "🇨🇳",
        "en" => "🇺🇸",
        "ja" => "🇯🇵",
        "ko" => "🇰🇷",
        "es" => "🇪🇸",
        "fr" => "🇫🇷",
        "de" => "🇩🇪",
        _ => GLOBE_FLAG,
    }
}

fn primary_subtag(code: &str) -> &str {
    code.split('-').next().unwrap_or(code)
}

fn tag_has_prefix(tag: &str, prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    let (Some(head), Some(rest)) = (tag.get(..prefix.len()), tag.get(prefix.len()..)) else {
        return false;
    };
    head.eq_ignore_ascii_case(prefix) && (rest.is_empty() || rest.starts_with(['-', '_']))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> LocaleSet {
        LocaleSet::new(codes.iter().copied().map(Locale::from).collect()).expect("valid set")
    }

    #[test]
    fn rejects_empty_and_duplicate_sets() {
        assert!(matches!(
            LocaleSet::new(Vec::new()),
            Err(ConfigError::EmptyLocaleSet)
        ));
        assert!(matches!(
            LocaleSet::new(vec!["en".into(), "en".into()]),
            Err(ConfigError::DuplicateLocale { locale }) if locale == "en"
        ));
        assert!(matches!(
            LocaleSet::new(vec![" ".into()]),
            Err(ConfigError::BlankLocale)
        ));
    }

    #[test]
    fn membership_is_exact() {
        let locales = set(&["zh-CN", "en"]);
        assert!(locales.contains("zh-CN"));
        assert!(!locales.contains("zh-cn"));
        assert!(!locales.contains("zh"));
    }

    #[test]
    fn tag_matching_prefers_display_order() {
        let locales = set(&["zh-CN", "en", "ja"]);
        assert_eq!(locales.match_tag("en-GB").map(Locale::as_str), Some("en"));
        assert_eq!(locales.match_tag("zh-TW").map(Locale::as_str), Some("zh-CN"));
        assert_eq!(locales.match_tag("ZH-cn").map(Locale::as_str), Some("zh-CN"));
        assert_eq!(locales.match_tag("ja").map(Locale::as_str), Some("ja"));
        assert_eq!(locales.match_tag("pt-BR"), None);
        assert_eq!(locales.match_tag(""), None);

        let chinese = set(&["zh-CN", "zh-TW"]);
        assert_eq!(chinese.match_tag("zh-TW").map(Locale::as_str), Some("zh-TW"));
        assert_eq!(chinese.match_tag("zh-HK").map(Locale::as_str), Some("zh-CN"));
    }

    #[test]
    fn tag_matching_respects_subtag_boundaries() {
        let locales = set(&["en"]);
        assert_eq!(locales.match_tag("eng"), None);
        assert_eq!(locales.match_tag("en_US").map(Locale::as_str), Some("en"));
    }

    #[test]
    fn og_locale_uses_underscores() {
        assert_eq!(Locale::from("zh-CN").og_locale(), "zh_CN");
        assert_eq!(Locale::from("en").og_locale(), "en");
    }

    #[test]
    fn display_metadata_has_defaults() {
        assert_eq!(builtin_label("ko"), Some("한국어"));
        assert_eq!(builtin_label("pt"), None);
        assert_eq!(flag("fr"), "🇫🇷");
        assert_eq!(flag("pt"), GLOBE_FLAG);
    }
}
