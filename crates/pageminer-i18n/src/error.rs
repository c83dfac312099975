//! # Design
//!
//! - Keep error messages constant while carrying context fields for debugging.
//! - Configuration problems are the only errors surfaced to callers; fetch and
//!   environment failures are logged and absorbed by the localizer.

use thiserror::Error;

use crate::dictionary::DictionaryError;

/// Errors raised while validating or parsing an [`crate::I18nConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No supported locales were configured.
    #[error("supported locale set is empty")]
    EmptyLocaleSet,
    /// A supported locale was listed more than once.
    #[error("supported locale listed more than once")]
    DuplicateLocale {
        /// Locale code that appeared twice.
        locale: String,
    },
    /// A supported locale code was blank.
    #[error("supported locale code is blank")]
    BlankLocale,
    /// The default locale is not a member of the supported set.
    #[error("default locale is not supported")]
    UnsupportedDefault {
        /// Configured default locale.
        locale: String,
    },
    /// The fallback locale is not a member of the supported set.
    #[error("fallback locale is not supported")]
    UnsupportedFallback {
        /// Configured fallback locale.
        locale: String,
    },
    /// A required string field was empty.
    #[error("configuration field is empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },
    /// No dictionary source templates were configured.
    #[error("dictionary source chain is empty")]
    EmptySources,
    /// A source template lacks the `{locale}` placeholder.
    #[error("dictionary source template is missing the locale placeholder")]
    MissingPlaceholder {
        /// Offending template.
        template: String,
    },
    /// The configuration document could not be parsed.
    #[error("failed to parse localization configuration")]
    Parse {
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to retrieve a dictionary from one source location.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (network, filesystem, CORS).
    #[error("dictionary transport failed")]
    Transport {
        /// Location that was probed.
        location: String,
        /// Transport-specific detail.
        detail: String,
    },
    /// The source answered with a non-success status.
    #[error("dictionary source returned a non-success status")]
    Status {
        /// Location that was probed.
        location: String,
        /// HTTP status code.
        status: u16,
    },
    /// The document was retrieved but is not a usable dictionary.
    #[error("dictionary document is malformed")]
    Malformed {
        /// Location that was probed.
        location: String,
        /// Parse failure.
        #[source]
        source: DictionaryError,
    },
    /// Every template in the chain was inapplicable for this fetcher.
    #[error("no dictionary source applies to the locale")]
    NoSources {
        /// Locale that had no applicable source.
        locale: String,
    },
}

impl FetchError {
    /// Location associated with the failure, when one was probed.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Transport { location, .. }
            | Self::Status { location, .. }
            | Self::Malformed { location, .. } => Some(location),
            Self::NoSources { .. } => None,
        }
    }
}

/// Failure reported by a [`crate::LanguageEnvironment`] write.
#[derive(Debug, Error)]
#[error("language environment operation failed")]
pub struct EnvironmentError {
    /// Operation identifier (`storage.set`, `history.replace`, ...).
    pub operation: &'static str,
    /// Platform-specific detail.
    pub detail: String,
}

impl EnvironmentError {
    /// Build an error for the given operation.
    #[must_use]
    pub fn new(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}
