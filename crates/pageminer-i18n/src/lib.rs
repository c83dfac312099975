#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Localization core for the PageMiner landing page.
//!
//! The crate detects the visitor's locale, loads one JSON dictionary per
//! supported locale through an ordered source chain, resolves dotted keys with
//! fallback, and rewrites an abstract document whenever the locale changes.
//! Nothing here touches a browser API: the `pageminer-web` crate supplies the
//! environment, fetcher, and document implementations.
//!
//! Layout: `locale`/`config` (model), `dictionary`/`source`/`store` (loading),
//! `detect` (startup locale), `resolve` (lookups), `document`/`sync`/`events`
//! (rewriting + notifications), `localizer` (composition root).

pub mod config;
pub mod detect;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod events;
pub mod locale;
pub mod localizer;
pub mod resolve;
pub mod source;
pub mod store;
pub mod sync;

pub use config::I18nConfig;
pub use detect::{DetectionSource, LanguageDetector, LanguageEnvironment};
pub use dictionary::{Dictionary, DictionaryError};
pub use document::{Binding, Document, MetaTarget, TargetKind};
pub use error::{ConfigError, EnvironmentError, FetchError};
pub use events::{EventId, ListenerId, LocaleChanged, LocaleEvents};
pub use locale::{Locale, LocaleSet};
pub use localizer::{Localizer, SwitchOutcome};
pub use resolve::Resolver;
pub use source::{DictionaryFetcher, SourceChain};
pub use store::{LoadFailure, LoadReport, TranslationStore};
pub use sync::{ApplySummary, DomSynchronizer, SyncState};
