//! Document synchronizer.
//!
//! # Design
//! - Two states: uninitialized until the first apply, applied afterwards; every
//!   switch re-enters the applied state.
//! - Each binding resolves with its current content as the default, so a
//!   missing key leaves the markup untouched.

use tracing::debug;

use crate::document::Document;
use crate::events::{ListenerId, LocaleChanged, LocaleEvents};
use crate::locale::Locale;
use crate::resolve::Resolver;

/// Synchronizer lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing applied yet.
    Uninitialized,
    /// Document reflects this locale.
    Applied(Locale),
}

/// Counts of what one apply pass touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Marked elements rewritten.
    pub elements: usize,
    /// Metadata tags rewritten.
    pub metadata: usize,
}

/// Rewrites a [`Document`] for a locale and announces the change.
#[derive(Debug)]
pub struct DomSynchronizer {
    marker_attribute: String,
    state: SyncState,
    events: LocaleEvents,
}

impl DomSynchronizer {
    /// Synchronizer reading keys from `marker_attribute`.
    #[must_use]
    pub fn new(marker_attribute: impl Into<String>) -> Self {
        Self {
            marker_attribute: marker_attribute.into(),
            state: SyncState::Uninitialized,
            events: LocaleEvents::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &SyncState {
        &self.state
    }

    /// Register a locale-changed listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&LocaleChanged) + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Remove a locale-changed listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Notification registry.
    #[must_use]
    pub const fn events(&self) -> &LocaleEvents {
        &self.events
    }

    /// Rewrite `document` for `locale`, then notify listeners.
    pub fn apply<D>(
        &mut self,
        document: &mut D,
        resolver: &Resolver<'_>,
        locale: &Locale,
    ) -> ApplySummary
    where
        D: Document + ?Sized,
    {
        document.set_language(locale);

        let mut summary = ApplySummary::default();
        for binding in document.bindings(&self.marker_attribute) {
            let text =
                resolver.resolve(&binding.key, Some(&binding.current), Some(locale.as_str()));
            document.write(&binding, &text);
            summary.elements += 1;
        }
        for binding in document.meta_bindings(&self.marker_attribute) {
            let text =
                resolver.resolve(&binding.key, Some(&binding.current), Some(locale.as_str()));
            document.write(&binding, &text);
            summary.metadata += 1;
        }
        document.set_og_locale(&locale.og_locale());

        self.state = SyncState::Applied(locale.clone());
        document.announce_locale(locale);
        let event_id = self.events.publish(locale);
        debug!(
            locale = %locale,
            elements = summary.elements,
            metadata = summary.metadata,
            event_id,
            "document synchronized"
        );
        summary
    }
}
