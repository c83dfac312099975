//! Locale-changed notifications.
//!
//! Listeners are plain callbacks invoked synchronously in registration order;
//! the page runs on one thread, so there is no channel or replay buffer. Each
//! notification carries a sequential identifier so consumers can discard
//! stale ones.

use std::fmt::{self, Debug, Formatter};

use chrono::{DateTime, Utc};

use crate::locale::Locale;

/// Identifier assigned to each notification.
pub type EventId = u64;

/// Handle returned by [`LocaleEvents::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Notification emitted after every successful apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleChanged {
    /// Sequential identifier, starting at 1.
    pub id: EventId,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Locale now applied to the document.
    pub locale: Locale,
}

type Listener = Box<dyn Fn(&LocaleChanged)>;

/// Listener registry for [`LocaleChanged`].
pub struct LocaleEvents {
    listeners: Vec<(ListenerId, Listener)>,
    next_event: EventId,
    next_listener: u64,
    last: Option<LocaleChanged>,
}

impl LocaleEvents {
    /// Empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_event: 1,
            next_listener: 1,
            last: None,
        }
    }

    /// Register a listener.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&LocaleChanged) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Notify every listener that `locale` is now applied.
    pub fn publish(&mut self, locale: &Locale) -> EventId {
        let event = LocaleChanged {
            id: self.next_event,
            timestamp: Utc::now(),
            locale: locale.clone(),
        };
        self.next_event += 1;
        for (_, listener) in &self.listeners {
            listener(&event);
        }
        let id = event.id;
        self.last = Some(event);
        id
    }

    /// Most recent notification, if any.
    #[must_use]
    pub const fn last_event(&self) -> Option<&LocaleChanged> {
        self.last.as_ref()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for LocaleEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for LocaleEvents {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LocaleEvents")
            .field("listeners", &self.listeners.len())
            .field("next_event", &self.next_event)
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn sequential_ids_and_ordered_delivery() {
        let mut events = LocaleEvents::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        events.subscribe(move |event| first.borrow_mut().push(("first", event.id)));
        let second = Rc::clone(&seen);
        events.subscribe(move |event| second.borrow_mut().push(("second", event.id)));

        assert_eq!(events.publish(&Locale::from("en")), 1);
        assert_eq!(events.publish(&Locale::from("ja")), 2);

        assert_eq!(
            *seen.borrow(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );
        assert_eq!(
            events.last_event().map(|event| event.locale.as_str()),
            Some("ja")
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let mut events = LocaleEvents::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = events.subscribe(move |_| *counter.borrow_mut() += 1);

        events.publish(&Locale::from("en"));
        assert!(events.unsubscribe(id));
        assert!(!events.unsubscribe(id));
        events.publish(&Locale::from("en"));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(events.listener_count(), 0);
    }
}
