//! In-memory stand-ins for the browser surfaces the localizer talks to.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use pageminer_i18n::{
    Binding, Document, EnvironmentError, FetchError, LanguageEnvironment, Locale, MetaTarget,
    TargetKind,
};

/// Query string, local storage, and navigator preferences held in maps.
#[derive(Clone, Debug, Default)]
pub struct MemoryEnvironment {
    /// Current query parameters.
    pub query: HashMap<String, String>,
    /// Persisted entries.
    pub storage: HashMap<String, String>,
    /// Reported language preferences.
    pub languages: Vec<String>,
    /// Every successful write, as `(operation, key, value)`.
    pub writes: Vec<(&'static str, String, String)>,
    /// Fail every write when set.
    pub fail_writes: bool,
}

impl MemoryEnvironment {
    /// Environment reporting the given runtime languages.
    #[must_use]
    pub fn with_languages(languages: &[&str]) -> Self {
        Self {
            languages: languages.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Add a query parameter.
    #[must_use]
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.insert(name.to_string(), value.to_string());
        self
    }

    /// Add a persisted entry.
    #[must_use]
    pub fn with_stored(mut self, key: &str, value: &str) -> Self {
        self.storage.insert(key.to_string(), value.to_string());
        self
    }
}

impl LanguageEnvironment for MemoryEnvironment {
    fn query_param(&self, name: &str) -> Option<String> {
        self.query.get(name).cloned()
    }

    fn stored_value(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn store_value(&mut self, key: &str, value: &str) -> Result<(), EnvironmentError> {
        if self.fail_writes {
            return Err(EnvironmentError::new("storage.set", "writes disabled"));
        }
        self.storage.insert(key.to_string(), value.to_string());
        self.writes
            .push(("storage.set", key.to_string(), value.to_string()));
        Ok(())
    }

    fn preferred_languages(&self) -> Vec<String> {
        self.languages.clone()
    }

    fn replace_query_param(&mut self, name: &str, value: &str) -> Result<(), EnvironmentError> {
        if self.fail_writes {
            return Err(EnvironmentError::new("history.replace", "writes disabled"));
        }
        self.query.insert(name.to_string(), value.to_string());
        self.writes
            .push(("history.replace", name.to_string(), value.to_string()));
        Ok(())
    }
}

/// Canned response for one location.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Successful body.
    Body(String),
    /// Non-success HTTP status.
    Status(u16),
}

/// Fetcher answering from a location map; unknown locations fail transport.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, MockResponse>,
    origin: Option<String>,
    probed: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    /// Empty fetcher without an origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the origin used for `{origin}` templates.
    #[must_use]
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    /// Serve `body` at `location`.
    #[must_use]
    pub fn with_body(mut self, location: &str, body: &str) -> Self {
        self.responses
            .insert(location.to_string(), MockResponse::Body(body.to_string()));
        self
    }

    /// Answer `location` with `status`.
    #[must_use]
    pub fn with_status(mut self, location: &str, status: u16) -> Self {
        self.responses
            .insert(location.to_string(), MockResponse::Status(status));
        self
    }

    /// Locations requested so far, in order.
    #[must_use]
    pub fn probed(&self) -> Vec<String> {
        self.probed.borrow().clone()
    }
}

#[async_trait(?Send)]
impl pageminer_i18n::DictionaryFetcher for MemoryFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        self.probed.borrow_mut().push(location.to_string());
        match self.responses.get(location) {
            Some(MockResponse::Body(body)) => Ok(body.clone().into_bytes()),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                location: location.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Transport {
                location: location.to_string(),
                detail: "no mock response".to_string(),
            }),
        }
    }

    fn origin(&self) -> Option<String> {
        self.origin.clone()
    }
}

/// Marked element in a [`MemoryDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockElement {
    /// Upper-case tag name, as the DOM reports it.
    pub tag: String,
    /// Marker attribute value.
    pub key: String,
    /// Text content.
    pub text: String,
    /// `placeholder` attribute.
    pub placeholder: String,
}

/// Metadata tag in a [`MemoryDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockMeta {
    /// Which metadata target this is.
    pub target: MetaTarget,
    /// Marker attribute value, if the tag carries one.
    pub key: Option<String>,
    /// `content` attribute (text for `<title>`).
    pub content: String,
}

/// Handle into a [`MemoryDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockHandle {
    /// Index into `elements`.
    Element(usize),
    /// Index into `metas`.
    Meta(usize),
}

/// Document with marked elements and metadata tags held in vectors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    /// Declared document language.
    pub lang: Option<String>,
    /// `og:locale` content.
    pub og_locale: Option<String>,
    /// Marked elements.
    pub elements: Vec<MockElement>,
    /// Metadata tags.
    pub metas: Vec<MockMeta>,
    /// Locales announced via `languageChanged`.
    pub announcements: Vec<String>,
    /// Number of writes performed.
    pub writes: usize,
}

impl MemoryDocument {
    /// Add a marked element.
    #[must_use]
    pub fn with_element(mut self, tag: &str, key: &str, text: &str) -> Self {
        self.elements.push(MockElement {
            tag: tag.to_ascii_uppercase(),
            key: key.to_string(),
            text: text.to_string(),
            placeholder: String::new(),
        });
        self
    }

    /// Add a marked text input with a placeholder.
    #[must_use]
    pub fn with_input(mut self, key: &str, placeholder: &str) -> Self {
        self.elements.push(MockElement {
            tag: "INPUT".to_string(),
            key: key.to_string(),
            text: String::new(),
            placeholder: placeholder.to_string(),
        });
        self
    }

    /// Add a metadata tag without its own marker.
    #[must_use]
    pub fn with_meta(mut self, target: MetaTarget, content: &str) -> Self {
        self.metas.push(MockMeta {
            target,
            key: None,
            content: content.to_string(),
        });
        self
    }

    /// Add a metadata tag carrying its own marker `key`.
    #[must_use]
    pub fn with_meta_key(mut self, target: MetaTarget, key: &str, content: &str) -> Self {
        self.metas.push(MockMeta {
            target,
            key: Some(key.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Text of the element bound to `key`.
    #[must_use]
    pub fn text_of(&self, key: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|element| element.key == key)
            .map(|element| element.text.as_str())
    }

    /// Content of the metadata tag for `target`.
    #[must_use]
    pub fn meta_content(&self, target: MetaTarget) -> Option<&str> {
        self.metas
            .iter()
            .find(|meta| meta.target == target)
            .map(|meta| meta.content.as_str())
    }
}

impl Document for MemoryDocument {
    type Handle = MockHandle;

    fn set_language(&mut self, locale: &Locale) {
        self.lang = Some(locale.to_string());
    }

    fn bindings(&self, _marker_attribute: &str) -> Vec<Binding<MockHandle>> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let kind = TargetKind::for_tag(&element.tag);
                let current = match kind {
                    TargetKind::Placeholder => element.placeholder.clone(),
                    TargetKind::Text | TargetKind::Content => element.text.clone(),
                };
                Binding {
                    key: element.key.clone(),
                    handle: MockHandle::Element(index),
                    kind,
                    current,
                }
            })
            .collect()
    }

    fn meta_bindings(&self, _marker_attribute: &str) -> Vec<Binding<MockHandle>> {
        self.metas
            .iter()
            .enumerate()
            .map(|(index, meta)| Binding {
                key: meta
                    .key
                    .clone()
                    .unwrap_or_else(|| meta.target.default_key().to_string()),
                handle: MockHandle::Meta(index),
                kind: meta.target.kind(),
                current: meta.content.clone(),
            })
            .collect()
    }

    fn write(&mut self, binding: &Binding<MockHandle>, text: &str) {
        self.writes += 1;
        match (binding.handle, binding.kind) {
            (MockHandle::Element(index), TargetKind::Placeholder) => {
                if let Some(element) = self.elements.get_mut(index) {
                    element.placeholder = text.to_string();
                }
            }
            (MockHandle::Element(index), _) => {
                if let Some(element) = self.elements.get_mut(index) {
                    element.text = text.to_string();
                }
            }
            (MockHandle::Meta(index), _) => {
                if let Some(meta) = self.metas.get_mut(index) {
                    meta.content = text.to_string();
                }
            }
        }
    }

    fn set_og_locale(&mut self, value: &str) {
        self.og_locale = Some(value.to_string());
    }

    fn announce_locale(&mut self, locale: &Locale) {
        self.announcements.push(locale.to_string());
    }
}
