//! Abstract document the synchronizer rewrites.
//!
//! Markup is an external contract: the binding layer discovers marked elements
//! and metadata tags and hands the synchronizer (key, handle) pairs.

use crate::locale::Locale;

/// Where a resolved string is written on a bound element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// Element text content.
    Text,
    /// `placeholder` attribute of a text-input-like control.
    Placeholder,
    /// `content` attribute of a `<meta>` tag.
    Content,
}

impl TargetKind {
    /// Target for a marked element with the given tag name.
    #[must_use]
    pub fn for_tag(tag_name: &str) -> Self {
        if tag_name.eq_ignore_ascii_case("input") || tag_name.eq_ignore_ascii_case("textarea") {
            Self::Placeholder
        } else {
            Self::Text
        }
    }
}

/// Metadata rewritten on every apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaTarget {
    /// `<meta name="description">`.
    Description,
    /// `<meta name="keywords">`.
    Keywords,
    /// `<meta property="og:title">`.
    OgTitle,
    /// `<meta property="og:description">`.
    OgDescription,
    /// `<meta name="twitter:title">`.
    TwitterTitle,
    /// `<meta name="twitter:description">`.
    TwitterDescription,
    /// `<title>`.
    Title,
}

impl MetaTarget {
    /// Every metadata target, in rewrite order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Description,
            Self::Keywords,
            Self::OgTitle,
            Self::OgDescription,
            Self::TwitterTitle,
            Self::TwitterDescription,
            Self::Title,
        ]
    }

    /// Translation key used when the tag carries no marker of its own.
    #[must_use]
    pub const fn default_key(self) -> &'static str {
        match self {
            Self::Description => "meta.description",
            Self::Keywords => "meta.keywords",
            Self::OgTitle => "meta.og.title",
            Self::OgDescription => "meta.og.description",
            Self::TwitterTitle => "meta.twitter.title",
            Self::TwitterDescription => "meta.twitter.description",
            Self::Title => "meta.title",
        }
    }

    /// CSS selector locating the tag.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::Description => r#"meta[name="description"]"#,
            Self::Keywords => r#"meta[name="keywords"]"#,
            Self::OgTitle => r#"meta[property="og:title"]"#,
            Self::OgDescription => r#"meta[property="og:description"]"#,
            Self::TwitterTitle => r#"meta[name="twitter:title"]"#,
            Self::TwitterDescription => r#"meta[name="twitter:description"]"#,
            Self::Title => "title",
        }
    }

    /// Where the resolved value is written.
    #[must_use]
    pub const fn kind(self) -> TargetKind {
        match self {
            Self::Title => TargetKind::Text,
            _ => TargetKind::Content,
        }
    }
}

/// One element to rewrite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding<H> {
    /// Translation key.
    pub key: String,
    /// Opaque element handle owned by the document implementation.
    pub handle: H,
    /// Where the value is written.
    pub kind: TargetKind,
    /// Currently displayed value, used as the resolution default.
    pub current: String,
}

/// Document surface consumed by [`crate::DomSynchronizer`].
pub trait Document {
    /// Element handle type.
    type Handle;

    /// Set the document's declared language.
    fn set_language(&mut self, locale: &Locale);

    /// Elements carrying `marker_attribute`, excluding metadata tags.
    fn bindings(&self, marker_attribute: &str) -> Vec<Binding<Self::Handle>>;

    /// Present metadata targets; a tag's own marker overrides
    /// [`MetaTarget::default_key`].
    fn meta_bindings(&self, marker_attribute: &str) -> Vec<Binding<Self::Handle>>;

    /// Write `text` to the bound element.
    fn write(&mut self, binding: &Binding<Self::Handle>, text: &str);

    /// Rewrite the `og:locale` tag, if present.
    fn set_og_locale(&mut self, _value: &str) {}

    /// Broadcast that the locale changed (DOM event in the browser).
    fn announce_locale(&mut self, _locale: &Locale) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_inputs_use_placeholders() {
        assert_eq!(TargetKind::for_tag("INPUT"), TargetKind::Placeholder);
        assert_eq!(TargetKind::for_tag("textarea"), TargetKind::Placeholder);
        assert_eq!(TargetKind::for_tag("BUTTON"), TargetKind::Text);
        assert_eq!(TargetKind::for_tag("h1"), TargetKind::Text);
    }

    #[test]
    fn meta_targets_map_to_keys() {
        assert_eq!(MetaTarget::Title.default_key(), "meta.title");
        assert_eq!(MetaTarget::OgTitle.default_key(), "meta.og.title");
        assert_eq!(MetaTarget::Title.kind(), TargetKind::Text);
        assert_eq!(MetaTarget::Keywords.kind(), TargetKind::Content);
        assert_eq!(MetaTarget::all().len(), 7);
    }
}
