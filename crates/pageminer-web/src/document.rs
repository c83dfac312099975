//! [`Document`] implementation over the live DOM.

use gloo::console;
use pageminer_i18n::{Binding, Document, Locale, MetaTarget, TargetKind};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Element};

use crate::browser::describe;

/// DOM event dispatched on `document` after every apply.
pub(crate) const LOCALE_EVENT: &str = "languageChanged";

const OG_LOCALE_SELECTOR: &str = r#"meta[property="og:locale"]"#;

pub(crate) struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub(crate) const fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    fn select_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            console::warn!("invalid selector", selector.to_string());
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
}

impl Document for WebDocument {
    type Handle = Element;

    fn set_language(&mut self, locale: &Locale) {
        if let Some(root) = self.document.document_element() {
            set_attribute(&root, "lang", locale.as_str());
        }
    }

    fn bindings(&self, marker_attribute: &str) -> Vec<Binding<Element>> {
        self.select_all(&format!("[{marker_attribute}]"))
            .into_iter()
            .filter(|element| !is_metadata(element))
            .filter_map(|element| {
                let key = element.get_attribute(marker_attribute)?;
                let kind = TargetKind::for_tag(&element.tag_name());
                Some(Binding {
                    current: current_value(&element, kind),
                    key,
                    handle: element,
                    kind,
                })
            })
            .collect()
    }

    fn meta_bindings(&self, marker_attribute: &str) -> Vec<Binding<Element>> {
        MetaTarget::all()
            .into_iter()
            .filter_map(|target| {
                let element = self.document.query_selector(target.selector()).ok()??;
                let key = element
                    .get_attribute(marker_attribute)
                    .unwrap_or_else(|| target.default_key().to_string());
                let kind = target.kind();
                Some(Binding {
                    current: current_value(&element, kind),
                    key,
                    handle: element,
                    kind,
                })
            })
            .collect()
    }

    fn write(&mut self, binding: &Binding<Element>, text: &str) {
        match binding.kind {
            TargetKind::Text => binding.handle.set_text_content(Some(text)),
            TargetKind::Placeholder => set_attribute(&binding.handle, "placeholder", text),
            TargetKind::Content => set_attribute(&binding.handle, "content", text),
        }
    }

    fn set_og_locale(&mut self, value: &str) {
        if let Ok(Some(element)) = self.document.query_selector(OG_LOCALE_SELECTOR) {
            set_attribute(&element, "content", value);
        }
    }

    fn announce_locale(&mut self, locale: &Locale) {
        if let Err(err) = dispatch_locale_event(&self.document, locale) {
            console::error!("failed to dispatch locale event", describe(&err));
        }
    }
}

fn dispatch_locale_event(document: &web_sys::Document, locale: &Locale) -> Result<(), JsValue> {
    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &"language".into(), &locale.as_str().into())?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(LOCALE_EVENT, &init)?;
    document.dispatch_event(&event)?;
    Ok(())
}

fn is_metadata(element: &Element) -> bool {
    let tag = element.tag_name();
    tag.eq_ignore_ascii_case("meta") || tag.eq_ignore_ascii_case("title")
}

fn current_value(element: &Element, kind: TargetKind) -> String {
    match kind {
        TargetKind::Text => element.text_content(),
        TargetKind::Placeholder => element.get_attribute("placeholder"),
        TargetKind::Content => element.get_attribute("content"),
    }
    .unwrap_or_default()
}

fn set_attribute(element: &Element, name: &str, value: &str) {
    if let Err(err) = element.set_attribute(name, value) {
        console::warn!("failed to set attribute", name.to_string(), describe(&err));
    }
}
