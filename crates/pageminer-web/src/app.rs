//! Page composition root and the JavaScript-facing handle.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use pageminer_i18n::{ConfigError, I18nConfig, Localizer, SwitchOutcome};
use wasm_bindgen::prelude::*;

use crate::browser::{BrowserEnvironment, describe};
use crate::diagnostics::Diagnostic;
use crate::document::WebDocument;
use crate::fetch::GlooFetcher;
use crate::widget;

/// Window property the auto-started handle is published under.
const GLOBAL_HANDLE: &str = "i18n";

pub(crate) struct PageState {
    localizer: Localizer,
    env: BrowserEnvironment,
    document: WebDocument,
}

impl PageState {
    pub(crate) const fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub(crate) const fn localizer_mut(&mut self) -> &mut Localizer {
        &mut self.localizer
    }

    pub(crate) fn switch(&mut self, code: &str) -> SwitchOutcome {
        let Self {
            localizer,
            env,
            document,
        } = self;
        localizer.switch_locale(code, env, document)
    }
}

pub(crate) type SharedPage = Rc<RefCell<PageState>>;

/// Handle exposed to page scripts.
#[wasm_bindgen]
pub struct PageI18n {
    page: SharedPage,
}

#[wasm_bindgen]
impl PageI18n {
    /// Switch to `code`; returns `false` when the locale is unsupported or
    /// the page is mid-update.
    #[wasm_bindgen(js_name = switchLanguage)]
    #[must_use]
    pub fn switch_language(&self, code: &str) -> bool {
        match self.page.try_borrow_mut() {
            Ok(mut state) => {
                let outcome = state.switch(code);
                if let Some(warning) = Diagnostic::for_switch(&outcome, code) {
                    warning.emit();
                }
                outcome != SwitchOutcome::Rejected
            }
            Err(_) => {
                console::warn!("page busy; locale switch ignored", code.to_string());
                false
            }
        }
    }

    /// Translation for `key`, degrading to `default` and then the key.
    ///
    /// Safe to call from a `languageChanged` listener.
    #[must_use]
    pub fn text(&self, key: &str, default: Option<String>) -> String {
        self.page.try_borrow().map_or_else(
            |_| default.clone().unwrap_or_else(|| key.to_string()),
            |state| {
                state
                    .localizer()
                    .resolver()
                    .resolve(key, default.as_deref(), None)
            },
        )
    }

    /// Active locale code.
    #[wasm_bindgen(getter, js_name = currentLanguage)]
    #[must_use]
    pub fn current_language(&self) -> Option<String> {
        self.page
            .try_borrow()
            .ok()
            .map(|state| state.localizer().active_locale().to_string())
    }

    /// Supported locale codes in display order.
    #[wasm_bindgen(js_name = supportedLanguages)]
    #[must_use]
    pub fn supported_languages(&self) -> js_sys::Array {
        self.page.try_borrow().map_or_else(
            |_| js_sys::Array::new(),
            |state| {
                state
                    .localizer()
                    .supported_locales()
                    .iter()
                    .map(|locale| JsValue::from_str(locale.as_str()))
                    .collect()
            },
        )
    }
}

/// Localize the current page with `config_json` (defaults when omitted) and
/// return a handle to it.
///
/// # Errors
///
/// Rejects with the validation message when the configuration is invalid.
#[wasm_bindgen(js_name = initI18n)]
pub async fn init_i18n(config_json: Option<String>) -> Result<PageI18n, JsValue> {
    let config = match config_json {
        Some(raw) => I18nConfig::from_json_str(&raw),
        None => Ok(I18nConfig::default()),
    }
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let page = boot(config)
        .await
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(PageI18n { page })
}

async fn boot(config: I18nConfig) -> Result<SharedPage, ConfigError> {
    let mut localizer = Localizer::new(config)?;
    let mut env = BrowserEnvironment::new();
    let mut document = WebDocument::new(gloo::utils::document());

    let report = localizer
        .initialize(&mut env, &GlooFetcher, &mut document)
        .await;
    for warning in Diagnostic::for_load(&report) {
        warning.emit();
    }

    let page = Rc::new(RefCell::new(PageState {
        localizer,
        env,
        document,
    }));
    widget::install(&page);
    Ok(page)
}

/// Start localization with the default configuration once the DOM is parsed,
/// publishing the handle as `window.i18n`.
pub fn run_app() {
    console_error_panic_hook::set_once();
    let document = gloo::utils::document();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_event| start()).forget();
    } else {
        start();
    }
}

fn start() {
    wasm_bindgen_futures::spawn_local(async {
        match boot(I18nConfig::default()).await {
            Ok(page) => {
                let handle = JsValue::from(PageI18n { page });
                let published = js_sys::Reflect::set(
                    &gloo::utils::window(),
                    &JsValue::from_str(GLOBAL_HANDLE),
                    &handle,
                );
                if let Err(err) = published {
                    console::error!("failed to publish i18n handle", describe(&err));
                }
            }
            Err(err) => console::error!("localization disabled", err.to_string()),
        }
    });
}
