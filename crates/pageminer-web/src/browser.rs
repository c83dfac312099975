//! Page environment backed by `window.location`, `localStorage`, and
//! `navigator.languages`.

use pageminer_i18n::{EnvironmentError, LanguageEnvironment};
use wasm_bindgen::JsValue;
use web_sys::{Storage, Window};

use crate::diagnostics::Diagnostic;
use crate::location;

pub(crate) struct BrowserEnvironment {
    window: Window,
}

impl BrowserEnvironment {
    pub(crate) fn new() -> Self {
        Self {
            window: gloo::utils::window(),
        }
    }

    fn href(&self) -> Result<String, EnvironmentError> {
        self.window
            .location()
            .href()
            .map_err(|err| EnvironmentError::new("location.href", describe(&err)))
    }

    fn storage(&self) -> Result<Storage, EnvironmentError> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(EnvironmentError::new("storage.open", "localStorage unavailable")),
            Err(err) => Err(EnvironmentError::new("storage.open", describe(&err))),
        }
    }
}

impl LanguageEnvironment for BrowserEnvironment {
    fn query_param(&self, name: &str) -> Option<String> {
        let href = self.href().ok()?;
        location::query_param(&href, name)
    }

    fn stored_value(&self, key: &str) -> Option<String> {
        self.storage().ok()?.get_item(key).ok().flatten()
    }

    fn store_value(&mut self, key: &str, value: &str) -> Result<(), EnvironmentError> {
        self.storage()
            .inspect_err(warn_environment)?
            .set_item(key, value)
            .map_err(|err| EnvironmentError::new("storage.set", describe(&err)))
            .inspect_err(warn_environment)
    }

    fn preferred_languages(&self) -> Vec<String> {
        let navigator = self.window.navigator();
        let mut tags: Vec<String> = navigator
            .languages()
            .iter()
            .filter_map(|tag| tag.as_string())
            .collect();
        if tags.is_empty() {
            tags.extend(navigator.language());
        }
        tags
    }

    fn replace_query_param(&mut self, name: &str, value: &str) -> Result<(), EnvironmentError> {
        let href = self.href().inspect_err(warn_environment)?;
        let next = location::with_query_param(&href, name, value)
            .map_err(|err| EnvironmentError::new("location.parse", err.to_string()))
            .inspect_err(warn_environment)?;
        self.window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(&next)))
            .map_err(|err| EnvironmentError::new("history.replace_state", describe(&err)))
            .inspect_err(warn_environment)
    }
}

fn warn_environment(err: &EnvironmentError) {
    Diagnostic::for_environment(err).emit();
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
