//! View model for the language switcher dropdown.
//!
//! The wasm widget renders this model into the navbar and re-syncs the DOM
//! after each mutation, so every state transition is testable natively.

use pageminer_i18n::Localizer;

/// Container the switcher is appended to.
pub const NAVBAR_SELECTOR: &str = ".navbar .container";
/// Root element class.
pub const SWITCHER_CLASS: &str = "language-switcher";
/// Header showing the active locale.
pub const CURRENT_CLASS: &str = "lang-current";
/// Option list container.
pub const DROPDOWN_CLASS: &str = "lang-dropdown";
/// One selectable locale.
pub const OPTION_CLASS: &str = "lang-option";
/// Flag glyph span.
pub const FLAG_CLASS: &str = "lang-flag";
/// Display name span.
pub const NAME_CLASS: &str = "lang-name";
/// Header arrow span.
pub const ARROW_CLASS: &str = "lang-arrow";
/// Marks the option of the active locale.
pub const ACTIVE_CLASS: &str = "active";
/// Marks the dropdown as open.
pub const OPEN_CLASS: &str = "show";
/// Attribute carrying an option's locale code.
pub const LANG_ATTRIBUTE: &str = "data-lang";
/// Header arrow glyph.
pub const ARROW: &str = "▼";

/// One dropdown entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitcherOption {
    /// Locale code.
    pub code: String,
    /// Flag glyph.
    pub flag: &'static str,
    /// Display name.
    pub label: String,
    /// Whether this is the active locale.
    pub active: bool,
}

impl SwitcherOption {
    /// Class attribute for the option element.
    #[must_use]
    pub fn class_name(&self) -> String {
        if self.active {
            format!("{OPTION_CLASS} {ACTIVE_CLASS}")
        } else {
            OPTION_CLASS.to_string()
        }
    }
}

/// Dropdown state: options in display order plus the open flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitcherModel {
    options: Vec<SwitcherOption>,
    open: bool,
}

impl SwitcherModel {
    /// Model reflecting the localizer's supported and active locales.
    #[must_use]
    pub fn from_localizer(localizer: &Localizer) -> Self {
        let active = localizer.active_locale();
        let options = localizer
            .supported_locales()
            .iter()
            .map(|locale| SwitcherOption {
                code: locale.to_string(),
                flag: localizer.locale_flag(locale.as_str()),
                label: localizer.locale_label(locale.as_str()),
                active: locale == active,
            })
            .collect();
        Self {
            options,
            open: false,
        }
    }

    /// Options in display order.
    #[must_use]
    pub fn options(&self) -> &[SwitcherOption] {
        &self.options
    }

    /// Active option, if any.
    #[must_use]
    pub fn current(&self) -> Option<&SwitcherOption> {
        self.options.iter().find(|option| option.active)
    }

    /// Whether the dropdown is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Class attribute for the dropdown element.
    #[must_use]
    pub fn dropdown_class(&self) -> String {
        if self.open {
            format!("{DROPDOWN_CLASS} {OPEN_CLASS}")
        } else {
            DROPDOWN_CLASS.to_string()
        }
    }

    /// Flip the open flag.
    pub const fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Close the dropdown.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Mark `code` active and close the dropdown; unknown codes are ignored.
    pub fn select(&mut self, code: &str) -> bool {
        if !self.options.iter().any(|option| option.code == code) {
            return false;
        }
        for option in &mut self.options {
            option.active = option.code == code;
        }
        self.open = false;
        true
    }
}
