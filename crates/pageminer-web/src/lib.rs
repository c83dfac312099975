#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]
//! Browser binding for the PageMiner localization core.
//! URL helpers, console diagnostics, and the language switcher view model
//! build natively; the DOM,
//! storage, and fetch bindings only exist on wasm32.

pub mod diagnostics;
pub mod location;
pub mod switcher;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod document;
#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(target_arch = "wasm32")]
mod widget;

#[cfg(target_arch = "wasm32")]
pub use app::{PageI18n, init_i18n, run_app};
