#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

//! Native tooling for the PageMiner landing page.
//!
//! Layout: `serve.rs` (static preview server), `audit.rs` + `fetch.rs`
//! (translation audit over the shared localization core), `cli.rs` (clap
//! surface and dispatch).

pub mod audit;
pub mod cli;
pub mod error;
pub mod fetch;
pub mod serve;

pub use audit::{AuditReport, LocaleAudit, run_audit};
pub use cli::{Cli, run};
pub use error::{ServerError, ServerResult};
pub use fetch::NativeFetcher;
pub use serve::{PreviewServer, bind_with_fallback};
