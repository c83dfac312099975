//! Developer-facing console warnings.
//!
//! The core reports through `tracing`, which has no subscriber in the
//! browser, so the binding mirrors the conditions a page author needs to see.

use std::fmt;

use pageminer_i18n::{EnvironmentError, FetchError, LoadReport, SwitchOutcome};

/// One console warning: a constant message plus context values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Constant message.
    pub message: &'static str,
    /// Context values, in display order.
    pub context: Vec<String>,
}

impl Diagnostic {
    fn new(message: &'static str, context: Vec<String>) -> Self {
        Self { message, context }
    }

    /// Warning for a switch request, if it was rejected.
    #[must_use]
    pub fn for_switch(outcome: &SwitchOutcome, code: &str) -> Option<Self> {
        matches!(outcome, SwitchOutcome::Rejected)
            .then(|| Self::new("unsupported locale", vec![code.to_string()]))
    }

    /// Warning for a failed dictionary source.
    #[must_use]
    pub fn for_fetch(err: &FetchError) -> Self {
        let mut context = Vec::with_capacity(3);
        context.extend(err.location().map(str::to_string));
        context.push(err.to_string());
        match err {
            FetchError::Transport { detail, .. } => context.push(detail.clone()),
            FetchError::Status { status, .. } => context.push(status.to_string()),
            FetchError::Malformed { source, .. } => context.push(source.to_string()),
            FetchError::NoSources { .. } => {}
        }
        Self::new("dictionary source failed", context)
    }

    /// Warning for a failed storage or history write.
    #[must_use]
    pub fn for_environment(err: &EnvironmentError) -> Self {
        Self::new(
            "environment operation failed",
            vec![err.operation.to_string(), err.detail.clone()],
        )
    }

    /// One warning per locale a load pass left absent.
    #[must_use]
    pub fn for_load(report: &LoadReport) -> Vec<Self> {
        report
            .failed
            .iter()
            .map(|failure| {
                Self::new(
                    "translation dictionary unavailable",
                    vec![failure.locale.to_string(), failure.error.to_string()],
                )
            })
            .collect()
    }

    /// Write to the browser console.
    #[cfg(target_arch = "wasm32")]
    pub fn emit(&self) {
        gloo::console::warn!(self.to_string());
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)?;
        if !self.context.is_empty() {
            write!(f, ": {}", self.context.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pageminer_i18n::{Locale, LoadFailure};

    #[test]
    fn only_rejected_switches_warn() {
        let warning = Diagnostic::for_switch(&SwitchOutcome::Rejected, "pt").expect("rejected");
        assert_eq!(warning.to_string(), "unsupported locale: pt");

        assert!(Diagnostic::for_switch(&SwitchOutcome::Unchanged, "en").is_none());
        let switched = SwitchOutcome::Switched {
            previous: Locale::from("zh-CN"),
        };
        assert!(Diagnostic::for_switch(&switched, "en").is_none());
    }

    #[test]
    fn source_failures_name_the_location() {
        let warning = Diagnostic::for_fetch(&FetchError::Status {
            location: "locales/ja.json".into(),
            status: 404,
        });
        assert_eq!(warning.message, "dictionary source failed");
        assert_eq!(warning.context[0], "locales/ja.json");
        assert_eq!(warning.context.last().map(String::as_str), Some("404"));
    }

    #[test]
    fn environment_failures_carry_operation_and_detail() {
        let warning = Diagnostic::for_environment(&EnvironmentError::new(
            "storage.set",
            "QuotaExceededError",
        ));
        assert_eq!(
            warning.to_string(),
            "environment operation failed: storage.set QuotaExceededError"
        );
    }

    #[test]
    fn load_failures_warn_per_locale() {
        let report = LoadReport {
            failed: vec![LoadFailure {
                locale: Locale::from("ko"),
                error: FetchError::NoSources {
                    locale: "ko".into(),
                },
            }],
            ..LoadReport::default()
        };

        let warnings = Diagnostic::for_load(&report);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].context[0], "ko");
        assert!(Diagnostic::for_load(&LoadReport::default()).is_empty());
    }
}
