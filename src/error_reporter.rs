//! Error reporting utilities for user-friendly error display

use procwrap_config::ConfigError;
use procwrap_runner::{RunnerError, UserFriendlyError};

/// Rendered report for one error: message, optional context, suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl ErrorReport {
    pub fn from_user_friendly(error: &dyn UserFriendlyError) -> Self {
        Self {
            message: error.user_message(),
            context: error.context(),
            suggestions: error.suggestions(),
        }
    }

    /// Build a report for an error surfaced at the CLI edge.
    ///
    /// Known error types contribute their context and suggestions; anything
    /// else is reported with its full cause chain.
    pub fn from_anyhow(error: &anyhow::Error) -> Self {
        if let Some(runner) = error.downcast_ref::<RunnerError>() {
            Self::from_user_friendly(runner)
        } else if let Some(config) = error.downcast_ref::<ConfigError>() {
            let mut report = Self::from_user_friendly(config);
            // keep the file path the error was attached to
            report.message = format!("{error:#}");
            report
        } else {
            Self {
                message: format!("{error:#}"),
                context: None,
                suggestions: Vec::new(),
            }
        }
    }

    /// Multi-line text shown on stderr.
    #[must_use]
    pub fn render(&self, operation: &str) -> String {
        let mut out = format!("✗ {operation} failed: {}", self.message);
        if let Some(context) = &self.context {
            out.push_str("\n\n");
            out.push_str(context);
        }
        if !self.suggestions.is_empty() {
            out.push_str("\n\nSuggestions:");
            for suggestion in &self.suggestions {
                out.push_str("\n  • ");
                out.push_str(suggestion);
            }
        }
        out
    }
}
