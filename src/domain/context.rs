//! Error context extension trait
//!
//! `.context()` / `.with_context()` in the style of `anyhow::Context`, but
//! returning [`ClinidocError`] so the error category survives. Message-only
//! variants get the context prepended; typed variants (input, render,
//! conversion) already name what failed and pass through unchanged.
//!
//! # Examples
//!
//! ```rust
//! use clinidoc::domain::context::ResultExt;
//! use clinidoc::domain::{ErrorCategory, Result};
//!
//! fn read_template(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))
//! }
//!
//! let err = read_template("/nonexistent/bp_chart.fodt").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Internal);
//! assert!(err.to_string().contains("Failed to read /nonexistent/bp_chart.fodt"));
//! ```

use crate::domain::errors::ClinidocError;
use crate::domain::result::Result;
use std::fmt::Display;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display;

    /// Add context computed only if an error occurred
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ClinidocError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display,
    {
        self.map_err(|e| Into::<ClinidocError>::into(e).with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Into::<ClinidocError>::into(e).with_context(f()))
    }
}

impl ClinidocError {
    /// Prepend `context` to message-only variants
    pub fn with_context(self, context: impl Display) -> Self {
        match self {
            ClinidocError::Configuration(m) => {
                ClinidocError::Configuration(format!("{context}: {m}"))
            }
            ClinidocError::Io(m) => ClinidocError::Io(format!("{context}: {m}")),
            ClinidocError::Serialization(m) => {
                ClinidocError::Serialization(format!("{context}: {m}"))
            }
            ClinidocError::Other(m) => ClinidocError::Other(format!("{context}: {m}")),
            typed => typed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCategory, InputError};

    #[test]
    fn test_context_on_io_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = result.context("Failed to read chart.fodt").unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Internal);
        let message = err.to_string();
        assert!(message.contains("Failed to read chart.fodt"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let called = std::cell::Cell::new(false);
        let result: Result<i32> = Ok(42);
        let value = result
            .with_context(|| {
                called.set(true);
                "never built"
            })
            .unwrap();

        assert_eq!(value, 42);
        assert!(!called.get());
    }

    #[test]
    fn test_context_keeps_configuration_category() {
        let result: Result<()> = Err(ClinidocError::Configuration("bad strategy".to_string()));
        let err = result.context("Loading clinidoc.toml").unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err.to_string(),
            ClinidocError::Configuration("Loading clinidoc.toml: bad strategy".to_string())
                .to_string()
        );
    }

    #[test]
    fn test_typed_errors_pass_through() {
        let result: Result<()> = Err(InputError::MissingIdentity("subject").into());
        let err = result.context("Rendering record 7").unwrap_err();

        assert!(matches!(
            err,
            ClinidocError::Input(InputError::MissingIdentity("subject"))
        ));
    }
}
