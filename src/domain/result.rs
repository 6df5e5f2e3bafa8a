//! Result type alias for Clinidoc
//!
//! Convenience alias using [`ClinidocError`] as the error type.

use super::errors::ClinidocError;

/// Result type alias for Clinidoc operations
///
/// # Examples
///
/// ```
/// use clinidoc::domain::result::Result;
/// use clinidoc::domain::errors::ClinidocError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ClinidocError::Other("boom".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ClinidocError>;
