//! CLI command implementations
//!
//! This module contains all CLI command implementations. Every command
//! returns a process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 2 | Configuration error |
//! | 3 | Input (record) error |
//! | 4 | Conversion error |
//! | 5 | Fatal error |

pub mod init;
pub mod invalidate;
pub mod reconvert;
pub mod render;
pub mod serve;
pub mod validate;

use crate::domain::{ClinidocError, ErrorCategory};

/// Exit code for a failed command
pub fn exit_code_for(error: &ClinidocError) -> i32 {
    match error.category() {
        ErrorCategory::Configuration => 2,
        ErrorCategory::Input => 3,
        ErrorCategory::Conversion => 4,
        ErrorCategory::PartialState | ErrorCategory::Cancelled | ErrorCategory::Internal => 5,
    }
}
