//! Generation pipeline
//!
//! [`DocumentPipeline`] coordinates the mapping, rendering, conversion and
//! caching components for every form kind.

pub mod cancel;
pub mod coordinator;
pub mod outcome;

pub use cancel::{never_cancelled, CancelSignal};
pub use coordinator::DocumentPipeline;
pub use outcome::PipelineOutcome;
