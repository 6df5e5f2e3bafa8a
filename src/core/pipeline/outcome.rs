//! Pipeline run results

use crate::domain::GeneratedArtifact;
use std::time::Duration;

/// Result of one `ensure_artifact` call
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub artifact: GeneratedArtifact,

    /// The fixed-layout artifact already existed and nothing was generated
    pub cache_hit: bool,

    /// Whether the template render ran (false when reusing an editable artifact)
    pub rendered: bool,

    /// Wall time including any wait on the single-flight gate
    pub duration: Duration,
}

impl PipelineOutcome {
    pub fn summary(&self) -> String {
        let source = if self.cache_hit {
            "cached"
        } else if self.rendered {
            "generated"
        } else {
            "reconverted"
        };
        format!(
            "{} {} ({source}, {} ms)",
            self.artifact.identity.kind.label(),
            self.artifact.fixed_layout.display(),
            self.duration.as_millis()
        )
    }
}
