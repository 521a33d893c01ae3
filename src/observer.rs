//! Stage-progress callbacks for pipeline runs.
//!
//! Inject an [`Arc<dyn PipelineObserver>`] via
//! [`crate::config::NotesConfigBuilder::observer`] to receive events as the
//! pipeline enters and leaves each stage. Callers can forward events to a
//! terminal spinner, a channel, or a log sink without the library knowing
//! anything about how the host application communicates.

use std::fmt;
use std::sync::Arc;

/// The three ordered pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Acquire raw content from the video collaborator.
    Analyze,
    /// Turn raw content into dialect Markdown.
    ConvertFormat,
    /// Build the document and render the PDF.
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Analyze => "analyze",
            Stage::ConvertFormat => "convert-format",
            Stage::Render => "render",
        };
        f.write_str(name)
    }
}

/// Called by the pipeline controller around each stage.
///
/// All methods default to no-ops so implementations only override what they
/// care about. Stages run strictly sequentially, so no synchronisation is
/// required beyond `Send + Sync`.
pub trait PipelineObserver: Send + Sync {
    /// Called just before a stage begins.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage completes successfully.
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called when a stage fails; the pipeline stops after this.
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::NotesConfig`].
pub type ObserverHandle = Arc<dyn PipelineObserver>;
