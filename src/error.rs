//! Error types for the vid2notes library.
//!
//! Every failure in the pipeline collapses into one enum, [`NotesError`],
//! because the pipeline has exactly one consumer-visible failure policy:
//! the first stage error halts the run and is reported as-is. There is no
//! partial-success mode — a conversion either produces a complete PDF or
//! carries one error explaining which stage gave up and why.
//!
//! One deliberate exception to "nothing survives a failure": when rendering
//! fails ([`NotesError::Render`]) the generated Markdown is still valid and
//! callers are expected to fall back to it. [`crate::convert::PipelineState`]
//! encodes that rule in its accessors.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the vid2notes library.
#[derive(Debug, Error)]
pub enum NotesError {
    // ── Acquisition (stage 1) ─────────────────────────────────────────────
    /// The content-acquisition collaborator failed for this video URL.
    #[error("Failed to acquire content for '{url}': {detail}")]
    Acquisition { url: String, detail: String },

    /// The collaborator returned an empty or whitespace-only blob.
    #[error("Content acquisition returned nothing for '{url}'\nThe video may be unavailable or have no extractable content.")]
    EmptyAcquisition { url: String },

    /// The acquisition call exceeded the configured deadline.
    #[error("Content acquisition timed out after {secs}s for '{url}'\nIncrease --acquire-timeout for long videos.")]
    AcquisitionTimeout { url: String, secs: u64 },

    // ── Format conversion (stage 2) ───────────────────────────────────────
    /// The markdown-generation collaborator failed.
    #[error("Markdown generation failed: {detail}")]
    FormatConversion { detail: String },

    /// The generation call returned empty text.
    #[error("Markdown generation returned empty output")]
    EmptyGeneration,

    /// The generation call exceeded the configured deadline.
    #[error("Markdown generation timed out after {secs}s\nIncrease --api-timeout.")]
    GenerationTimeout { secs: u64 },

    // ── Rendering (stage 3) ───────────────────────────────────────────────
    /// Laying out or serialising a block failed.
    ///
    /// `block_index` is the position of the offending block in
    /// [`crate::markdown::Document`]. The Markdown produced by stage 2
    /// remains valid; callers should offer it as a fallback.
    #[error("PDF rendering failed at block {block_index}: {detail}")]
    Render { block_index: usize, detail: String },

    // ── Configuration ─────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O ───────────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotesError {
    /// True when the generated Markdown is still trustworthy despite the
    /// error — i.e. the failure happened strictly after stage 2.
    pub fn markdown_survives(&self) -> bool {
        matches!(
            self,
            NotesError::Render { .. } | NotesError::OutputWriteFailed { .. }
        )
    }
}
