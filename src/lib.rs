//! # vid2notes
//!
//! Turn educational videos into styled, paginated PDF study notes.
//!
//! ## Why this crate?
//!
//! Watching a lecture twice to take notes is a waste of a student's time.
//! This crate drives an LLM collaborator to extract a video's educational
//! content, distils it into a constrained Markdown dialect, and renders
//! that dialect into a paginated PDF entirely in memory — no browser, no
//! LaTeX toolchain, no font files.
//!
//! ## Pipeline Overview
//!
//! ```text
//! video URL
//!  │
//!  ├─ 1. Analyze        collaborator extracts raw educational content
//!  ├─ 2. ConvertFormat  collaborator distils it into dialect Markdown
//!  └─ 3. Render         classify lines → styled blocks → letter pages → PDF bytes
//! ```
//!
//! Stages run strictly in order over one [`PipelineState`]; the first error
//! halts the run. Stage 3 is pure, synchronous, in-memory computation — it
//! is also exposed directly as [`markdown_to_pdf`] for callers that already
//! have Markdown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vid2notes::{convert, NotesConfig, NoteType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = NotesConfig::builder()
//!         .note_type(NoteType::Long)
//!         .build()?;
//!     let output = convert("https://youtu.be/dQw4w9WgXcQ", &config).await?;
//!     std::fs::write("notes.pdf", &output.pdf_bytes)?;
//!     println!("{}", output.markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## The Markdown dialect
//!
//! The generation prompts restrict the model to what the renderer styles:
//! `##`/`###`/`####` headings, `* ` bullets, fenced code blocks,
//! `**bold**` / `*italic*` / `` `code` `` spans, and the
//! `📊 **[DIAGRAM ALERT]**:` callout line flagging visual content from the
//! source video. Anything else renders as a plain paragraph — the parser
//! never fails on malformed input.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `vid2notes` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! vid2notes = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod collaborator;
pub mod config;
pub mod convert;
pub mod error;
pub mod markdown;
pub mod observer;
pub mod output;
pub mod pdf;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use collaborator::{ContentSource, LlmContentSource, LlmMarkdownGenerator, MarkdownGenerator};
pub use config::{NoteType, NotesConfig, NotesConfigBuilder};
pub use convert::{
    convert, convert_to_file, generate_markdown, markdown_to_pdf, run_pipeline, PipelineState,
};
pub use error::NotesError;
pub use markdown::{build_document, Block, Document, DocumentMetadata, HeadingLevel, InlineSpan};
pub use observer::{NoopObserver, ObserverHandle, PipelineObserver, Stage};
pub use output::{default_output_filename, extract_video_id, NotesOutput, NotesStats};
pub use pdf::render;
