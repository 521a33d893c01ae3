//! The constrained-Markdown document model and its line-based parser.
//!
//! The dialect accepted here is deliberately small — it is exactly what the
//! generation prompts in [`crate::prompts`] instruct the model to emit:
//!
//! - `##` / `###` / `####` headings
//! - `* ` bullet lines
//! - fenced code blocks (three backticks)
//! - `**bold**`, `*italic*`, `` `inline code` `` spans
//! - the diagram-alert callout line
//!
//! Anything else degrades to a plain paragraph; the parser never fails.
//! There is no nesting, no tables, no images — a full CommonMark parser
//! would be the wrong tool for input we control end-to-end.
//!
//! ## Module map
//!
//! - [`inline`]   — bold/italic/code span extraction within one line
//! - [`classify`] — the Normal/InCode line state machine producing [`Block`]s
//! - [`builder`]  — drives the classifier over a whole document and prepends
//!   the title/timestamp header blocks

pub mod builder;
pub mod classify;
pub mod inline;

pub use builder::{build_document, build_document_at};
pub use classify::LineClassifier;
pub use inline::format_inline;

use crate::config::NoteType;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A run of text with uniform inline styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

impl InlineSpan {
    /// A span with no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            code: false,
        }
    }
}

/// An ordered sequence of styled spans making up one line of content.
pub type StyledText = Vec<InlineSpan>;

/// Heading depth. The dialect starts at `##`; a single `#` never appears in
/// generated notes, so level 1 does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    pub fn as_u8(self) -> u8 {
        match self {
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }
}

/// One structural unit of the output document.
///
/// Blocks are immutable once produced; the renderer consumes them in order.
/// The `Title`/`Timestamp`/`SourceLink` variants only ever appear in the
/// document header prepended by [`builder::build_document`], never from
/// classified Markdown lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Heading { level: HeadingLevel, text: StyledText },
    Paragraph { text: StyledText },
    Bullet { text: StyledText },
    CodeBlock { lines: Vec<String> },
    DiagramAlert { description: String },
    BlankSpacer,
    Title { text: String },
    Timestamp { text: String },
    SourceLink { url: String },
}

/// Document-level metadata carried alongside the block sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub video_url: Option<String>,
    pub note_type: NoteType,
    pub generated_at: DateTime<Local>,
}

/// An ordered sequence of blocks plus metadata, ready for rendering.
///
/// Built once per conversion; never mutated after handoff to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Blocks originating from the Markdown body (header blocks skipped).
    pub fn body_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| {
            !matches!(
                b,
                Block::Title { .. } | Block::Timestamp { .. } | Block::SourceLink { .. }
            )
        })
    }
}
