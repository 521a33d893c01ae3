//! Line classification: the Normal / InCode state machine.
//!
//! The classifier consumes source lines one at a time and emits at most one
//! [`Block`] per line. Two modes exist:
//!
//! - **Normal** — longest-prefix classification. Heading prefixes are tested
//!   from `#### ` down to `## ` so a level-4 heading can never be mistaken
//!   for level-2.
//! - **InCode** — entered on a fence line. Every line is buffered verbatim
//!   (no inline formatting, no trimming) until the closing fence flushes the
//!   buffer as one [`Block::CodeBlock`].
//!
//! Fence detection is prefix-based: the *whole* fence line is consumed,
//! including any language tag after the backticks. ` ```python ` opens a
//! block exactly like a bare ` ``` ` and the tag text is discarded.
//!
//! The classifier never fails. Malformed input degrades to a paragraph, and
//! an unterminated fence at end-of-input still flushes its buffer via
//! [`LineClassifier::finish`] — content is never silently dropped.

use super::{format_inline, Block, HeadingLevel};
use crate::prompts::{DIAGRAM_ALERT_DETECT, DIAGRAM_ALERT_MARKER};

const FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    InCode,
}

/// Stateful line-by-line block classifier.
#[derive(Debug)]
pub struct LineClassifier {
    mode: Mode,
    code_buffer: Vec<String>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            code_buffer: Vec::new(),
        }
    }

    /// Feed one source line; returns the block it completes, if any.
    ///
    /// A fence line returns `None` (it only toggles the mode), as does any
    /// line buffered inside a code block.
    pub fn push_line(&mut self, line: &str) -> Option<Block> {
        let stripped = line.trim();

        match self.mode {
            Mode::InCode => {
                if stripped.starts_with(FENCE) {
                    self.mode = Mode::Normal;
                    return Some(Block::CodeBlock {
                        lines: std::mem::take(&mut self.code_buffer),
                    });
                }
                self.code_buffer.push(line.to_string());
                None
            }
            Mode::Normal => {
                if stripped.starts_with(FENCE) {
                    self.mode = Mode::InCode;
                    return None;
                }
                Some(classify_normal(stripped))
            }
        }
    }

    /// Flush state at end-of-input.
    ///
    /// An unterminated fence yields its buffered lines as a final
    /// [`Block::CodeBlock`] rather than dropping them.
    pub fn finish(self) -> Option<Block> {
        match self.mode {
            Mode::InCode if !self.code_buffer.is_empty() => Some(Block::CodeBlock {
                lines: self.code_buffer,
            }),
            _ => None,
        }
    }
}

/// Classify a trimmed line in Normal mode, by priority order.
fn classify_normal(stripped: &str) -> Block {
    if stripped.is_empty() {
        return Block::BlankSpacer;
    }
    // Longest heading prefix first.
    if let Some(rest) = stripped.strip_prefix("#### ") {
        return Block::Heading {
            level: HeadingLevel::H4,
            text: format_inline(rest),
        };
    }
    if let Some(rest) = stripped.strip_prefix("### ") {
        return Block::Heading {
            level: HeadingLevel::H3,
            text: format_inline(rest),
        };
    }
    if let Some(rest) = stripped.strip_prefix("## ") {
        return Block::Heading {
            level: HeadingLevel::H2,
            text: format_inline(rest),
        };
    }
    // Diagram alerts outrank bullets: the callout keeps its full description
    // even when the model prefixed it with a list marker.
    if stripped.contains(DIAGRAM_ALERT_DETECT) {
        return Block::DiagramAlert {
            description: stripped.replace(DIAGRAM_ALERT_MARKER, "").trim().to_string(),
        };
    }
    if let Some(rest) = stripped.strip_prefix("* ") {
        return Block::Bullet {
            text: format_inline(rest),
        };
    }
    Block::Paragraph {
        text: format_inline(stripped),
    }
}
