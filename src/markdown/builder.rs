//! Document assembly: header blocks + classified body.
//!
//! [`build_document`] is the bridge between "a Markdown string" and "a
//! renderable [`Document`]". It owns the only impurity in the whole
//! markdown→PDF core — reading the wall clock for the generation timestamp.
//! [`build_document_at`] takes the timestamp explicitly so tests (and
//! callers that care about reproducible output) can pin it.

use super::{Block, Document, DocumentMetadata, LineClassifier};
use crate::config::NoteType;
use chrono::{DateTime, Local};

/// Build a [`Document`] from generated Markdown, stamped with the current
/// wall-clock time.
pub fn build_document(
    markdown: &str,
    title: &str,
    video_url: Option<&str>,
    note_type: NoteType,
) -> Document {
    build_document_at(markdown, title, video_url, note_type, Local::now())
}

/// Build a [`Document`] with an explicit generation timestamp.
///
/// Pure function of its inputs: the same arguments always yield a
/// structurally identical block sequence.
pub fn build_document_at(
    markdown: &str,
    title: &str,
    video_url: Option<&str>,
    note_type: NoteType,
    generated_at: DateTime<Local>,
) -> Document {
    let mut blocks = Vec::with_capacity(markdown.lines().count() + 4);

    // Header: title, timestamp, optional source line, breathing room.
    blocks.push(Block::Title {
        text: title.to_string(),
    });
    blocks.push(Block::Timestamp {
        text: format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S")),
    });
    if let Some(url) = video_url.filter(|u| !u.is_empty()) {
        blocks.push(Block::SourceLink {
            url: url.to_string(),
        });
    }
    blocks.push(Block::BlankSpacer);

    // Body: classify every line in source order.
    let mut classifier = LineClassifier::new();
    for line in markdown.lines() {
        if let Some(block) = classifier.push_line(line) {
            blocks.push(block);
        }
    }
    if let Some(tail) = classifier.finish() {
        blocks.push(tail);
    }

    Document {
        blocks,
        metadata: DocumentMetadata {
            title: title.to_string(),
            video_url: video_url.map(str::to_string),
            note_type,
            generated_at,
        },
    }
}
