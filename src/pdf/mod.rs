//! PDF rendering: a [`Document`] in, one complete byte buffer out.
//!
//! The renderer is all-or-nothing. Blocks are laid out strictly in document
//! order; the first block that fails aborts the whole render and surfaces
//! [`NotesError::Render`] with that block's index, so nothing partial is
//! ever handed to a caller. The markdown→PDF path is pure, synchronous,
//! in-memory computation — no I/O, no suspension points.
//!
//! - [`style`]  — the fixed block-kind → visual-style table
//! - [`layout`] — the y-cursor page composer doing wrapping and page breaks

pub mod style;

mod layout;

pub use style::{style_for, FontKind, Style, INLINE_CODE_COLOR};

use crate::error::NotesError;
use crate::markdown::Document;
use layout::PageComposer;
use tracing::debug;

/// Render a document to PDF bytes.
///
/// Returns the complete, seekable PDF byte buffer, or a
/// [`NotesError::Render`] naming the offending block. Never returns a
/// partially rendered document.
pub fn render(document: &Document) -> Result<Vec<u8>, NotesError> {
    render_counted(document).map(|(bytes, _)| bytes)
}

/// As [`render`], additionally reporting the page count for stats.
pub(crate) fn render_counted(document: &Document) -> Result<(Vec<u8>, usize), NotesError> {
    let mut composer =
        PageComposer::new(&document.metadata.title).map_err(NotesError::Internal)?;

    for (index, block) in document.blocks.iter().enumerate() {
        composer
            .draw_block(block)
            .map_err(|detail| NotesError::Render {
                block_index: index,
                detail,
            })?;
    }

    let (bytes, pages) = composer.finish().map_err(NotesError::Internal)?;
    debug!(
        "Rendered {} blocks onto {} page(s), {} bytes",
        document.blocks.len(),
        pages,
        bytes.len()
    );
    Ok((bytes, pages))
}
