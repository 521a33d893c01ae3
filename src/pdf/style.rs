//! The style registry: one fixed visual style per block kind.
//!
//! A pure lookup table, built at compile time and immutable afterwards.
//! Every [`Block`] variant has an entry, so `style_for` is total and cannot
//! fail. All sizes are in points, all distances in millimetres (printpdf's
//! native unit); [`pt`] converts at the standard 72 dpi ratio.

use crate::markdown::Block;

/// Points → millimetres (1 pt = 1/72 in = 0.352778 mm).
pub(crate) const fn pt(v: f32) -> f32 {
    v * 0.352_778
}

/// Which base font family a block is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// Helvetica family; bold/oblique variants chosen per span.
    Sans,
    /// Courier; used for code blocks and inline code spans.
    Mono,
}

/// Visual attributes for one block kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub font: FontKind,
    /// Base font size in points.
    pub size_pt: f32,
    /// Whether the base weight is bold (headings, title).
    pub bold: bool,
    /// Text colour as RGB in 0.0–1.0.
    pub color: (f32, f32, f32),
    /// Indentation from the left margin, millimetres.
    pub left_indent_mm: f32,
    pub space_before_mm: f32,
    pub space_after_mm: f32,
    /// Fill drawn behind each text line (code blocks).
    pub background: Option<(f32, f32, f32)>,
}

const BLACK: (f32, f32, f32) = (0.0, 0.0, 0.0);
const DARK_GREEN: (f32, f32, f32) = (0.0, 0.392, 0.0);
const BLUE: (f32, f32, f32) = (0.0, 0.0, 1.0);
const RED: (f32, f32, f32) = (1.0, 0.0, 0.0);
const CODE_GRAY: (f32, f32, f32) = (0.2, 0.2, 0.2);
const CODE_BACKGROUND: (f32, f32, f32) = (0.961, 0.961, 0.961);

/// Colour for inline `` `code` `` spans in body text (#C7254E).
pub const INLINE_CODE_COLOR: (f32, f32, f32) = (0.78, 0.145, 0.306);

const TITLE: Style = Style {
    font: FontKind::Sans,
    size_pt: 18.0,
    bold: true,
    color: BLACK,
    left_indent_mm: 0.0,
    space_before_mm: 0.0,
    space_after_mm: pt(12.0),
    background: None,
};

const NORMAL: Style = Style {
    font: FontKind::Sans,
    size_pt: 10.0,
    bold: false,
    color: BLACK,
    left_indent_mm: 0.0,
    space_before_mm: 0.0,
    space_after_mm: pt(2.0),
    background: None,
};

const SOURCE_LINK: Style = Style {
    color: BLUE,
    ..NORMAL
};

const HEADING_2: Style = Style {
    size_pt: 16.0,
    bold: true,
    color: DARK_GREEN,
    space_before_mm: pt(18.0),
    space_after_mm: pt(12.0),
    ..NORMAL
};

const HEADING_3: Style = Style {
    size_pt: 14.0,
    bold: true,
    color: BLUE,
    space_before_mm: pt(14.0),
    space_after_mm: pt(10.0),
    ..NORMAL
};

const HEADING_4: Style = Style {
    size_pt: 12.0,
    bold: true,
    color: DARK_GREEN,
    space_before_mm: pt(12.0),
    space_after_mm: pt(8.0),
    ..NORMAL
};

const BULLET: Style = Style {
    left_indent_mm: pt(20.0),
    space_after_mm: pt(4.0),
    ..NORMAL
};

const DIAGRAM_ALERT: Style = Style {
    color: RED,
    left_indent_mm: pt(20.0),
    space_before_mm: pt(6.0),
    space_after_mm: pt(6.0),
    ..NORMAL
};

const CODE_BLOCK: Style = Style {
    font: FontKind::Mono,
    size_pt: 9.0,
    color: CODE_GRAY,
    left_indent_mm: pt(20.0),
    space_before_mm: pt(6.0),
    space_after_mm: pt(6.0),
    background: Some(CODE_BACKGROUND),
    ..NORMAL
};

const BLANK_SPACER: Style = Style {
    space_after_mm: pt(6.0),
    ..NORMAL
};

/// Look up the style for a block. Total by construction.
pub fn style_for(block: &Block) -> &'static Style {
    match block {
        Block::Title { .. } => &TITLE,
        Block::Timestamp { .. } => &NORMAL,
        Block::SourceLink { .. } => &SOURCE_LINK,
        Block::Heading { level, .. } => match level.as_u8() {
            2 => &HEADING_2,
            3 => &HEADING_3,
            _ => &HEADING_4,
        },
        Block::Paragraph { .. } => &NORMAL,
        Block::Bullet { .. } => &BULLET,
        Block::DiagramAlert { .. } => &DIAGRAM_ALERT,
        Block::CodeBlock { .. } => &CODE_BLOCK,
        Block::BlankSpacer => &BLANK_SPACER,
    }
}
