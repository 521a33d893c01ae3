//! Page composition: cursor-based layout of styled blocks onto PDF pages.
//!
//! ## Why manual layout?
//!
//! printpdf is a low-level writer — it places text at coordinates and knows
//! nothing about flowing content. This module supplies the small layout
//! engine the block model needs: a y-cursor walking down each page, greedy
//! word-wrapping against an estimated advance width, and an automatic page
//! break whenever the cursor would cross the bottom margin.
//!
//! Width estimation uses average per-character advances (exact metrics for
//! Courier, a close approximation for Helvetica). For study notes this is
//! indistinguishable from real metrics; the trade is a fully deterministic
//! layout with no font files to load at runtime.
//!
//! Pages are US letter (215.9 × 279.4 mm) with 0.2 in margins on all sides.

use printpdf::*;
use printpdf::path::PaintMode;

use super::style::{pt, style_for, FontKind, Style, INLINE_CODE_COLOR};
use crate::markdown::{Block, InlineSpan, StyledText};

pub(crate) const PAGE_WIDTH_MM: f32 = 215.9;
pub(crate) const PAGE_HEIGHT_MM: f32 = 279.4;
/// 0.2 inch margins on every side.
pub(crate) const MARGIN_MM: f32 = 5.08;

/// Horizontal padding of the code-block background strip.
const CODE_PAD_MM: f32 = 1.5;

/// Line height multiplier over the font size.
const LEADING: f32 = 1.3;

// ── Fonts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
    Mono,
}

impl Face {
    /// Average advance per character as a fraction of the font size.
    /// Courier is exactly 0.6; the Helvetica values are tuned averages.
    fn advance_factor(self) -> f32 {
        match self {
            Face::Mono => 0.6,
            Face::Bold | Face::BoldOblique => 0.53,
            Face::Regular | Face::Oblique => 0.5,
        }
    }
}

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    bold_oblique: IndirectFontRef,
    mono: IndirectFontRef,
}

impl FontSet {
    fn load(doc: &PdfDocumentReference) -> Result<Self, String> {
        let builtin = |f: BuiltinFont| doc.add_builtin_font(f).map_err(|e| e.to_string());
        Ok(Self {
            regular: builtin(BuiltinFont::Helvetica)?,
            bold: builtin(BuiltinFont::HelveticaBold)?,
            oblique: builtin(BuiltinFont::HelveticaOblique)?,
            bold_oblique: builtin(BuiltinFont::HelveticaBoldOblique)?,
            mono: builtin(BuiltinFont::Courier)?,
        })
    }

    fn get(&self, face: Face) -> &IndirectFontRef {
        match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Oblique => &self.oblique,
            Face::BoldOblique => &self.bold_oblique,
            Face::Mono => &self.mono,
        }
    }
}

// ── Fragments ────────────────────────────────────────────────────────────

/// A run of text with one face and colour, ready to draw.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    text: String,
    face: Face,
    color: (f32, f32, f32),
}

fn est_width_mm(text: &str, face: Face, size_pt: f32) -> f32 {
    text.chars().count() as f32 * face.advance_factor() * pt(size_pt)
}

fn face_for(span: &InlineSpan, style: &Style) -> Face {
    if span.code || style.font == FontKind::Mono {
        return Face::Mono;
    }
    match (style.bold || span.bold, span.italic) {
        (true, true) => Face::BoldOblique,
        (true, false) => Face::Bold,
        (false, true) => Face::Oblique,
        (false, false) => Face::Regular,
    }
}

fn color_for(span: &InlineSpan, style: &Style) -> (f32, f32, f32) {
    if span.code && style.font != FontKind::Mono {
        INLINE_CODE_COLOR
    } else {
        style.color
    }
}

fn fragments_of(text: &StyledText, style: &Style) -> Vec<Fragment> {
    text.iter()
        .map(|span| Fragment {
            text: span.text.clone(),
            face: face_for(span, style),
            color: color_for(span, style),
        })
        .collect()
}

/// Greedy word-wrap of fragments into lines no wider than `max_mm`.
///
/// Words longer than a whole line are hard-split so nothing ever overflows
/// the right margin.
fn wrap(fragments: &[Fragment], max_mm: f32, size_pt: f32) -> Vec<Vec<Fragment>> {
    let mut words: Vec<Fragment> = Vec::new();
    for f in fragments {
        for w in f.text.split_whitespace() {
            let word = Fragment {
                text: w.to_string(),
                face: f.face,
                color: f.color,
            };
            if est_width_mm(w, f.face, size_pt) > max_mm {
                words.extend(hard_split(word, max_mm, size_pt));
            } else {
                words.push(word);
            }
        }
    }

    let mut lines: Vec<Vec<Fragment>> = Vec::new();
    let mut line: Vec<Fragment> = Vec::new();
    let mut used = 0.0;

    for word in words {
        let word_w = est_width_mm(&word.text, word.face, size_pt);
        let space_w = est_width_mm(" ", word.face, size_pt);

        if !line.is_empty() && used + space_w + word_w > max_mm {
            lines.push(std::mem::take(&mut line));
            used = 0.0;
        }

        if let Some(last) = line.last_mut() {
            used += space_w + word_w;
            if last.face == word.face && last.color == word.color {
                last.text.push(' ');
                last.text.push_str(&word.text);
            } else {
                line.push(Fragment {
                    text: format!(" {}", word.text),
                    ..word
                });
            }
        } else {
            used += word_w;
            line.push(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Split one oversized word into line-capacity chunks.
fn hard_split(word: Fragment, max_mm: f32, size_pt: f32) -> Vec<Fragment> {
    let chars_per = chars_per_line(max_mm, word.face, size_pt);
    let chars: Vec<char> = word.text.chars().collect();
    chars
        .chunks(chars_per)
        .map(|chunk| Fragment {
            text: chunk.iter().collect(),
            face: word.face,
            color: word.color,
        })
        .collect()
}

fn chars_per_line(max_mm: f32, face: Face, size_pt: f32) -> usize {
    ((max_mm / (face.advance_factor() * pt(size_pt))) as usize).max(1)
}

// ── Composer ─────────────────────────────────────────────────────────────

/// Walks blocks onto letter pages, breaking pages as the cursor runs out.
pub(crate) struct PageComposer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: FontSet,
    /// Distance of the next line's top from the page bottom, in mm.
    cursor_y: f32,
    pages: usize,
}

impl PageComposer {
    pub(crate) fn new(title: &str) -> Result<Self, String> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let fonts = FontSet::load(&doc)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            fonts,
            cursor_y: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    /// Serialise the finished document to bytes.
    pub(crate) fn finish(self) -> Result<(Vec<u8>, usize), String> {
        let pages = self.pages;
        let bytes = self.doc.save_to_bytes().map_err(|e| e.to_string())?;
        Ok((bytes, pages))
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_y = PAGE_HEIGHT_MM - MARGIN_MM;
        self.pages += 1;
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.cursor_y - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn advance(&mut self, mm: f32) {
        self.cursor_y -= mm;
    }

    /// Lay out one block. Returns a description of the failure on error;
    /// the caller attaches the block index.
    pub(crate) fn draw_block(&mut self, block: &Block) -> Result<(), String> {
        let style = style_for(block);
        self.advance(style.space_before_mm);

        match block {
            Block::Title { text } => {
                let frags = vec![Fragment {
                    text: text.clone(),
                    face: Face::Bold,
                    color: style.color,
                }];
                self.draw_wrapped(&frags, style, true);
            }
            Block::Timestamp { text } => {
                let frags = vec![Fragment {
                    text: text.clone(),
                    face: Face::Regular,
                    color: style.color,
                }];
                self.draw_wrapped(&frags, style, false);
            }
            Block::SourceLink { url } => {
                let frags = vec![Fragment {
                    text: format!("Source: {url}"),
                    face: Face::Regular,
                    color: style.color,
                }];
                self.draw_wrapped(&frags, style, false);
            }
            Block::Heading { text, .. } | Block::Paragraph { text } => {
                let frags = fragments_of(text, style);
                self.draw_wrapped(&frags, style, false);
            }
            Block::Bullet { text } => {
                let mut frags = vec![Fragment {
                    text: "\u{2022}".to_string(),
                    face: Face::Regular,
                    color: style.color,
                }];
                frags.extend(fragments_of(text, style));
                self.draw_wrapped(&frags, style, false);
            }
            Block::DiagramAlert { description } => {
                // Builtin WinAnsi fonts cannot encode the chart emoji, so the
                // callout uses a bold text label instead.
                let frags = vec![
                    Fragment {
                        text: "DIAGRAM:".to_string(),
                        face: Face::Bold,
                        color: style.color,
                    },
                    Fragment {
                        text: description.clone(),
                        face: Face::Regular,
                        color: style.color,
                    },
                ];
                self.draw_wrapped(&frags, style, false);
            }
            Block::CodeBlock { lines } => self.draw_code_block(lines, style),
            Block::BlankSpacer => {}
        }

        self.advance(style.space_after_mm);
        Ok(())
    }

    /// Word-wrap and draw fragments at the block's indent.
    fn draw_wrapped(&mut self, fragments: &[Fragment], style: &Style, centered: bool) {
        let x = MARGIN_MM + style.left_indent_mm;
        let max_mm = PAGE_WIDTH_MM - MARGIN_MM - x;
        for line in wrap(fragments, max_mm, style.size_pt) {
            let x = if centered {
                let width: f32 = line
                    .iter()
                    .map(|f| est_width_mm(&f.text, f.face, style.size_pt))
                    .sum();
                (x + (max_mm - width) / 2.0).max(x)
            } else {
                x
            };
            self.draw_line(&line, x, style);
        }
    }

    /// Code blocks keep lines verbatim: hard character wrap only, each line
    /// drawn over its own background strip so the strips tile into one
    /// shaded panel across page breaks.
    fn draw_code_block(&mut self, lines: &[String], style: &Style) {
        let x = MARGIN_MM + style.left_indent_mm;
        // Code panels are inset symmetrically from both margins.
        let max_mm = PAGE_WIDTH_MM - MARGIN_MM - style.left_indent_mm - x;
        let chars_per = chars_per_line(max_mm, Face::Mono, style.size_pt);

        for raw in lines {
            let chunks: Vec<String> = if raw.is_empty() {
                vec![String::new()]
            } else {
                raw.chars()
                    .collect::<Vec<_>>()
                    .chunks(chars_per)
                    .map(|c| c.iter().collect())
                    .collect()
            };
            for chunk in chunks {
                let line = vec![Fragment {
                    text: chunk,
                    face: Face::Mono,
                    color: style.color,
                }];
                self.draw_line(&line, x, style);
            }
        }
    }

    /// Draw one wrapped line at `x`, breaking the page first if needed.
    fn draw_line(&mut self, line: &[Fragment], x: f32, style: &Style) {
        let line_h = pt(style.size_pt) * LEADING;
        self.ensure_room(line_h);

        if let Some((r, g, b)) = style.background {
            let strip = Rect::new(
                Mm(x - CODE_PAD_MM),
                Mm(self.cursor_y - line_h),
                Mm(PAGE_WIDTH_MM - MARGIN_MM - style.left_indent_mm + CODE_PAD_MM),
                Mm(self.cursor_y),
            )
            .with_mode(PaintMode::Fill);
            self.layer
                .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            self.layer.add_rect(strip);
        }

        let baseline = self.cursor_y - pt(style.size_pt);
        self.layer.begin_text_section();
        self.layer.set_text_cursor(Mm(x), Mm(baseline));
        for frag in line {
            let (r, g, b) = frag.color;
            let font = self.fonts.get(frag.face);
            self.layer
                .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            self.layer.set_font(font, style.size_pt);
            self.layer.write_text(frag.text.clone(), font);
        }
        self.layer.end_text_section();

        self.cursor_y -= line_h;
    }
}
