//! Inline formatting: bold / italic / inline-code span extraction.
//!
//! ## Why ordered substitution instead of a nested-span parser?
//!
//! The input dialect is produced by our own prompts, which only ever ask for
//! flat `**bold**`, `*italic*`, and `` `code` `` runs. Three ordered regex
//! passes cover that completely, and the order is load-bearing:
//!
//! 1. Bold first, consuming both asterisks of every `**…**` pair.
//! 2. Italic over the *remaining* single asterisks only — a span already
//!    tagged bold is never re-split, so `**a*b*c**` stays one bold run.
//! 3. Inline code last; backticks inside an emphasis run still become a
//!    code span (flags combine).
//!
//! Unbalanced or overlapping markers simply fail to match and pass through
//! as literal text. This function never errors and has no side effects.

use super::{InlineSpan, StyledText};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Rewrite one line of text into styled spans.
///
/// Pure function; the returned spans concatenate back to the input line
/// minus the consumed marker characters.
pub fn format_inline(line: &str) -> StyledText {
    let spans = vec![InlineSpan::plain(line)];
    let spans = split_matches(spans, &RE_BOLD, |s| !s.code, |s| s.bold = true);
    let spans = split_matches(spans, &RE_ITALIC, |s| !s.code && !s.bold, |s| s.italic = true);
    let spans = split_matches(spans, &RE_CODE, |s| !s.code, |s| s.code = true);
    spans.into_iter().filter(|s| !s.text.is_empty()).collect()
}

/// Split every eligible span at the regex matches, tagging the captured
/// group with `tag` and inheriting the parent span's flags elsewhere.
fn split_matches(
    spans: StyledText,
    re: &Regex,
    eligible: fn(&InlineSpan) -> bool,
    tag: fn(&mut InlineSpan),
) -> StyledText {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        if !eligible(&span) || !re.is_match(&span.text) {
            out.push(span);
            continue;
        }

        let (bold, italic, code) = (span.bold, span.italic, span.code);
        let inherit = |text: &str| InlineSpan {
            text: text.to_string(),
            bold,
            italic,
            code,
        };

        let mut last = 0;
        for caps in re.captures_iter(&span.text) {
            let m = caps.get(0).expect("group 0 always present");
            if m.start() > last {
                out.push(inherit(&span.text[last..m.start()]));
            }
            let mut tagged = inherit(&caps[1]);
            tag(&mut tagged);
            out.push(tagged);
            last = m.end();
        }
        if last < span.text.len() {
            out.push(inherit(&span.text[last..]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(spans: &StyledText) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn bold_span_extracted_exactly() {
        let spans = format_inline("see **this** here");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].text, "this");
        assert!(spans[1].bold);
        assert!(!spans[0].bold && !spans[2].bold);
        assert!(!joined(&spans).contains('*'));
    }

    #[test]
    fn italic_does_not_resplit_bold() {
        let spans = format_inline("**a*b*c**");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].bold);
        assert!(!spans[0].italic);
        assert_eq!(spans[0].text, "a*b*c");
    }

    #[test]
    fn italic_on_remaining_single_asterisks() {
        let spans = format_inline("**key** and *stress*");
        let em: Vec<_> = spans.iter().filter(|s| s.italic).collect();
        assert_eq!(em.len(), 1);
        assert_eq!(em[0].text, "stress");
        assert!(!em[0].bold);
    }

    #[test]
    fn inline_code_gets_own_span() {
        let spans = format_inline("run `cargo test` now");
        let code: Vec<_> = spans.iter().filter(|s| s.code).collect();
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].text, "cargo test");
    }

    #[test]
    fn code_inside_bold_keeps_both_flags() {
        let spans = format_inline("**use `cfg` here**");
        let both: Vec<_> = spans.iter().filter(|s| s.code && s.bold).collect();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].text, "cfg");
    }

    #[test]
    fn unbalanced_markers_pass_through() {
        let spans = format_inline("a lonely * marker and ` tick");
        assert_eq!(joined(&spans), "a lonely * marker and ` tick");
        assert!(spans.iter().all(|s| !s.bold && !s.italic && !s.code));
    }

    #[test]
    fn plain_line_is_single_span() {
        let spans = format_inline("just words");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0], InlineSpan::plain("just words"));
    }
}
