//! Output types: the finished conversion result, run statistics, and the
//! on-disk naming convention for callers that persist the PDF.

use crate::config::NoteType;
use crate::markdown::DocumentMetadata;
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// The result of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct NotesOutput {
    /// The generated dialect Markdown (stage 2 output).
    pub markdown: String,
    /// The rendered PDF (stage 3 output). Skipped when serialising.
    #[serde(skip_serializing)]
    pub pdf_bytes: Vec<u8>,
    /// Document-level metadata as rendered into the PDF header.
    pub metadata: DocumentMetadata,
    /// Timing and size statistics for the run.
    pub stats: NotesStats,
}

/// Statistics about a pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotesStats {
    pub acquire_duration_ms: u64,
    pub generate_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
    /// Size of the raw acquired content, bytes.
    pub content_bytes: usize,
    /// Size of the generated Markdown, bytes.
    pub markdown_bytes: usize,
    /// Size of the rendered PDF, bytes.
    pub pdf_bytes: usize,
    /// Number of blocks in the built document (header blocks included).
    pub block_count: usize,
    /// Number of PDF pages produced.
    pub page_count: usize,
}

static RE_VIDEO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|youtu\.be/)([^&\n?#]+)").unwrap());

/// Extract the video id from a YouTube URL.
///
/// Matches a `v=` query parameter or a `youtu.be/` path segment. Returns
/// `None` for anything else; callers that need a string fall back to
/// `"unknown"` (see [`default_output_filename`]).
pub fn extract_video_id(url: &str) -> Option<String> {
    RE_VIDEO_ID
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Conventional output file name:
/// `notes_{note_type}_{video_id}_{timestamp}.pdf`.
pub fn default_output_filename(
    note_type: NoteType,
    video_url: &str,
    now: DateTime<Local>,
) -> String {
    let video_id = extract_video_id(video_url).unwrap_or_else(|| "unknown".to_string());
    format!(
        "notes_{}_{}_{}.pdf",
        note_type.as_str(),
        video_id,
        now.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn video_id_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn video_id_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/abc_123-XY"),
            Some("abc_123-XY".to_string())
        );
    }

    #[test]
    fn video_id_stops_at_query_separators() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=42s"),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_video_id("https://youtu.be/abc123?si=xyz"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn unrecognised_url_has_no_id() {
        assert_eq!(extract_video_id("https://example.com/video/42"), None);
    }

    #[test]
    fn filename_follows_convention() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let name = default_output_filename(NoteType::Long, "https://youtu.be/abc123", now);
        assert_eq!(name, "notes_long_abc123_20240301_093005.pdf");
    }

    #[test]
    fn filename_defaults_to_unknown_id() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        let name = default_output_filename(NoteType::Short, "not a url", now);
        assert_eq!(name, "notes_short_unknown_20240301_093005.pdf");
    }
}
