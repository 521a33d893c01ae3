//! The pipeline controller: Analyze → ConvertFormat → Render.
//!
//! ## Why a plain stage sequence?
//!
//! The pipeline is a straight line — three stages, each consuming the
//! previous stage's output, no branching, no fan-out. It is implemented as
//! exactly that: an ordered sequence of functions over one
//! [`PipelineState`], where each stage runs only while no error has been
//! recorded. A failed stage leaves its error in the state and every later
//! stage is skipped; nothing is rolled back.
//!
//! [`PipelineState`] keeps its fields private so the halt-on-error
//! invariant is enforced by construction: once an error is set,
//! [`PipelineState::pdf_bytes`] returns `None`, and
//! [`PipelineState::markdown`] returns `None` unless the error happened
//! *after* generation (the render-failure fallback required of callers:
//! present the untouched Markdown when only the PDF step failed).
//!
//! The two collaborator calls are the only suspension points; the render
//! stage is pure synchronous computation. Independent conversions can run
//! concurrently — the state is per-run and the style table is immutable.

use crate::collaborator::{content_source, markdown_generator, ContentSource, MarkdownGenerator};
use crate::config::{NoteType, NotesConfig};
use crate::error::NotesError;
use crate::markdown::{self, DocumentMetadata};
use crate::observer::Stage;
use crate::output::{NotesOutput, NotesStats};
use crate::pdf;
use crate::prompts;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

/// The single state record threaded through the pipeline stages.
///
/// Returned by [`run_pipeline`] in either its `Done` form (all outputs
/// present, `error` empty) or its `Failed` form (error set, outputs gated).
#[derive(Debug)]
pub struct PipelineState {
    video_url: String,
    note_type: NoteType,
    content: Option<String>,
    markdown: Option<String>,
    pdf_bytes: Option<Vec<u8>>,
    metadata: Option<DocumentMetadata>,
    error: Option<NotesError>,
    stats: NotesStats,
}

impl PipelineState {
    fn new(video_url: impl Into<String>, note_type: NoteType) -> Self {
        Self {
            video_url: video_url.into(),
            note_type,
            content: None,
            markdown: None,
            pdf_bytes: None,
            metadata: None,
            error: None,
            stats: NotesStats::default(),
        }
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn note_type(&self) -> NoteType {
        self.note_type
    }

    /// Raw acquired content, for diagnostics. Readable regardless of later
    /// stage failures.
    pub fn raw_content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// The generated Markdown, if it is trustworthy.
    ///
    /// `Some` when the run succeeded, or when the only failure happened
    /// after generation (rendering / output writing) — the degrade-gracefully
    /// path: callers present the Markdown as a fallback artifact.
    pub fn markdown(&self) -> Option<&str> {
        match &self.error {
            None => self.markdown.as_deref(),
            Some(e) if e.markdown_survives() => self.markdown.as_deref(),
            Some(_) => None,
        }
    }

    /// The rendered PDF. `None` whenever any error is set.
    pub fn pdf_bytes(&self) -> Option<&[u8]> {
        if self.error.is_some() {
            return None;
        }
        self.pdf_bytes.as_deref()
    }

    pub fn metadata(&self) -> Option<&DocumentMetadata> {
        self.metadata.as_ref()
    }

    pub fn error(&self) -> Option<&NotesError> {
        self.error.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn stats(&self) -> &NotesStats {
        &self.stats
    }

    fn fail(&mut self, config: &NotesConfig, stage: Stage, error: NotesError) {
        warn!("Stage {stage} failed: {error}");
        if let Some(ref obs) = config.observer {
            obs.on_stage_error(stage, &error.to_string());
        }
        self.error = Some(error);
    }

    /// Convert the terminal state into a result.
    pub fn into_output(self) -> Result<NotesOutput, NotesError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        match (self.markdown, self.pdf_bytes, self.metadata) {
            (Some(markdown), Some(pdf_bytes), Some(metadata)) => Ok(NotesOutput {
                markdown,
                pdf_bytes,
                metadata,
                stats: self.stats,
            }),
            _ => Err(NotesError::Internal(
                "pipeline finished without error but outputs are missing".into(),
            )),
        }
    }
}

/// Run the full three-stage pipeline and return the terminal state.
///
/// This never returns `Err`: failures are recorded in the state so callers
/// can inspect partial artifacts (notably the Markdown after a render
/// failure). Use [`convert`] for a plain `Result`.
pub async fn run_pipeline(video_url: impl AsRef<str>, config: &NotesConfig) -> PipelineState {
    let total_start = Instant::now();
    let video_url = video_url.as_ref();
    info!("Starting conversion: {} ({})", video_url, config.note_type);

    let mut state = PipelineState::new(video_url, config.note_type);

    // Collaborator resolution is the configuration precondition: a missing
    // provider or key fails the run before any stage does work.
    let resolved = content_source(config).and_then(|s| Ok((s, markdown_generator(config)?)));
    let (source, generator) = match resolved {
        Ok(pair) => pair,
        Err(e) => {
            state.fail(config, Stage::Analyze, e);
            return state;
        }
    };

    if state.error.is_none() {
        analyze_stage(&mut state, source, config).await;
    }
    if state.error.is_none() {
        convert_format_stage(&mut state, generator, config).await;
    }
    if state.error.is_none() {
        render_stage(&mut state, config);
    }

    state.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    match &state.error {
        None => info!(
            "Conversion complete: {} pages, {} bytes, {}ms",
            state.stats.page_count, state.stats.pdf_bytes, state.stats.total_duration_ms
        ),
        Some(e) => warn!("Conversion failed: {e}"),
    }
    state
}

/// Stage 1: acquire raw content for the video URL.
async fn analyze_stage(
    state: &mut PipelineState,
    source: Arc<dyn ContentSource>,
    config: &NotesConfig,
) {
    let stage = Stage::Analyze;
    if let Some(ref obs) = config.observer {
        obs.on_stage_start(stage);
    }
    let start = Instant::now();

    let instructions = prompts::analysis_prompt(&state.video_url);
    let deadline = Duration::from_secs(config.acquire_timeout_secs);

    let result = timeout(deadline, source.fetch(&state.video_url, &instructions)).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Err(_) => state.fail(
            config,
            stage,
            NotesError::AcquisitionTimeout {
                url: state.video_url.clone(),
                secs: config.acquire_timeout_secs,
            },
        ),
        Ok(Err(e)) => state.fail(config, stage, e),
        Ok(Ok(content)) if content.trim().is_empty() => state.fail(
            config,
            stage,
            NotesError::EmptyAcquisition {
                url: state.video_url.clone(),
            },
        ),
        Ok(Ok(content)) => {
            info!("Acquired {} bytes of content in {}ms", content.len(), elapsed_ms);
            state.stats.content_bytes = content.len();
            state.stats.acquire_duration_ms = elapsed_ms;
            state.content = Some(content);
            if let Some(ref obs) = config.observer {
                obs.on_stage_complete(stage, elapsed_ms);
            }
        }
    }
}

/// Stage 2: turn raw content into dialect Markdown.
async fn convert_format_stage(
    state: &mut PipelineState,
    generator: Arc<dyn MarkdownGenerator>,
    config: &NotesConfig,
) {
    let stage = Stage::ConvertFormat;
    if let Some(ref obs) = config.observer {
        obs.on_stage_start(stage);
    }
    let start = Instant::now();

    let content = state
        .content
        .as_deref()
        .expect("analyze stage ran without error");
    let deadline = Duration::from_secs(config.generate_timeout_secs);

    let result = timeout(deadline, generator.generate(content, state.note_type)).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Err(_) => state.fail(
            config,
            stage,
            NotesError::GenerationTimeout {
                secs: config.generate_timeout_secs,
            },
        ),
        Ok(Err(e)) => state.fail(config, stage, e),
        Ok(Ok(md)) if md.trim().is_empty() => {
            state.fail(config, stage, NotesError::EmptyGeneration)
        }
        Ok(Ok(md)) => {
            info!("Generated {} bytes of markdown in {}ms", md.len(), elapsed_ms);
            state.stats.markdown_bytes = md.len();
            state.stats.generate_duration_ms = elapsed_ms;
            state.markdown = Some(md);
            if let Some(ref obs) = config.observer {
                obs.on_stage_complete(stage, elapsed_ms);
            }
        }
    }
}

/// Stage 3: build the document and render the PDF. Pure and synchronous.
fn render_stage(state: &mut PipelineState, config: &NotesConfig) {
    let stage = Stage::Render;
    if let Some(ref obs) = config.observer {
        obs.on_stage_start(stage);
    }
    let start = Instant::now();

    let md = state
        .markdown
        .as_deref()
        .expect("convert-format stage ran without error");
    let title = config.effective_title();
    let document = markdown::build_document(md, &title, Some(&state.video_url), state.note_type);
    state.stats.block_count = document.blocks.len();
    state.metadata = Some(document.metadata.clone());

    match pdf::render_counted(&document) {
        Ok((bytes, pages)) => {
            let elapsed_ms = start.elapsed().as_millis() as u64;
            info!("Rendered {} pages ({} bytes) in {}ms", pages, bytes.len(), elapsed_ms);
            state.stats.pdf_bytes = bytes.len();
            state.stats.page_count = pages;
            state.stats.render_duration_ms = elapsed_ms;
            state.pdf_bytes = Some(bytes);
            if let Some(ref obs) = config.observer {
                obs.on_stage_complete(stage, elapsed_ms);
            }
        }
        // The markdown in the state stays readable: render failures must
        // leave callers a fallback artifact.
        Err(e) => state.fail(config, stage, e),
    }
}

/// Convert a video URL to notes.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Returns the first stage error. After a [`NotesError::Render`] the
/// Markdown is lost through this API — use [`run_pipeline`] when the
/// fallback artifact matters.
pub async fn convert(
    video_url: impl AsRef<str>,
    config: &NotesConfig,
) -> Result<NotesOutput, NotesError> {
    run_pipeline(video_url, config).await.into_output()
}

/// Run only the first two stages and return the generated Markdown.
///
/// For callers that want the intermediate artifact without rendering.
pub async fn generate_markdown(
    video_url: impl AsRef<str>,
    config: &NotesConfig,
) -> Result<String, NotesError> {
    let video_url = video_url.as_ref();
    let mut state = PipelineState::new(video_url, config.note_type);

    let resolved = content_source(config).and_then(|s| Ok((s, markdown_generator(config)?)));
    let (source, generator) = match resolved {
        Ok(pair) => pair,
        Err(e) => return Err(e),
    };

    analyze_stage(&mut state, source, config).await;
    if state.error.is_none() {
        convert_format_stage(&mut state, generator, config).await;
    }

    match state.error {
        Some(e) => Err(e),
        None => state
            .markdown
            .ok_or_else(|| NotesError::Internal("markdown missing after generation".into())),
    }
}

/// Convert a video and write the PDF to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    video_url: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &NotesConfig,
) -> Result<NotesStats, NotesError> {
    let output = convert(video_url, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| NotesError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf_bytes)
        .await
        .map_err(|e| NotesError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| NotesError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Render existing dialect Markdown straight to PDF bytes.
///
/// The pure core of the pipeline (stages are skipped); useful when the
/// Markdown already exists or came from another tool.
pub fn markdown_to_pdf(
    markdown_text: &str,
    title: &str,
    video_url: Option<&str>,
    note_type: NoteType,
) -> Result<Vec<u8>, NotesError> {
    let document = markdown::build_document(markdown_text, title, video_url, note_type);
    pdf::render(&document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{ContentSource, MarkdownGenerator};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticSource {
        reply: Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn ok(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
            })
        }
        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ContentSource for StaticSource {
        fn fetch<'a>(
            &'a self,
            url: &'a str,
            _instructions: &'a str,
        ) -> BoxFuture<'a, Result<String, NotesError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                match self.reply {
                    Ok(text) => Ok(text.to_string()),
                    Err(()) => Err(NotesError::Acquisition {
                        url: url.to_string(),
                        detail: "agent unavailable".into(),
                    }),
                }
            })
        }
    }

    struct StaticGenerator {
        markdown: &'static str,
        calls: AtomicUsize,
    }

    impl StaticGenerator {
        fn new(markdown: &'static str) -> Arc<Self> {
            Arc::new(Self {
                markdown,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl MarkdownGenerator for StaticGenerator {
        fn generate<'a>(
            &'a self,
            _content: &'a str,
            _note_type: NoteType,
        ) -> BoxFuture<'a, Result<String, NotesError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok(self.markdown.to_string()) })
        }
    }

    struct HangingSource;

    impl ContentSource for HangingSource {
        fn fetch<'a>(
            &'a self,
            _url: &'a str,
            _instructions: &'a str,
        ) -> BoxFuture<'a, Result<String, NotesError>> {
            Box::pin(futures::future::pending())
        }
    }

    fn config_with(
        source: Arc<dyn ContentSource>,
        generator: Arc<dyn MarkdownGenerator>,
    ) -> NotesConfig {
        NotesConfig::builder()
            .content_source(source)
            .generator(generator)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn successful_run_produces_all_outputs() {
        let config = config_with(
            StaticSource::ok("lecture content"),
            StaticGenerator::new("## Topic\n* point one\n* point two"),
        );
        let state = run_pipeline("https://youtu.be/abc123", &config).await;

        assert!(!state.is_failed());
        assert_eq!(state.raw_content(), Some("lecture content"));
        assert!(state.markdown().unwrap().contains("## Topic"));
        assert!(state.pdf_bytes().unwrap().starts_with(b"%PDF-"));
        assert!(state.stats().block_count > 0);
        assert_eq!(state.stats().page_count, 1);
        assert_eq!(
            state.metadata().unwrap().video_url.as_deref(),
            Some("https://youtu.be/abc123")
        );
    }

    #[tokio::test]
    async fn analyze_failure_short_circuits_later_stages() {
        let generator = StaticGenerator::new("## unused");
        let config = config_with(StaticSource::failing(), generator.clone());
        let state = run_pipeline("https://youtu.be/abc", &config).await;

        assert!(state.is_failed());
        assert!(matches!(state.error(), Some(NotesError::Acquisition { .. })));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(state.markdown(), None);
        assert_eq!(state.pdf_bytes(), None);
    }

    #[tokio::test]
    async fn empty_acquisition_is_rejected() {
        let config = config_with(StaticSource::ok("   \n"), StaticGenerator::new("## x"));
        let state = run_pipeline("https://youtu.be/abc", &config).await;
        assert!(matches!(
            state.error(),
            Some(NotesError::EmptyAcquisition { .. })
        ));
    }

    #[tokio::test]
    async fn empty_generation_is_rejected() {
        let config = config_with(StaticSource::ok("content"), StaticGenerator::new("  "));
        let state = run_pipeline("https://youtu.be/abc", &config).await;
        assert!(matches!(state.error(), Some(NotesError::EmptyGeneration)));
        assert_eq!(state.markdown(), None);
    }

    #[tokio::test]
    async fn hanging_acquisition_times_out() {
        let config = NotesConfig::builder()
            .content_source(Arc::new(HangingSource))
            .generator(StaticGenerator::new("## x"))
            .acquire_timeout_secs(1)
            .build()
            .unwrap();
        let state = run_pipeline("https://youtu.be/abc", &config).await;
        assert!(matches!(
            state.error(),
            Some(NotesError::AcquisitionTimeout { secs: 1, .. })
        ));
    }

    #[test]
    fn render_error_keeps_markdown_readable() {
        let mut state = PipelineState::new("https://youtu.be/abc", NoteType::Short);
        state.markdown = Some("## Recovered".to_string());
        state.pdf_bytes = Some(vec![1, 2, 3]);
        state.error = Some(NotesError::Render {
            block_index: 4,
            detail: "layout".into(),
        });

        assert_eq!(state.markdown(), Some("## Recovered"));
        assert_eq!(state.pdf_bytes(), None, "PDF must be gated on any error");
    }

    #[test]
    fn pre_render_error_hides_markdown() {
        let mut state = PipelineState::new("https://youtu.be/abc", NoteType::Short);
        state.markdown = Some("## Untrusted".to_string());
        state.error = Some(NotesError::EmptyGeneration);
        assert_eq!(state.markdown(), None);
    }

    #[tokio::test]
    async fn generate_markdown_skips_rendering() {
        let config = config_with(
            StaticSource::ok("content"),
            StaticGenerator::new("## Only markdown"),
        );
        let md = generate_markdown("https://youtu.be/abc", &config)
            .await
            .unwrap();
        assert_eq!(md, "## Only markdown");
    }

    #[tokio::test]
    async fn convert_to_file_writes_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let config = config_with(StaticSource::ok("content"), StaticGenerator::new("## T"));

        let stats = convert_to_file("https://youtu.be/abc", &path, &config)
            .await
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert_eq!(stats.pdf_bytes, bytes.len());
    }

    #[test]
    fn markdown_to_pdf_is_a_pure_shortcut() {
        let bytes = markdown_to_pdf("Hello **world**", "Notes", None, NoteType::Short).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
