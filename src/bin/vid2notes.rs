//! CLI binary for vid2notes.
//!
//! A thin shim over the library crate that maps CLI flags to `NotesConfig`,
//! drives the pipeline, and writes the resulting PDF (or Markdown).

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vid2notes::{
    default_output_filename, generate_markdown, run_pipeline, NoteType, NotesConfig,
    PipelineObserver, Stage,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI stage spinner using indicatif ────────────────────────────────────────

/// Terminal observer: one spinner that narrates the three pipeline stages.
struct StageSpinner {
    bar: ProgressBar,
}

impl StageSpinner {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Starting…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn label(stage: Stage) -> &'static str {
        match stage {
            Stage::Analyze => "Analyzing video content",
            Stage::ConvertFormat => "Generating markdown notes",
            Stage::Render => "Rendering PDF",
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for StageSpinner {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_message(format!("{}…", Self::label(stage)));
    }

    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            Self::label(stage),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 120 {
            let cut: String = error.chars().take(119).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {}  {}", red("✗"), Self::label(stage), red(&msg)));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Short notes, default output name (notes_short_<id>_<timestamp>.pdf)
  vid2notes https://www.youtube.com/watch?v=dQw4w9WgXcQ

  # Comprehensive notes to a chosen file
  vid2notes --notes long https://youtu.be/dQw4w9WgXcQ -o lecture.pdf

  # Just the markdown, no PDF
  vid2notes --markdown-only https://youtu.be/dQw4w9WgXcQ

  # Use a specific model
  vid2notes --provider gemini --model gemini-2.0-flash https://youtu.be/abc

  # JSON output with metadata and stats
  vid2notes --json https://youtu.be/abc -o notes.pdf

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key

SETUP:
  1. Set an API key:  export GEMINI_API_KEY=...
  2. Convert:         vid2notes <video-url> -o notes.pdf

The provider must be able to reach the video's content (natively or through
an agent/tool integration). If rendering fails after markdown generation
succeeded, the markdown is saved next to the requested output as a fallback.
"#;

/// Convert educational videos into styled PDF study notes.
#[derive(Parser, Debug)]
#[command(
    name = "vid2notes",
    version,
    about = "Convert educational videos into styled PDF study notes",
    long_about = "Extract the educational content of a video with an LLM collaborator, distil it \
into concise or comprehensive Markdown notes, and render a styled, paginated PDF in memory.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Video URL (YouTube watch or youtu.be link).
    url: String,

    /// Write the PDF to this file instead of the conventional name.
    #[arg(short, long, env = "VID2NOTES_OUTPUT")]
    output: Option<PathBuf>,

    /// Note style: short (< 400 words) or long (600-800 words).
    #[arg(long = "notes", env = "VID2NOTES_NOTE_TYPE", value_enum, default_value = "short")]
    note_type: NoteArg,

    /// Print the generated markdown and skip PDF rendering.
    #[arg(long)]
    markdown_only: bool,

    /// Document title override.
    #[arg(long, env = "VID2NOTES_TITLE")]
    title: Option<String>,

    /// LLM model ID (e.g. gemini-2.0-flash).
    #[arg(long, env = "VID2NOTES_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "VID2NOTES_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "VID2NOTES_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "VID2NOTES_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Content-acquisition timeout in seconds.
    #[arg(long, env = "VID2NOTES_ACQUIRE_TIMEOUT", default_value_t = 120)]
    acquire_timeout: u64,

    /// Markdown-generation timeout in seconds.
    #[arg(long, env = "VID2NOTES_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Output structured JSON (markdown, metadata, stats) instead of a summary.
    #[arg(long, env = "VID2NOTES_JSON")]
    json: bool,

    /// Disable the stage spinner.
    #[arg(long, env = "VID2NOTES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "VID2NOTES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "VID2NOTES_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum NoteArg {
    Short,
    Long,
}

impl From<NoteArg> for NoteType {
    fn from(v: NoteArg) -> Self {
        match v {
            NoteArg::Short => NoteType::Short,
            NoteArg::Long => NoteType::Long,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.markdown_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let spinner = if show_progress {
        Some(StageSpinner::new())
    } else {
        None
    };

    let note_type: NoteType = cli.note_type.into();
    let mut builder = NotesConfig::builder()
        .note_type(note_type)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .acquire_timeout_secs(cli.acquire_timeout)
        .generate_timeout_secs(cli.api_timeout);

    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref s) = spinner {
        builder = builder.observer(Arc::clone(s) as Arc<dyn PipelineObserver>);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Markdown-only mode ───────────────────────────────────────────────
    if cli.markdown_only {
        let markdown = generate_markdown(&cli.url, &config)
            .await
            .context("Markdown generation failed")?;
        match cli.output {
            Some(path) => {
                std::fs::write(&path, &markdown)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if !cli.quiet {
                    eprintln!("{} {}", green("✔"), bold(&path.display().to_string()));
                }
            }
            None => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(markdown.as_bytes())?;
                if !markdown.ends_with('\n') {
                    handle.write_all(b"\n").ok();
                }
            }
        }
        return Ok(());
    }

    // ── Run the pipeline ─────────────────────────────────────────────────
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output_filename(note_type, &cli.url, Local::now())));

    let state = run_pipeline(&cli.url, &config).await;
    if let Some(ref s) = spinner {
        s.finish();
    }

    if state.is_failed() {
        // Degrade gracefully: a render failure still leaves valid markdown.
        if let Some(markdown) = state.markdown() {
            let fallback = output_path.with_extension("md");
            std::fs::write(&fallback, markdown)
                .with_context(|| format!("Failed to write fallback {}", fallback.display()))?;
            eprintln!(
                "{} PDF rendering failed — markdown saved to {}",
                cyan("⚠"),
                bold(&fallback.display().to_string()),
            );
        }
        let error = state.error().expect("failed state carries an error");
        anyhow::bail!("Conversion failed: {error}");
    }

    let output = state
        .into_output()
        .context("Pipeline finished without outputs")?;

    std::fs::write(&output_path, &output.pdf_bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} page(s)  {}ms  →  {}",
            green("✔"),
            output.stats.page_count,
            output.stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   {} markdown bytes  /  {} pdf bytes",
            dim(&output.stats.markdown_bytes.to_string()),
            dim(&output.stats.pdf_bytes.to_string()),
        );
    }

    Ok(())
}
