//! The external-collaborator boundary: content acquisition and markdown
//! generation.
//!
//! The pipeline core never talks to a network itself. It depends on two
//! narrow, object-safe traits, and ships default implementations backed by
//! an [`edgequake_llm`] provider. Callers swap in their own implementations
//! (a transcript API, a cached store, a test mock) by injecting trait
//! objects into [`crate::config::NotesConfig`].
//!
//! Both traits return [`BoxFuture`] rather than using `async fn` so they
//! stay usable as `Arc<dyn …>` trait objects.
//!
//! Retry policy intentionally lives on the far side of this boundary: the
//! core issues exactly one call per stage and fails the run on the first
//! error. Providers and agents that want retries implement them internally.

use crate::config::{NoteType, NotesConfig};
use crate::error::NotesError;
use crate::prompts;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::debug;

/// Obtains raw educational content for a video URL.
///
/// Implementations must return a non-empty text blob or a descriptive
/// error; silently truncated output is a contract violation.
pub trait ContentSource: Send + Sync {
    /// Fetch extracted content for `url`, guided by `instructions`.
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<String, NotesError>>;
}

/// Turns raw content into dialect Markdown.
pub trait MarkdownGenerator: Send + Sync {
    /// Generate Markdown notes from `content` using the template selected
    /// by `note_type`.
    fn generate<'a>(
        &'a self,
        content: &'a str,
        note_type: NoteType,
    ) -> BoxFuture<'a, Result<String, NotesError>>;
}

// ── LLM-backed defaults ──────────────────────────────────────────────────

/// Default [`ContentSource`]: a video-capable LLM provider driven by the
/// analysis prompt. The provider (or the agent behind it) owns actual video
/// access; this wrapper only shapes the request and validates the reply.
pub struct LlmContentSource {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmContentSource {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }
}

impl ContentSource for LlmContentSource {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        instructions: &'a str,
    ) -> BoxFuture<'a, Result<String, NotesError>> {
        Box::pin(async move {
            let messages = vec![ChatMessage::user(instructions)];
            let options = completion_options(self.temperature, self.max_tokens);

            let response = self
                .provider
                .chat(&messages, Some(&options))
                .await
                .map_err(|e| NotesError::Acquisition {
                    url: url.to_string(),
                    detail: e.to_string(),
                })?;

            debug!(
                "Acquisition reply: {} chars, {} output tokens",
                response.content.len(),
                response.completion_tokens
            );

            if response.content.trim().is_empty() {
                return Err(NotesError::EmptyAcquisition {
                    url: url.to_string(),
                });
            }
            Ok(response.content)
        })
    }
}

/// Default [`MarkdownGenerator`]: one LLM completion over the conversion
/// template for the chosen note type.
pub struct LlmMarkdownGenerator {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl LlmMarkdownGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }
}

impl MarkdownGenerator for LlmMarkdownGenerator {
    fn generate<'a>(
        &'a self,
        content: &'a str,
        note_type: NoteType,
    ) -> BoxFuture<'a, Result<String, NotesError>> {
        Box::pin(async move {
            let prompt = prompts::conversion_prompt(content, note_type);
            let messages = vec![ChatMessage::user(prompt.as_str())];
            let options = completion_options(self.temperature, self.max_tokens);

            let response = self
                .provider
                .chat(&messages, Some(&options))
                .await
                .map_err(|e| NotesError::FormatConversion {
                    detail: e.to_string(),
                })?;

            debug!(
                "Generation reply: {} chars, {} output tokens",
                response.content.len(),
                response.completion_tokens
            );

            if response.content.trim().is_empty() {
                return Err(NotesError::EmptyGeneration);
            }
            Ok(response.content)
        })
    }
}

fn completion_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}

// ── Provider resolution ──────────────────────────────────────────────────

/// Resolve the LLM provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the provider entirely; used as-is.
/// 2. **Named provider + model** (`config.provider_name`) — resolved via
///    [`ProviderFactory::create_llm_provider`], which reads the matching
///    API key from the environment.
/// 3. **Full auto-detection** — [`ProviderFactory::from_env`] scans known
///    API key variables and picks the first available provider.
///
/// A missing key surfaces as [`NotesError::ProviderNotConfigured`] before
/// any stage runs — the pipeline's configuration precondition.
pub fn resolve_provider(config: &NotesConfig) -> Result<Arc<dyn LLMProvider>, NotesError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gemini-2.0-flash");
        return ProviderFactory::create_llm_provider(name, model).map_err(|e| {
            NotesError::ProviderNotConfigured {
                provider: name.clone(),
                hint: format!("{e}"),
            }
        });
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| NotesError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                 Set GEMINI_API_KEY, OPENAI_API_KEY, or ANTHROPIC_API_KEY, \
                 or configure a provider explicitly.\nError: {e}"
            ),
        })?;
    Ok(provider)
}

/// Build the effective [`ContentSource`] for a config: the injected one, or
/// the provider-backed default.
pub(crate) fn content_source(
    config: &NotesConfig,
) -> Result<Arc<dyn ContentSource>, NotesError> {
    if let Some(ref source) = config.content_source {
        return Ok(Arc::clone(source));
    }
    let provider = resolve_provider(config)?;
    Ok(Arc::new(LlmContentSource::new(
        provider,
        config.temperature,
        config.max_tokens,
    )))
}

/// Build the effective [`MarkdownGenerator`] for a config.
pub(crate) fn markdown_generator(
    config: &NotesConfig,
) -> Result<Arc<dyn MarkdownGenerator>, NotesError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }
    let provider = resolve_provider(config)?;
    Ok(Arc::new(LlmMarkdownGenerator::new(
        provider,
        config.temperature,
        config.max_tokens,
    )))
}
