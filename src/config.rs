//! Configuration types for video-to-notes conversion.
//!
//! All pipeline behaviour is controlled through [`NotesConfig`], built via
//! its [`NotesConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks and to diff two runs to understand
//! why their outputs differ.
//!
//! There is deliberately **no process-global credential state**: provider
//! credentials travel inside the config (as a pre-built provider, a named
//! provider resolved against the environment at call time, or injected
//! collaborator implementations). Concurrent pipeline runs therefore share
//! nothing mutable.

use crate::collaborator::{ContentSource, MarkdownGenerator};
use crate::error::NotesError;
use crate::observer::ObserverHandle;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which conversion template the generation stage uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    /// Ultra-concise summary, under 400 words.
    #[default]
    Short,
    /// Comprehensive notes, 600–800 words.
    Long,
}

impl NoteType {
    /// Lowercase name used in prompts, file names, and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            NoteType::Short => "short",
            NoteType::Long => "long",
        }
    }

    /// Capitalised name for document titles ("Short" / "Long").
    pub fn title_case(self) -> &'static str {
        match self {
            NoteType::Short => "Short",
            NoteType::Long => "Long",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one video-to-notes conversion.
///
/// Built via [`NotesConfig::builder()`] or [`NotesConfig::default()`].
///
/// # Example
/// ```rust
/// use vid2notes::{NotesConfig, NoteType};
///
/// let config = NotesConfig::builder()
///     .note_type(NoteType::Long)
///     .model("gemini-2.0-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct NotesConfig {
    /// Which conversion template stage 2 uses. Default: [`NoteType::Short`].
    pub note_type: NoteType,

    /// Document title override. When `None`, the title defaults to
    /// "YouTube Notes (Short)" / "YouTube Notes (Long)".
    pub title: Option<String>,

    /// LLM model identifier, e.g. "gemini-2.0-flash". If `None`, uses the
    /// provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "gemini", "openai"). If `None` along with
    /// `provider`, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Injected content-acquisition collaborator. Takes precedence over the
    /// provider-backed default. Mainly for tests and custom integrations.
    pub content_source: Option<Arc<dyn ContentSource>>,

    /// Injected markdown-generation collaborator. Takes precedence over the
    /// provider-backed default.
    pub generator: Option<Arc<dyn MarkdownGenerator>>,

    /// Sampling temperature for generation. Default: 0.0.
    ///
    /// Notes generation wants determinism and fidelity to the source
    /// content, not creativity.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    pub max_tokens: usize,

    /// Deadline for the content-acquisition call in seconds. Default: 120.
    /// Exceeding it fails the run with `AcquisitionTimeout`.
    pub acquire_timeout_secs: u64,

    /// Deadline for the markdown-generation call in seconds. Default: 60.
    pub generate_timeout_secs: u64,

    /// Optional stage-progress observer.
    pub observer: Option<ObserverHandle>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            note_type: NoteType::Short,
            title: None,
            model: None,
            provider_name: None,
            provider: None,
            content_source: None,
            generator: None,
            temperature: 0.0,
            max_tokens: 8192,
            acquire_timeout_secs: 120,
            generate_timeout_secs: 60,
            observer: None,
        }
    }
}

impl fmt::Debug for NotesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotesConfig")
            .field("note_type", &self.note_type)
            .field("title", &self.title)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field(
                "content_source",
                &self.content_source.as_ref().map(|_| "<dyn ContentSource>"),
            )
            .field(
                "generator",
                &self.generator.as_ref().map(|_| "<dyn MarkdownGenerator>"),
            )
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("generate_timeout_secs", &self.generate_timeout_secs)
            .finish()
    }
}

impl NotesConfig {
    /// Create a new builder for `NotesConfig`.
    pub fn builder() -> NotesConfigBuilder {
        NotesConfigBuilder {
            config: Self::default(),
        }
    }

    /// Effective document title for this configuration.
    pub fn effective_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("YouTube Notes ({})", self.note_type.title_case()))
    }
}

/// Builder for [`NotesConfig`].
#[derive(Debug)]
pub struct NotesConfigBuilder {
    config: NotesConfig,
}

impl NotesConfigBuilder {
    pub fn note_type(mut self, t: NoteType) -> Self {
        self.config.note_type = t;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn content_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.config.content_source = Some(source);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn MarkdownGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn acquire_timeout_secs(mut self, secs: u64) -> Self {
        self.config.acquire_timeout_secs = secs;
        self
    }

    pub fn generate_timeout_secs(mut self, secs: u64) -> Self {
        self.config.generate_timeout_secs = secs;
        self
    }

    pub fn observer(mut self, observer: ObserverHandle) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<NotesConfig, NotesError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(NotesError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.acquire_timeout_secs == 0 || c.generate_timeout_secs == 0 {
            return Err(NotesError::InvalidConfig(
                "timeouts must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_are_valid() {
        let config = NotesConfig::builder().build().unwrap();
        assert_eq!(config.note_type, NoteType::Short);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn temperature_is_clamped() {
        let config = NotesConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = NotesConfig::builder()
            .acquire_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, NotesError::InvalidConfig(_)));
    }

    #[test]
    fn effective_title_reflects_note_type() {
        let config = NotesConfig::builder()
            .note_type(NoteType::Long)
            .build()
            .unwrap();
        assert_eq!(config.effective_title(), "YouTube Notes (Long)");

        let config = NotesConfig::builder().title("My Lecture").build().unwrap();
        assert_eq!(config.effective_title(), "My Lecture");
    }

    #[test]
    fn note_type_names() {
        assert_eq!(NoteType::Short.as_str(), "short");
        assert_eq!(NoteType::Long.to_string(), "long");
        assert_eq!(NoteType::Long.title_case(), "Long");
    }
}
