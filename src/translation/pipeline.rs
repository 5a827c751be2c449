/*!
 * Classification-and-translation pipeline.
 *
 * Turns one input text into one `PipelineResult`:
 *
 * 1. Empty or whitespace-only input is returned as English, no calls made.
 * 2. The classifier names the language.
 * 3. The answer is validated as a single token (`ParsedLabel`).
 * 4. "English" (any case) returns the input untouched.
 * 5. Anything else is sent to the translator.
 *
 * A failure in steps 2, 3 or 5 never reaches the caller. It yields the
 * original text with the flag fixed by the configured `FallbackPolicy`.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranslatorKind};
use crate::errors::{PipelineError, ProviderError};
use crate::providers::ollama::Ollama;
use super::capabilities::{EnglishTranslator, LanguageClassifier};
use super::label::{LanguageLabel, ParsedLabel};
use super::llm::{LlmClassifier, LlmTranslator, ModelSettings};
use super::lookup::LookupTranslator;

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Whether downstream consumers may treat `translated_content` as final English text
    pub is_english: bool,
    /// The translation, or the original text on pass-through and fallback
    pub translated_content: String,
}

impl PipelineResult {
    /// The input was English; content is the input itself
    pub fn english(text: &str) -> Self {
        Self { is_english: true, translated_content: text.to_string() }
    }

    /// The input was translated
    pub fn translated(translation: String) -> Self {
        Self { is_english: false, translated_content: translation }
    }
}

/// The result returned when any stage fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Flag reported alongside the untouched input
    pub is_english: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::assume_english()
    }
}

impl FallbackPolicy {
    /// Failures pass the text through as final content
    pub fn assume_english() -> Self {
        Self { is_english: true }
    }

    /// Failures pass the text through, flagged as untranslated foreign text
    pub fn assume_foreign() -> Self {
        Self { is_english: false }
    }

    pub fn result_for(&self, text: &str) -> PipelineResult {
        PipelineResult { is_english: self.is_english, translated_content: text.to_string() }
    }
}

/// Coordinates a classifier and a translator. Cheap to clone and share.
#[derive(Clone)]
pub struct TranslationPipeline {
    classifier: Arc<dyn LanguageClassifier>,
    translator: Arc<dyn EnglishTranslator>,
    fallback: FallbackPolicy,
    call_timeout: Option<Duration>,
}

impl std::fmt::Debug for TranslationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationPipeline")
            .field("fallback", &self.fallback)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl TranslationPipeline {
    /// Create a pipeline from injected capabilities, without a call deadline
    pub fn new(
        classifier: Arc<dyn LanguageClassifier>,
        translator: Arc<dyn EnglishTranslator>,
        fallback: FallbackPolicy,
    ) -> Self {
        Self { classifier, translator, fallback, call_timeout: None }
    }

    /// Bound every capability call by `timeout`; an elapsed deadline counts as a failure
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Build the Ollama-backed pipeline described by `config`
    pub fn from_config(config: &Config) -> Self {
        let provider = Arc::new(Ollama::from_config(&config.backend));
        let settings = ModelSettings::from_config(&config.backend);

        let classifier = Arc::new(LlmClassifier::new(Arc::clone(&provider), settings.clone()));
        let translator: Arc<dyn EnglishTranslator> = match config.pipeline.translator {
            TranslatorKind::Llm => Arc::new(LlmTranslator::new(provider, settings)),
            TranslatorKind::Lookup => Arc::new(LookupTranslator::default()),
        };

        let fallback = FallbackPolicy { is_english: config.pipeline.fallback_is_english };

        Self::new(classifier, translator, fallback)
            .with_call_timeout(Duration::from_secs(config.backend.timeout_secs))
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Run the pipeline. Never fails; see the module docs for the policy.
    pub async fn process(&self, text: &str) -> PipelineResult {
        if text.trim().is_empty() {
            return PipelineResult::english(text);
        }

        match self.run(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Passing text through unchanged: {}", e);
                self.fallback.result_for(text)
            }
        }
    }

    /// Classify and validate only, surfacing any failure. Used by the liveness check.
    pub async fn probe(&self, text: &str) -> Result<LanguageLabel, PipelineError> {
        let raw = self.call(self.classifier.classify(text))
            .await
            .map_err(PipelineError::Classification)?;

        match ParsedLabel::parse(&raw) {
            ParsedLabel::Valid(label) => Ok(label),
            ParsedLabel::Malformed(raw) => Err(PipelineError::MalformedLabel(raw)),
        }
    }

    async fn run(&self, text: &str) -> Result<PipelineResult, PipelineError> {
        let label = self.probe(text).await?;

        if label.is_english() {
            debug!("Text classified as English, no translation needed");
            return Ok(PipelineResult::english(text));
        }

        match label.iso_code() {
            Some(code) => debug!("Text classified as {} ({}), translating", label, code),
            None => debug!("Text classified as {}, translating", label),
        }

        let translation = self.call(self.translator.translate(text))
            .await
            .map_err(PipelineError::Translation)?;

        Ok(PipelineResult::translated(translation))
    }

    async fn call<F>(&self, call: F) -> Result<String, ProviderError>
    where
        F: Future<Output = Result<String, ProviderError>>,
    {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderError::Timeout(limit))?,
            None => call.await,
        }
    }
}
