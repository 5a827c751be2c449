/*!
 * Language model backed capabilities.
 *
 * Both capabilities send the user text as the prompt and steer the model
 * with a fixed system prompt. They work with any provider that speaks the
 * Ollama generate request/response types.
 */

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::app_config::BackendConfig;
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::ollama::{GenerationRequest, GenerationResponse};
use super::capabilities::{EnglishTranslator, LanguageClassifier};

/// System prompt for language classification
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "You are an expert language classifier. \
Your ONLY job is to analyze the input text and determine its original language. \
Your response must be the single English name of the detected language. \
If the text is NOT English, you must NEVER reply with 'English'.";

/// System prompt for translation into English
pub const TRANSLATOR_SYSTEM_PROMPT: &str = "You are an expert language translator. \
Your ONLY task is to accurately translate any non-English text provided by the user into English. \
The translation MUST be the entire sole content of your response. \
ONLY return the translated text.";

/// Model and sampling settings shared by both capabilities
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model_name: String,
    pub temperature: f32,
}

impl ModelSettings {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            model_name: config.model_name.clone(),
            temperature: config.temperature,
        }
    }
}

async fn generate_with<P>(
    provider: &P,
    settings: &ModelSettings,
    system_prompt: &str,
    text: &str,
) -> Result<String, ProviderError>
where
    P: Provider<Request = GenerationRequest, Response = GenerationResponse>,
{
    let request = GenerationRequest::new(settings.model_name.as_str(), text)
        .system(system_prompt)
        .temperature(settings.temperature);

    let response = provider.complete(request).await?;
    if !response.done {
        return Err(ProviderError::ParseError("Backend reported an incomplete generation".to_string()));
    }

    Ok(P::extract_text(&response).trim().to_string())
}

/// Classifier that asks the language model for the language name
#[derive(Debug)]
pub struct LlmClassifier<P> {
    provider: Arc<P>,
    settings: ModelSettings,
}

impl<P> LlmClassifier<P> {
    pub fn new(provider: Arc<P>, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl<P> LanguageClassifier for LlmClassifier<P>
where
    P: Provider<Request = GenerationRequest, Response = GenerationResponse>,
{
    async fn classify(&self, text: &str) -> Result<String, ProviderError> {
        let label = generate_with(self.provider.as_ref(), &self.settings, CLASSIFIER_SYSTEM_PROMPT, text).await?;
        debug!("Classifier answered {:?}", label);
        Ok(label)
    }
}

/// Translator that asks the language model for an English rendering
#[derive(Debug)]
pub struct LlmTranslator<P> {
    provider: Arc<P>,
    settings: ModelSettings,
}

impl<P> LlmTranslator<P> {
    pub fn new(provider: Arc<P>, settings: ModelSettings) -> Self {
        Self { provider, settings }
    }
}

#[async_trait]
impl<P> EnglishTranslator for LlmTranslator<P>
where
    P: Provider<Request = GenerationRequest, Response = GenerationResponse>,
{
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        generate_with(self.provider.as_ref(), &self.settings, TRANSLATOR_SYSTEM_PROMPT, text).await
    }
}
