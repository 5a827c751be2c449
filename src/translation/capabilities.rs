/*!
 * The two capabilities the pipeline orchestrates.
 *
 * Both are potentially slow remote calls; the pipeline only relies on the
 * contracts below and never on a concrete implementation.
 */

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Names the language of a text
#[async_trait]
pub trait LanguageClassifier: Send + Sync {
    /// Return a free-form label naming the language of `text`.
    /// The label is untrusted and validated by the caller.
    async fn classify(&self, text: &str) -> Result<String, ProviderError>;
}

/// Renders a text into English
#[async_trait]
pub trait EnglishTranslator: Send + Sync {
    /// Return an English rendering of `text`
    async fn translate(&self, text: &str) -> Result<String, ProviderError>;
}
