/*!
 * Mock capability implementations for testing
 *
 * These stand in for the classifier and translator so the pipeline can be
 * driven without a language model backend. Each mock records its calls in a
 * shared tracker, so clones handed to a pipeline can still be inspected.
 */

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use post_translator::errors::ProviderError;
use post_translator::translation::{EnglishTranslator, LanguageClassifier};

/// Tracks calls to ensure the pipeline makes exactly the expected requests
#[derive(Debug, Default)]
pub struct ApiCallTracker {
    /// Count of mock calls made
    pub call_count: usize,
    /// Last text received
    pub last_request: Option<String>,
}

/// Type of error to simulate
#[derive(Debug, Clone, Copy)]
pub enum MockErrorType {
    /// Connection refused
    Connection,
    /// Call took too long
    Timeout,
    /// Backend answered with an error status
    Api,
}

impl MockErrorType {
    fn to_error(self) -> ProviderError {
        match self {
            MockErrorType::Connection => ProviderError::ConnectionError("Ollama server down".into()),
            MockErrorType::Timeout => ProviderError::Timeout(Duration::from_secs(30)),
            MockErrorType::Api => ProviderError::ApiError {
                status_code: 500,
                message: "Internal server error".into(),
            },
        }
    }
}

#[derive(Debug, Clone)]
enum MockAnswer {
    Fixed(String),
    Rule(fn(&str) -> String),
    Fail(MockErrorType),
    Slow(Duration, String),
}

impl MockAnswer {
    async fn answer(&self, text: &str) -> Result<String, ProviderError> {
        match self {
            MockAnswer::Fixed(value) => Ok(value.clone()),
            MockAnswer::Rule(rule) => Ok(rule(text)),
            MockAnswer::Fail(error_type) => Err(error_type.to_error()),
            MockAnswer::Slow(delay, value) => {
                tokio::time::sleep(*delay).await;
                Ok(value.clone())
            }
        }
    }
}

fn record(tracker: &Arc<Mutex<ApiCallTracker>>, text: &str) {
    let mut tracker = tracker.lock().unwrap();
    tracker.call_count += 1;
    tracker.last_request = Some(text.to_string());
}

/// Mock implementation of the language classifier
#[derive(Debug, Clone)]
pub struct MockClassifier {
    tracker: Arc<Mutex<ApiCallTracker>>,
    answer: MockAnswer,
}

impl MockClassifier {
    fn with_answer(answer: MockAnswer) -> Self {
        MockClassifier {
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
            answer,
        }
    }

    /// Always answers `label`
    pub fn answering(label: &str) -> Self {
        Self::with_answer(MockAnswer::Fixed(label.to_string()))
    }

    /// Answers whatever `rule` returns for the text
    pub fn with_rule(rule: fn(&str) -> String) -> Self {
        Self::with_answer(MockAnswer::Rule(rule))
    }

    /// Always fails
    pub fn failing(error_type: MockErrorType) -> Self {
        Self::with_answer(MockAnswer::Fail(error_type))
    }

    /// Answers `label` after `delay`
    pub fn slow(delay: Duration, label: &str) -> Self {
        Self::with_answer(MockAnswer::Slow(delay, label.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.tracker.lock().unwrap().call_count
    }

    pub fn last_request(&self) -> Option<String> {
        self.tracker.lock().unwrap().last_request.clone()
    }
}

#[async_trait]
impl LanguageClassifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<String, ProviderError> {
        record(&self.tracker, text);
        self.answer.answer(text).await
    }
}

/// Mock implementation of the English translator
#[derive(Debug, Clone)]
pub struct MockTranslator {
    tracker: Arc<Mutex<ApiCallTracker>>,
    answer: MockAnswer,
}

impl MockTranslator {
    fn with_answer(answer: MockAnswer) -> Self {
        MockTranslator {
            tracker: Arc::new(Mutex::new(ApiCallTracker::default())),
            answer,
        }
    }

    /// Always answers `translation`
    pub fn answering(translation: &str) -> Self {
        Self::with_answer(MockAnswer::Fixed(translation.to_string()))
    }

    /// Answers whatever `rule` returns for the text
    pub fn with_rule(rule: fn(&str) -> String) -> Self {
        Self::with_answer(MockAnswer::Rule(rule))
    }

    /// Always fails
    pub fn failing(error_type: MockErrorType) -> Self {
        Self::with_answer(MockAnswer::Fail(error_type))
    }

    /// Answers `translation` after `delay`
    pub fn slow(delay: Duration, translation: &str) -> Self {
        Self::with_answer(MockAnswer::Slow(delay, translation.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.tracker.lock().unwrap().call_count
    }

    pub fn last_request(&self) -> Option<String> {
        self.tracker.lock().unwrap().last_request.clone()
    }
}

#[async_trait]
impl EnglishTranslator for MockTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        record(&self.tracker, text);
        self.answer.answer(text).await
    }
}
