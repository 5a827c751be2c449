/*!
 * # post-translator
 *
 * A small service that makes user-submitted text English: it asks a language
 * model which language a post is written in and, when it is not English,
 * asks for an English translation.
 *
 * ## Behaviour
 *
 * - Empty or whitespace-only text is returned as-is, flagged English
 * - Text classified as English is returned untouched
 * - Other text is translated
 * - Any backend failure or unparseable classifier answer returns the
 *   original text with a configurable flag, never an error
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration loading, environment overrides and validation
 * - `translation`: The pipeline and its capabilities:
 *   - `translation::pipeline`: Orchestration and fallback policy
 *   - `translation::label`: Validation of classifier answers
 *   - `translation::llm`: Language model backed classifier and translator
 *   - `translation::lookup`: Exact-match table translator
 * - `providers`: Client implementations for language model backends:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `server`: HTTP endpoints
 * - `language_utils`: Language name helpers
 * - `errors`: Custom error types for the service
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod server;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, PipelineError, ProviderError};
pub use translation::{FallbackPolicy, PipelineResult, TranslationPipeline};
