/*!
 * Language classification and translation into English.
 *
 * - `pipeline`: the orchestration logic and its fallback policy
 * - `label`: validation of classifier answers
 * - `capabilities`: the classifier and translator contracts
 * - `llm`: language model backed capabilities
 * - `lookup`: exact-match table translator
 */

// Re-export main types for easier usage
pub use self::capabilities::{EnglishTranslator, LanguageClassifier};
pub use self::label::{LanguageLabel, ParsedLabel};
pub use self::llm::{LlmClassifier, LlmTranslator, ModelSettings};
pub use self::lookup::LookupTranslator;
pub use self::pipeline::{FallbackPolicy, PipelineResult, TranslationPipeline};

// Submodules
pub mod capabilities;
pub mod label;
pub mod llm;
pub mod lookup;
pub mod pipeline;
