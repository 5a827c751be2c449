/*!
 * Validation of classifier output.
 *
 * The classifier is asked for a single bare language name. Whatever it
 * actually returns is untrusted model output, so it is parsed here into a
 * `ParsedLabel` before any branch looks at it.
 */

use std::fmt;

use crate::language_utils;

/// A classifier answer that passed validation: exactly one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLabel(String);

impl LanguageLabel {
    /// The token as the classifier wrote it, without surrounding whitespace
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label names English, ignoring case
    pub fn is_english(&self) -> bool {
        language_utils::is_english_name(&self.0)
    }

    /// ISO 639 code of the named language, when the name is known
    pub fn iso_code(&self) -> Option<String> {
        language_utils::iso_code_for_name(&self.0)
    }
}

impl fmt::Display for LanguageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of validating a raw classifier answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLabel {
    Valid(LanguageLabel),
    /// Anything that is not a single token; carries the raw answer for logging
    Malformed(String),
}

impl ParsedLabel {
    /// Validate a raw classifier answer.
    ///
    /// The answer must split into exactly one whitespace-delimited token.
    /// Empty answers, phrases and sentences are `Malformed`.
    pub fn parse(raw: &str) -> Self {
        let mut tokens = raw.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(token), None) => Self::Valid(LanguageLabel(token.to_string())),
            _ => Self::Malformed(raw.to_string()),
        }
    }
}
