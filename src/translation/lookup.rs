/*!
 * Exact-match table translator.
 *
 * Used for deterministic runs without a backend. A text is translated only
 * when it appears verbatim in the table; anything else is a failure, which
 * the pipeline turns into its fallback result.
 */

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::errors::ProviderError;
use super::capabilities::EnglishTranslator;

static DEFAULT_TABLE: Lazy<HashMap<String, String>> = Lazy::new(|| {
    [
        ("这是一条中文消息", "This is a Chinese message"),
        ("Dies ist eine Nachricht auf Deutsch", "This is a message in German"),
        ("Hier ist dein erstes Beispiel.", "Here is your first example."),
        ("مرحبًا، ما هو اسمك الأوسط؟", "Hi, what is your middle name?"),
        ("Ja sam veliki čovjek od krompira.", "I'm a big potato man."),
        ("İran'ın yaptığı gerçekten korkunçtu.", "What Iran did was truly terrible."),
        ("Afrika ni bara, sio nchi.", "Africa is a continent, not a country."),
        ("제 그룹 동료 중 한 명이 한국인입니다.", "One of my group colleagues is Korean."),
        ("Le sommeil s'épuise, la créativité s'affaiblit, je me plains.", "Sleep runs out, creativity weakens, I complain."),
        ("Bonjour, comment allez-vous?", "Hello, how are you?"),
        ("Hola, ¿cómo estás?", "Hi, how are you?"),
    ]
    .into_iter()
    .map(|(source, target)| (source.to_string(), target.to_string()))
    .collect()
});

/// Translator backed by a fixed source → English table
#[derive(Debug, Clone)]
pub struct LookupTranslator {
    table: HashMap<String, String>,
}

impl Default for LookupTranslator {
    fn default() -> Self {
        Self { table: DEFAULT_TABLE.clone() }
    }
}

impl LookupTranslator {
    /// Build a translator from explicit pairs
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            table: pairs.into_iter().map(|(s, t)| (s.into(), t.into())).collect(),
        }
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.table.get(text).map(String::as_str)
    }
}

#[async_trait]
impl EnglishTranslator for LookupTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        self.lookup(text)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::RequestFailed("No table entry for this text".to_string()))
    }
}
