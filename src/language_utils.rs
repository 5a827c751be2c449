use isolang::Language;

/// Language utilities for classifier labels
///
/// The classifier answers with English language names ("German", "japanese").
/// These helpers normalize such names and map them to ISO 639 codes where
/// the name is a known one.

/// The normalized form of the only label that means "no translation needed"
pub const ENGLISH: &str = "english";

/// Trim and lowercase a language name for comparison
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Check whether a language name denotes English, ignoring case and padding
pub fn is_english_name(name: &str) -> bool {
    normalize_name(name) == ENGLISH
}

/// Capitalize a language name the way isolang stores English names
fn title_case(name: &str) -> String {
    let lower = normalize_name(name);
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve an English language name to a language, if it is a known name
pub fn language_from_name(name: &str) -> Option<Language> {
    let title = title_case(name);
    if title.is_empty() {
        return None;
    }
    Language::from_name(&title)
}

/// Get the ISO 639-1 code for a language name, falling back to ISO 639-3
/// when no two-letter code exists
pub fn iso_code_for_name(name: &str) -> Option<String> {
    language_from_name(name).map(|lang| {
        lang.to_639_1()
            .map(|code| code.to_string())
            .unwrap_or_else(|| lang.to_639_3().to_string())
    })
}
