//! Tokenisation helpers shared by the NER and text classification pipelines.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['\-][\p{L}\p{N}]+)*").expect("valid regex"));

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?;]+(?:\s+|$)|\n").expect("valid regex"));

/// Lowercased word tokens in document order.
pub fn tokens(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Unigrams followed by space-joined bigrams.
pub fn ngrams(text: &str) -> Vec<String> {
    let unigrams = tokens(text);
    let bigrams: Vec<String> = unigrams
        .windows(2)
        .map(|pair| format!("{} {}", pair[0], pair[1]))
        .collect();
    let mut all = unigrams;
    all.extend(bigrams);
    all
}

/// Byte offset where the sentence containing `offset` begins.
pub fn sentence_start(text: &str, offset: usize) -> usize {
    SENTENCE_END
        .find_iter(&text[..offset])
        .last()
        .map(|m| m.end())
        .unwrap_or(0)
}

/// Build a case-insensitive, word-bounded alternation over `phrases`.
///
/// Longer phrases are tried first so "left breast" wins over "breast".
/// Inner whitespace matches any run of whitespace.
pub fn phrase_regex(phrases: &[String]) -> Result<Option<Regex>, regex::Error> {
    let mut alternatives: Vec<String> = phrases
        .iter()
        .map(|phrase| {
            phrase
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|alt| !alt.is_empty())
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    alternatives.dedup();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).map(Some)
}

/// True when `needle` occurs as a contiguous run inside `haystack`.
pub fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack.windows(needle.len()).any(|window| window == needle)
}
