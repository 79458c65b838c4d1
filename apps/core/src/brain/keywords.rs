//! Keyword Extraction.
//!
//! Pulls the content words out of a question: punctuation stripped,
//! lower-cased, Portuguese function words and very short tokens removed.
//! Output keeps first-seen order so truncation is stable.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Portuguese function words ignored during extraction
const STOPWORDS_PT: &[&str] = &[
    "o", "a", "os", "as", "um", "uma", "de", "da", "do", "das", "dos", "em", "na", "no", "nas",
    "nos", "para", "por", "com", "como", "que", "qual", "quando", "onde", "porque", "este",
    "esta", "isso", "é", "são", "foi", "será", "tem", "ter", "posso", "pode", "deve",
];

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("punctuation pattern"));

/// Keyword extractor for ERP questions
pub struct KeywordExtractor {
    stopwords: HashSet<&'static str>,
    min_word_length: usize,
    max_keywords: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Create a new keyword extractor with default settings
    pub fn new() -> Self {
        Self::with_config(3, 10)
    }

    /// Create a keyword extractor with custom configuration
    pub fn with_config(min_word_length: usize, max_keywords: usize) -> Self {
        Self {
            stopwords: STOPWORDS_PT.iter().copied().collect(),
            min_word_length,
            max_keywords,
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Tokenize text into candidate words
    fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = PUNCTUATION.replace_all(text, "").to_lowercase();

        cleaned
            .split_whitespace()
            .filter(|word| word.chars().count() >= self.min_word_length && !self.is_stopword(word))
            .map(str::to_string)
            .collect()
    }

    /// Extract at most `max_keywords` distinct keywords, in order of first appearance
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();

        self.tokenize(text)
            .into_iter()
            .filter(|word| seen.insert(word.clone()))
            .take(self.max_keywords)
            .collect()
    }
}
