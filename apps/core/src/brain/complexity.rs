//! Question Complexity Detection.
//!
//! Three tiers. Phrases that signal integration or optimisation work mark a
//! question as high complexity; quick lookups are low; anything else is
//! decided by length.

use serde::{Deserialize, Serialize};

/// Phrases that indicate a high-complexity request
const HIGH_COMPLEXITY: &[&str] = &[
    "como integrar",
    "análise detalhada",
    "estratégia",
    "implementar",
    "otimizar",
    "automatizar",
    "processo completo",
    "workflow",
];

/// Phrases that indicate a quick lookup
const LOW_COMPLEXITY: &[&str] = &[
    "o que é",
    "como faço",
    "onde encontro",
    "qual valor",
    "quanto custa",
];

/// Questions longer than this (in words) are at least medium complexity
const MEDIUM_WORD_THRESHOLD: usize = 15;

/// Complexity tier of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Label expected by the assistant service
    pub fn wire_label(&self) -> &'static str {
        match self {
            Complexity::Low => "baixa",
            Complexity::Medium => "media",
            Complexity::High => "alta",
        }
    }
}

/// Complexity detector for ERP questions
pub struct ComplexityDetector {
    high_phrases: &'static [&'static str],
    low_phrases: &'static [&'static str],
    medium_threshold: usize,
}

impl Default for ComplexityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexityDetector {
    /// Create a new complexity detector
    pub fn new() -> Self {
        Self {
            high_phrases: HIGH_COMPLEXITY,
            low_phrases: LOW_COMPLEXITY,
            medium_threshold: MEDIUM_WORD_THRESHOLD,
        }
    }

    /// Count whitespace-separated words
    pub fn word_count(text: &str) -> usize {
        text.split_whitespace().count()
    }

    /// Classify a question into a complexity tier
    pub fn detect(&self, question: &str) -> Complexity {
        let lower = question.to_lowercase();

        if self.high_phrases.iter().any(|p| lower.contains(p)) {
            Complexity::High
        } else if self.low_phrases.iter().any(|p| lower.contains(p)) {
            Complexity::Low
        } else if Self::word_count(question) > self.medium_threshold {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}
