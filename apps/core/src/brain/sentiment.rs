use serde::{Deserialize, Serialize};

const POSITIVE: &[&str] = &["ótimo", "excelente", "bom", "gosto", "adorei", "perfeito"];
const NEGATIVE: &[&str] = &["problema", "erro", "ruim", "não funciona", "difícil", "complicado"];

/// Sentiment tier of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Label expected by the assistant service
    pub fn wire_label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positivo",
            Sentiment::Negative => "negativo",
            Sentiment::Neutral => "neutro",
        }
    }
}

/// Positive cues win over negative ones; everything else is neutral.
pub fn detect_sentiment(question: &str) -> Sentiment {
    let lower = question.to_lowercase();

    if POSITIVE.iter().any(|w| lower.contains(w)) {
        Sentiment::Positive
    } else if NEGATIVE.iter().any(|w| lower.contains(w)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
