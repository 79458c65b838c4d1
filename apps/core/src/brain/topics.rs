//! Topic extraction: maps question cues to the assistant's topic vocabulary.

use super::module_context::{field_text, ContextMap};

const TOPIC_TABLE: &[(&str, &[&str])] = &[
    ("preço", &["pricing", "cost_analysis"]),
    ("custo", &["pricing", "cost_analysis"]),
    ("estoque", &["inventory_management", "stock_control"]),
    ("venda", &["sales_strategy", "customer_engagement"]),
    ("marketing", &["marketing_strategy", "promotion"]),
    ("fornecedor", &["supplier_management", "procurement"]),
    ("cadastro", &["data_entry", "product_registration"]),
    ("categoria", &["categorization", "product_classification"]),
];

/// Topics addressed by a question, deduplicated in first-seen order.
///
/// A filled-in product `category` adds `product_<category>`.
pub fn extract_topics(question: &str, context: &ContextMap) -> Vec<String> {
    let lower = question.to_lowercase();

    let mut topics: Vec<String> = Vec::new();
    let mut push = |topic: String| {
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    };

    for (cue, entries) in TOPIC_TABLE {
        if lower.contains(cue) {
            entries.iter().for_each(|t| push(t.to_string()));
        }
    }

    if let Some(category) = field_text(context, "category") {
        push(format!("product_{}", category));
    }

    topics
}
