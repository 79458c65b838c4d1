//! Classification Result - output structure of request analysis.
//!
//! Holds every signal derived from a question and its module context. Built
//! fresh per request and never cached.

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::complexity::Complexity;
use super::entities::Entity;
use super::module_context::ModuleResolution;
use super::sentiment::Sentiment;

/// Complete classification of one request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Resolved screen / business module
    pub module: ModuleResolution,

    /// Detected category
    pub category: Category,

    /// Module-qualified subcategory
    pub subcategory: String,

    pub complexity: Complexity,

    pub sentiment: Sentiment,

    /// Content words, at most 10, first-seen order
    pub keywords: Vec<String>,

    /// Topics addressed, deduplicated
    pub topics: Vec<String>,

    /// Entities mentioned in the question or the product form
    pub entities: Vec<Entity>,

    /// Tags, at most 15, deduplicated
    pub tags: Vec<String>,
}

/// Condensed view of a classification for logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub module: String,
    pub category: String,
    pub subcategory: String,
    pub complexity: Complexity,
    pub sentiment: Sentiment,
}

impl ClassificationResult {
    /// Screen slug (`tela` / `modulo_categoria`)
    pub fn screen(&self) -> &'static str {
        self.module.tag.slug()
    }

    /// Check if the question needs more than a quick lookup
    pub fn is_complex(&self) -> bool {
        self.complexity != Complexity::Low
    }

    pub fn condensed(&self) -> ClassificationSummary {
        ClassificationSummary {
            module: self.screen().to_string(),
            category: self.category.label().to_string(),
            subcategory: self.subcategory.clone(),
            complexity: self.complexity,
            sentiment: self.sentiment,
        }
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Module: {} ({:?}), Category: {}, Subcategory: {}, Complexity: {:?}, Sentiment: {:?}, Keywords: {}, Tags: {}",
            self.module.tag,
            self.module.resolved_by,
            self.category,
            self.subcategory,
            self.complexity,
            self.sentiment,
            self.keywords.len(),
            self.tags.len(),
        )
    }
}
