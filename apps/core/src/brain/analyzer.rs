//! Request Analyzer - main orchestrator for the brain module.
//!
//! Resolves the module of a request and runs every text signal extractor
//! over the question, producing a [`ClassificationResult`]. Pure and
//! synchronous; safe to share between tasks.

use std::time::Instant;
use tracing::debug;

use super::category::CategoryClassifier;
use super::classification::ClassificationResult;
use super::complexity::ComplexityDetector;
use super::entities::extract_entities;
use super::keywords::KeywordExtractor;
use super::module_context::{self, ContextMap};
use super::sentiment::detect_sentiment;
use super::tags::TagGenerator;
use super::topics::extract_topics;

/// Runs all extractors over a question and its module context
pub struct RequestAnalyzer {
    category_classifier: CategoryClassifier,
    keyword_extractor: KeywordExtractor,
    complexity_detector: ComplexityDetector,
    tag_generator: TagGenerator,
}

impl Default for RequestAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestAnalyzer {
    /// Create a new analyzer with default settings
    pub fn new() -> Self {
        Self {
            category_classifier: CategoryClassifier::new(),
            keyword_extractor: KeywordExtractor::new(),
            complexity_detector: ComplexityDetector::new(),
            tag_generator: TagGenerator::new(),
        }
    }

    /// Analyze a question in the context of its module
    pub fn analyze(&self, question: &str, context: &ContextMap) -> ClassificationResult {
        let start = Instant::now();

        let module = module_context::resolve(context);
        let category = self.category_classifier.classify(question);
        let subcategory = self
            .category_classifier
            .subcategory(category, question, &module);

        let result = ClassificationResult {
            category,
            subcategory,
            complexity: self.complexity_detector.detect(question),
            sentiment: detect_sentiment(question),
            keywords: self.keyword_extractor.extract(question),
            topics: extract_topics(question, context),
            entities: extract_entities(question, context),
            tags: self.tag_generator.generate(question, context, &module),
            module,
        };

        debug!(
            elapsed_us = start.elapsed().as_micros() as u64,
            "Analyzed request: {}",
            result.summary()
        );

        result
    }
}
