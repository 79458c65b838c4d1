//! # Brain Module
//!
//! Rule-based analysis of ERP assistant requests, run before anything is
//! sent to the assistant service. Every component is pure and synchronous.
//!
//! ## Components
//! - `module_context`: which ERP screen a request came from
//! - `category`: category and module-qualified subcategory
//! - `keywords`, `topics`, `entities`: lexical signals
//! - `complexity`, `sentiment`: tiers
//! - `tags`: tag set for the assistant's indexing
//! - `fallback`: local answers and context descriptions
//! - `classification`: output data structure
//! - `analyzer`: main orchestrator

pub mod analyzer;
pub mod category;
pub mod classification;
pub mod complexity;
pub mod entities;
pub mod fallback;
pub mod keywords;
pub mod module_context;
pub mod sentiment;
pub mod tags;
pub mod topics;

pub use analyzer::RequestAnalyzer;
pub use category::{Category, CategoryClassifier};
pub use classification::ClassificationResult;
pub use complexity::{Complexity, ComplexityDetector};
pub use entities::Entity;
pub use fallback::{context_description, fallback_answer};
pub use keywords::KeywordExtractor;
pub use module_context::{ContextMap, ModuleResolution, ModuleTag, ResolvedBy};
pub use sentiment::Sentiment;
pub use tags::TagGenerator;
