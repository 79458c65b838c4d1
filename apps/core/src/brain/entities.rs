//! Entity extraction.
//!
//! Typed tokens drawn from the product form (name, category, code) and from
//! the question itself (currency amounts, the first few numbers).

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

use super::module_context::{field_text, ContextMap};

/// Maximum number of plain numbers reported per question
const MAX_NUMBERS: usize = 3;

static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)R\$\s*\d+(?:,\d{2})?|\d+\s*reais?").expect("money pattern")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("number pattern"));

/// An entity mentioned by the request. Serialized as `PREFIX:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Product(String),
    Category(String),
    Code(String),
    Money(String),
    Number(String),
}

impl Entity {
    pub fn prefix(&self) -> &'static str {
        match self {
            Entity::Product(_) => "PRODUCT",
            Entity::Category(_) => "CATEGORY",
            Entity::Code(_) => "CODE",
            Entity::Money(_) => "MONEY",
            Entity::Number(_) => "NUMBER",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Entity::Product(v)
            | Entity::Category(v)
            | Entity::Code(v)
            | Entity::Money(v)
            | Entity::Number(v) => v,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix(), self.value())
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extract entities from the question and the product fields of the context.
pub fn extract_entities(question: &str, context: &ContextMap) -> Vec<Entity> {
    let mut entities = Vec::new();

    if let Some(name) = field_text(context, "name") {
        entities.push(Entity::Product(name));
    }
    if let Some(category) = field_text(context, "category") {
        entities.push(Entity::Category(category));
    }
    if let Some(code) = field_text(context, "code") {
        entities.push(Entity::Code(code));
    }

    entities.extend(
        MONEY
            .find_iter(question)
            .map(|m| Entity::Money(m.as_str().to_string())),
    );

    entities.extend(
        NUMBER
            .find_iter(question)
            .take(MAX_NUMBERS)
            .map(|m| Entity::Number(m.as_str().to_string())),
    );

    entities
}
