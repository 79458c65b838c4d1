use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::brain::module_context::{is_filled, ContextMap};

/// The person asking. Every field is optional; anonymous requests are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requester {
    /// Identifier as sent by the frontend (numeric ids are stringified).
    #[serde(default, deserialize_with = "deserialize_loose_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn deserialize_loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(is_filled).map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    }))
}

/// Kind of tracked interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolicitationKind {
    Assistant,
    Product,
    Support,
}

/// Lifecycle state of a solicitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolicitationStatus {
    Pending,
    Processing,
    Concluded,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Module context captured when an assistant request is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// The module (or product) form data as received
    pub module: ContextMap,
    /// Resolved screen slug
    pub screen: String,
    /// `erp_session_<unix seconds>`
    pub session_id: String,
    pub origin: String,
    pub captured_at: DateTime<Utc>,
}

impl ContextSnapshot {
    pub fn capture(module: ContextMap, screen: &str, origin: &str) -> Self {
        let now = Utc::now();
        Self {
            module,
            screen: screen.to_string(),
            session_id: format!("erp_session_{}", now.timestamp()),
            origin: origin.to_string(),
            captured_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantDetails {
    pub question: String,
    pub context: Option<ContextSnapshot>,
    /// Set exactly when the record is concluded
    pub answer: Option<String>,
    pub tokens_used: Option<u64>,
    /// Seconds
    pub response_time: Option<f64>,
}

impl AssistantDetails {
    pub fn new(question: impl Into<String>, context: Option<ContextSnapshot>) -> Self {
        Self {
            question: question.into(),
            context,
            answer: None,
            tokens_used: None,
            response_time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAction {
    Create,
    Update,
    Delete,
    Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub action: ProductAction,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub product_data: Option<Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportCategory {
    Bug,
    Feature,
    Question,
    Improvement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportDetails {
    pub category: SupportCategory,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Also used as the record priority
    pub urgency: Priority,
}

/// Kind-specific payload of a solicitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolicitationDetails {
    Assistant(AssistantDetails),
    Product(ProductDetails),
    Support(SupportDetails),
}

impl SolicitationDetails {
    pub fn kind(&self) -> SolicitationKind {
        match self {
            SolicitationDetails::Assistant(_) => SolicitationKind::Assistant,
            SolicitationDetails::Product(_) => SolicitationKind::Product,
            SolicitationDetails::Support(_) => SolicitationKind::Support,
        }
    }

    /// Priority a new record of this kind starts with.
    pub fn initial_priority(&self) -> Priority {
        match self {
            SolicitationDetails::Support(support) => support.urgency,
            _ => Priority::Normal,
        }
    }
}

/// A tracked interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solicitation {
    /// `SOL_<YYYYmmdd>_<HHMMSS>_<8 hex>`
    pub id: String,
    pub requester: Requester,
    pub status: SolicitationStatus,
    pub priority: Priority,
    pub details: SolicitationDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Solicitation {
    pub fn kind(&self) -> SolicitationKind {
        self.details.kind()
    }

    pub fn assistant(&self) -> Option<&AssistantDetails> {
        match &self.details {
            SolicitationDetails::Assistant(details) => Some(details),
            _ => None,
        }
    }

    /// Answer text of a concluded assistant record.
    pub fn answer(&self) -> Option<&str> {
        self.assistant().and_then(|d| d.answer.as_deref())
    }
}

/// Incoming assistant request, as posted by the ERP frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub user: Option<Requester>,
    /// Screen data of the current module
    #[serde(default)]
    pub module: Option<ContextMap>,
    /// Product form data (older frontends)
    #[serde(default)]
    pub product: Option<ContextMap>,
    #[serde(rename = "userQuestion")]
    pub user_question: String,
    #[serde(rename = "requestId", default)]
    pub request_id: Option<String>,
}

impl AssistantRequest {
    /// The module data if filled in, otherwise the product data.
    pub fn context(&self) -> Option<&ContextMap> {
        self.module
            .as_ref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.product.as_ref().filter(|p| !p.is_empty()))
    }
}

/// Summary of the answer a feedback refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalResultContext {
    pub request_id: Option<String>,
    pub categoria: Option<String>,
    pub tokens_used: Option<u64>,
    pub response_time: Option<f64>,
}

impl OriginalResultContext {
    /// Build from the `{request: {requestId}, result: {...}}` structure the
    /// frontend echoes back with a rating.
    pub fn from_response_data(data: &Value) -> Self {
        let request = &data["request"];
        let result = &data["result"];

        Self {
            request_id: request["requestId"].as_str().map(str::to_string),
            categoria: result["categoria"].as_str().map(str::to_string),
            tokens_used: result["tokens_used"].as_u64(),
            response_time: result["response_time"].as_f64(),
        }
    }
}

/// A user's rating of an assistant answer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedbackSubmission {
    /// Identifier assigned by the assistant service
    #[validate(length(min = 1))]
    pub remote_id: String,
    /// Stars, 1 to 5
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub original: Option<OriginalResultContext>,
}

impl FeedbackSubmission {
    pub fn new(remote_id: impl Into<String>, rating: i64, comment: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            rating,
            comment: comment.into(),
            original: None,
        }
    }

    pub fn with_original(mut self, original: OriginalResultContext) -> Self {
        self.original = Some(original);
        self
    }

    /// 4 or 5 stars
    pub fn satisfied(&self) -> bool {
        self.rating >= 4
    }

    /// 3 stars or more
    pub fn resolved(&self) -> bool {
        self.rating >= 3
    }

    /// 1 or 2 stars
    pub fn needs_escalation(&self) -> bool {
        self.rating <= 2
    }
}
