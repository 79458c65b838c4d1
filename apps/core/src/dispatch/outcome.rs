//! Normalized results handed back to callers of the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message attached to every failed feedback submission.
pub const FEEDBACK_STORED_LOCALLY: &str = "Feedback salvo localmente";

/// Identifier the caller should use for follow-ups.
///
/// A request starts out known only by its local solicitation id; once the
/// assistant service has saved it, the service's id replaces it (feedback is
/// keyed by the remote id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum RequestRef {
    Pending(String),
    Confirmed(String),
}

impl RequestRef {
    pub fn id(&self) -> &str {
        match self {
            RequestRef::Pending(id) | RequestRef::Confirmed(id) => id,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, RequestRef::Confirmed(_))
    }
}

/// Why a dispatch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No module or product data was supplied
    InsufficientInput,
    /// The assistant answered with a non-success status
    RemoteRejected,
    Timeout,
    ConnectionError,
    UnexpectedError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchFailure {
    pub kind: FailureKind,
    /// User-facing error message
    pub message: String,
    /// Locally synthesized answer to show instead
    pub fallback_answer: String,
}

/// Result of one dispatch, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub success: bool,
    /// Correlation id sent as `X-Request-ID`
    pub request_id: String,
    /// Absent only when no record was created
    pub reference: Option<RequestRef>,
    pub answer: Option<String>,
    pub tokens_used: Option<u64>,
    /// Seconds, as reported by the assistant
    pub response_time: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub failure: Option<DispatchFailure>,
}

impl DispatchOutcome {
    #[allow(clippy::too_many_arguments)]
    pub fn succeeded(
        request_id: String,
        reference: RequestRef,
        answer: String,
        tokens_used: u64,
        response_time: f64,
        category: String,
        subcategory: String,
    ) -> Self {
        Self {
            success: true,
            request_id,
            reference: Some(reference),
            answer: Some(answer),
            tokens_used: Some(tokens_used),
            response_time: Some(response_time),
            category: Some(category),
            subcategory: Some(subcategory),
            failure: None,
        }
    }

    pub fn failed(
        request_id: String,
        reference: Option<RequestRef>,
        failure: DispatchFailure,
    ) -> Self {
        Self {
            success: false,
            request_id,
            reference,
            answer: None,
            tokens_used: None,
            response_time: None,
            category: None,
            subcategory: None,
            failure: Some(failure),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }

    pub fn fallback_answer(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.fallback_answer.as_str())
    }

    /// Id to use for follow-up calls, if any record exists.
    pub fn reference_id(&self) -> Option<&str> {
        self.reference.as_ref().map(RequestRef::id)
    }
}

/// Result of a feedback submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub success: bool,
    pub message: String,
    pub feedback_id: Option<String>,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    /// Set on failure
    pub fallback_message: Option<String>,
}

impl FeedbackOutcome {
    pub fn sent(status_code: u16, feedback_id: Option<String>) -> Self {
        Self {
            success: true,
            message: "Feedback enviado com sucesso".to_string(),
            feedback_id,
            status_code: Some(status_code),
            error: None,
            fallback_message: None,
        }
    }

    pub fn not_sent(error: String, status_code: Option<u16>) -> Self {
        Self {
            success: false,
            message: "Erro ao enviar feedback".to_string(),
            feedback_id: None,
            status_code,
            error: Some(error),
            fallback_message: Some(FEEDBACK_STORED_LOCALLY.to_string()),
        }
    }
}

/// Health of the assistant service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub available: bool,
    /// `online`, `error` or `offline`
    pub status: String,
    /// Seconds
    pub response_time: Option<f64>,
    pub service_info: Option<Value>,
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn online(response_time: f64, service_info: Option<Value>) -> Self {
        Self {
            available: true,
            status: "online".to_string(),
            response_time: Some(response_time),
            service_info,
            error: None,
        }
    }

    pub fn error(status_code: u16) -> Self {
        Self {
            available: false,
            status: "error".to_string(),
            response_time: None,
            service_info: None,
            error: Some(format!("HTTP {}", status_code)),
        }
    }

    pub fn offline(error: String) -> Self {
        Self {
            available: false,
            status: "offline".to_string(),
            response_time: None,
            service_info: None,
            error: Some(error),
        }
    }
}
