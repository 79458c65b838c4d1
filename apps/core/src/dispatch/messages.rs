use thiserror::Error;
use tokio::sync::oneshot;

use crate::dispatch::outcome::{DispatchOutcome, FailureKind, FeedbackOutcome, HealthStatus};
use crate::models::{AssistantRequest, FeedbackSubmission};

/// Defines the ways a call to the assistant service can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The service answered with a status the call does not accept.
    #[error("assistant rejected the request: {status} - {body}")]
    RemoteRejected { status: u16, body: String },
    /// The call did not complete within the request timeout.
    #[error("assistant call timed out")]
    Timeout,
    /// The service could not be reached.
    #[error("assistant unreachable: {0}")]
    Connection(String),
    /// Anything else, including unreadable replies.
    #[error("unexpected assistant failure: {0}")]
    Unexpected(String),
}

impl DispatchError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            DispatchError::RemoteRejected { .. } => FailureKind::RemoteRejected,
            DispatchError::Timeout => FailureKind::Timeout,
            DispatchError::Connection(_) => FailureKind::ConnectionError,
            DispatchError::Unexpected(_) => FailureKind::UnexpectedError,
        }
    }

    /// Message shown to the person who asked.
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::RemoteRejected { status, body } => {
                format!("Erro na API de IA: {} - {}", status, body)
            }
            DispatchError::Timeout => {
                "A solicitação demorou mais que o esperado. Por favor, tente novamente.".to_string()
            }
            DispatchError::Connection(_) => "Não foi possível conectar ao assistente de IA. \
                Verifique se o serviço está rodando e tente novamente."
                .to_string(),
            DispatchError::Unexpected(detail) => format!(
                "Erro inesperado ao processar solicitação: {}. Tente novamente.",
                detail
            ),
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout
        } else if err.is_connect() {
            DispatchError::Connection(err.to_string())
        } else {
            DispatchError::Unexpected(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for DispatchError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        DispatchError::Timeout
    }
}

/// Messages that can be sent to the dispatcher runner.
#[derive(Debug)]
pub enum DispatchMessage {
    /// Classify a request and send it to the assistant.
    Dispatch {
        request: AssistantRequest,
        /// Receives the outcome; dropping the receiver cancels the work.
        responder: oneshot::Sender<DispatchOutcome>,
    },
    /// Forward a rating of an earlier answer.
    SubmitFeedback {
        submission: FeedbackSubmission,
        responder: oneshot::Sender<FeedbackOutcome>,
    },
    /// Probe the assistant's health endpoint.
    CheckHealth {
        responder: oneshot::Sender<HealthStatus>,
    },
}
