//! Feedback Submitter.
//!
//! Forwards a user's rating of an answer to the assistant service. Failures
//! never propagate: they come back as a [`FeedbackOutcome`] telling the user
//! the feedback was kept locally.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::config::AssistantConfig;
use crate::dispatch::messages::DispatchError;
use crate::dispatch::outcome::FeedbackOutcome;
use crate::dispatch::traits::AssistantGateway;
use crate::dispatch::wire::FeedbackPayload;
use crate::error::AppError;
use crate::models::FeedbackSubmission;

pub struct FeedbackSubmitter<G: AssistantGateway> {
    gateway: Arc<G>,
    origin: String,
}

impl<G: AssistantGateway> FeedbackSubmitter<G> {
    pub fn new(gateway: Arc<G>, config: &AssistantConfig) -> Self {
        Self {
            gateway,
            origin: config.origin.clone(),
        }
    }

    #[instrument(skip(self, submission), fields(remote_id = %submission.remote_id, rating = submission.rating))]
    pub async fn submit(&self, submission: &FeedbackSubmission) -> FeedbackOutcome {
        if let Err(e) = submission.validate() {
            let error = AppError::from(e);
            warn!(error = %error, "Feedback rejected before sending");
            return FeedbackOutcome::not_sent(error.to_string(), None);
        }

        let payload = FeedbackPayload::new(submission, Utc::now().to_rfc3339(), &self.origin);
        match self
            .gateway
            .submit_feedback(&submission.remote_id, &payload)
            .await
        {
            Ok(receipt) => {
                info!(
                    status = receipt.status,
                    feedback_id = receipt.feedback_id.as_deref().unwrap_or(""),
                    escalation = submission.needs_escalation(),
                    "Feedback sent"
                );
                FeedbackOutcome::sent(receipt.status, receipt.feedback_id)
            }
            Err(e) => {
                warn!(error = %e, "Feedback not sent");
                let status_code = match &e {
                    DispatchError::RemoteRejected { status, .. } => Some(*status),
                    _ => None,
                };
                FeedbackOutcome::not_sent(failure_message(&e), status_code)
            }
        }
    }
}

fn failure_message(error: &DispatchError) -> String {
    match error {
        DispatchError::RemoteRejected { status, body } => {
            format!("Erro ao enviar feedback: {} - {}", status, body)
        }
        DispatchError::Timeout => "Timeout na conexão com o serviço de feedback".to_string(),
        DispatchError::Connection(_) => "Serviço de feedback indisponível".to_string(),
        DispatchError::Unexpected(detail) => format!("Erro inesperado: {}", detail),
    }
}
