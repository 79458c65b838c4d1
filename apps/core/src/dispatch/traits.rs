use async_trait::async_trait;

use crate::dispatch::messages::DispatchError;
use crate::dispatch::outcome::HealthStatus;
use crate::dispatch::wire::{ExecutionPayload, ExecutionReply, FeedbackPayload, FeedbackReceipt};

/// Defines the public interface of the remote assistant service.
///
/// The orchestrator only talks to the service through this trait, so tests can
/// swap in slow, failing or scripted gateways without a network.
#[async_trait]
pub trait AssistantGateway: Send + Sync + 'static {
    /// Sends a classified request and returns the parsed reply.
    async fn execute(
        &self,
        request_id: &str,
        payload: &ExecutionPayload,
    ) -> Result<ExecutionReply, DispatchError>;

    /// Sends a rating for the request the service saved under `remote_id`.
    async fn submit_feedback(
        &self,
        remote_id: &str,
        payload: &FeedbackPayload,
    ) -> Result<FeedbackReceipt, DispatchError>;

    /// Probes the service. Never fails; unavailability is part of the status.
    async fn health(&self) -> HealthStatus;
}
