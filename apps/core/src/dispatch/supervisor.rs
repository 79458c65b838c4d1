use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{info, instrument, warn};

use crate::config::AssistantConfig;
use crate::dispatch::feedback::FeedbackSubmitter;
use crate::dispatch::gateway::HttpAssistantGateway;
use crate::dispatch::messages::DispatchMessage;
use crate::dispatch::orchestrator::Dispatcher;
use crate::dispatch::outcome::{DispatchOutcome, FeedbackOutcome, HealthStatus};
use crate::dispatch::traits::AssistantGateway;
use crate::error::AppError;
use crate::models::{AssistantRequest, FeedbackSubmission};
use crate::solicitations::SolicitationStore;

/// A handle to the dispatcher runner.
///
/// This is the entry point for callers that serve many requests at once. Each
/// message is handled on its own task, so a slow assistant call never holds up
/// the others. Dropping the returned future (or hitting the handling timeout)
/// cancels the work behind it.
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::Sender<DispatchMessage>,
    handling_timeout: Duration,
}

impl DispatcherHandle {
    /// Spawns a runner talking to the assistant over HTTP.
    pub fn new(config: &AssistantConfig, store: Arc<SolicitationStore>) -> Result<Self, AppError> {
        let gateway = Arc::new(HttpAssistantGateway::new(config.clone())?);
        Ok(Self::with_gateway(config, store, gateway))
    }

    /// Spawns a runner over any gateway.
    pub fn with_gateway<G: AssistantGateway>(
        config: &AssistantConfig,
        store: Arc<SolicitationStore>,
        gateway: Arc<G>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let runner = DispatcherRunner {
            receiver,
            dispatcher: Arc::new(Dispatcher::new(store, gateway.clone(), config)),
            feedback: Arc::new(FeedbackSubmitter::new(gateway, config)),
        };
        tokio::spawn(async move { runner.run().await });
        Self {
            sender,
            handling_timeout: config.handling_timeout,
        }
    }

    /// Classifies and sends one request.
    ///
    /// Dispatch failures are part of the outcome; only channel failures and
    /// the handling timeout surface as errors.
    #[instrument(skip(self, request))]
    pub async fn dispatch(&self, request: AssistantRequest) -> Result<DispatchOutcome, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = DispatchMessage::Dispatch {
            request,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Channel(e.to_string()))?;
        timeout(self.handling_timeout, recv)
            .await?
            .map_err(|e| AppError::Channel(e.to_string()))
    }

    #[instrument(skip(self, submission))]
    pub async fn submit_feedback(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackOutcome, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = DispatchMessage::SubmitFeedback {
            submission,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Channel(e.to_string()))?;
        timeout(self.handling_timeout, recv)
            .await?
            .map_err(|e| AppError::Channel(e.to_string()))
    }

    pub async fn check_health(&self) -> Result<HealthStatus, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(DispatchMessage::CheckHealth { responder: send })
            .await
            .map_err(|e| AppError::Channel(e.to_string()))?;
        timeout(self.handling_timeout, recv)
            .await?
            .map_err(|e| AppError::Channel(e.to_string()))
    }
}

// --- Runner ---
struct DispatcherRunner<G: AssistantGateway> {
    receiver: mpsc::Receiver<DispatchMessage>,
    dispatcher: Arc<Dispatcher<G>>,
    feedback: Arc<FeedbackSubmitter<G>>,
}

impl<G: AssistantGateway> DispatcherRunner<G> {
    async fn run(mut self) {
        info!("Dispatcher started");
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }
        info!("Dispatcher stopped");
    }

    fn handle_message(&self, msg: DispatchMessage) {
        match msg {
            DispatchMessage::Dispatch {
                request,
                mut responder,
            } => {
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = responder.closed() => {
                            warn!("Caller stopped waiting, dispatch cancelled");
                        }
                        outcome = dispatcher.dispatch_request(request) => {
                            let _ = responder.send(outcome);
                        }
                    }
                });
            }
            DispatchMessage::SubmitFeedback {
                submission,
                responder,
            } => {
                let feedback = self.feedback.clone();
                tokio::spawn(async move {
                    let outcome = feedback.submit(&submission).await;
                    let _ = responder.send(outcome);
                });
            }
            DispatchMessage::CheckHealth { responder } => {
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    let _ = responder.send(dispatcher.check_health().await);
                });
            }
        }
    }
}
