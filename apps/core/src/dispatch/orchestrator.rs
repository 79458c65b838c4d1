//! Dispatch Orchestrator.
//!
//! Classifies a request, records it, sends it to the assistant and folds
//! whatever happens into a [`DispatchOutcome`]. Callers never see a raw
//! error from this layer.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::brain::fallback::{context_description, fallback_answer, INSUFFICIENT_INPUT_MESSAGE};
use crate::brain::module_context::{self, ContextMap};
use crate::brain::{ComplexityDetector, RequestAnalyzer};
use crate::config::AssistantConfig;
use crate::dispatch::messages::DispatchError;
use crate::dispatch::outcome::{
    DispatchFailure, DispatchOutcome, FailureKind, HealthStatus, RequestRef,
};
use crate::dispatch::traits::AssistantGateway;
use crate::dispatch::wire::ExecutionPayload;
use crate::error::AppError;
use crate::models::{AssistantRequest, ContextSnapshot, Requester, Solicitation, SolicitationStatus};
use crate::solicitations::{generate_id, SolicitationStore, StoreError};

/// Message of an `insufficient_input` failure.
pub const INSUFFICIENT_INPUT_ERROR: &str = "Dados insuficientes: module ou product são obrigatórios";

/// Latency reported for answers produced offline, in seconds.
const LOCAL_RESPONSE_TIME: f64 = 1.5;

/// Moves a `processing` record to `error` if the dispatch is dropped before
/// it finishes (caller gone, handling timeout).
struct InFlight {
    store: Arc<SolicitationStore>,
    local_id: String,
    settled: bool,
}

impl InFlight {
    fn new(store: Arc<SolicitationStore>, local_id: String) -> Self {
        Self {
            store,
            local_id,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(local_id = %self.local_id, "Dispatch cancelled while in flight");
        if let Err(e) = self.store.set_status(&self.local_id, SolicitationStatus::Error) {
            error!(local_id = %self.local_id, error = %e, "Failed to mark cancelled dispatch");
        }
    }
}

fn insufficient_input(request_id: String) -> DispatchOutcome {
    DispatchOutcome::failed(
        request_id,
        None,
        DispatchFailure {
            kind: FailureKind::InsufficientInput,
            message: INSUFFICIENT_INPUT_ERROR.to_string(),
            fallback_answer: INSUFFICIENT_INPUT_MESSAGE.to_string(),
        },
    )
}

/// Sends classified requests to the assistant and tracks them in the store.
pub struct Dispatcher<G: AssistantGateway> {
    store: Arc<SolicitationStore>,
    gateway: Arc<G>,
    analyzer: RequestAnalyzer,
    origin: String,
}

impl<G: AssistantGateway> Dispatcher<G> {
    pub fn new(store: Arc<SolicitationStore>, gateway: Arc<G>, config: &AssistantConfig) -> Self {
        Self {
            store,
            gateway,
            analyzer: RequestAnalyzer::new(),
            origin: config.origin.clone(),
        }
    }

    pub fn store(&self) -> &Arc<SolicitationStore> {
        &self.store
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Dispatch a request as posted by the frontend.
    ///
    /// Requests without module or product data fail with
    /// `insufficient_input` before anything is recorded.
    pub async fn dispatch_request(&self, request: AssistantRequest) -> DispatchOutcome {
        let Some(context) = request.context().cloned() else {
            warn!("Request without module or product data");
            return insufficient_input(request.request_id.unwrap_or_default());
        };

        let requester = request.user.unwrap_or_default();
        self.dispatch(requester, &context, &request.user_question, request.request_id)
            .await
    }

    /// Classify, record and send one question.
    ///
    /// An empty context fails with `insufficient_input` and leaves the store untouched.
    #[instrument(
        skip(self, requester, context, question),
        fields(local_id = tracing::field::Empty, remote_id = tracing::field::Empty)
    )]
    pub async fn dispatch(
        &self,
        requester: Requester,
        context: &ContextMap,
        question: &str,
        request_id: Option<String>,
    ) -> DispatchOutcome {
        if context.is_empty() {
            warn!("Dispatch without module or product data");
            return insufficient_input(request_id.unwrap_or_default());
        }

        let start = Instant::now();
        let request_id = request_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(generate_id);

        let classification = self.analyzer.analyze(question, context);
        let description = context_description(
            requester.name.as_deref().filter(|n| !n.is_empty()),
            context,
            &classification.module,
        );
        let payload = ExecutionPayload::new(question, &requester, description, &classification);

        let snapshot = ContextSnapshot::capture(context.clone(), classification.screen(), &self.origin);
        let record = self.store.create_assistant(requester, question, Some(snapshot));
        let local_id = record.id;
        tracing::Span::current().record("local_id", local_id.as_str());

        info!(
            request_id = %request_id,
            local_id = %local_id,
            module = classification.screen(),
            category = classification.category.label(),
            "Dispatching request"
        );

        let mut in_flight = InFlight::new(self.store.clone(), local_id.clone());
        if let Err(e) = self.store.set_status(&local_id, SolicitationStatus::Processing) {
            in_flight.settle();
            return self.unexpected_store_failure(request_id, local_id, e, question, context);
        }

        let result = self.gateway.execute(&request_id, &payload).await;
        in_flight.settle();

        match result {
            Ok(reply) => {
                let answer = reply.answer();
                let tokens_used = reply.tokens_used();
                let response_time = reply.response_time();

                if let Err(e) = self
                    .store
                    .set_answer(&local_id, answer.clone(), tokens_used, response_time)
                {
                    error!(local_id = %local_id, error = %e, "Failed to record answer");
                }

                let reference = match reply.remote_id() {
                    Some(remote_id) => {
                        tracing::Span::current().record("remote_id", remote_id.as_str());
                        RequestRef::Confirmed(remote_id)
                    }
                    None => {
                        warn!(local_id = %local_id, "Assistant reply has no saved request id");
                        RequestRef::Pending(local_id.clone())
                    }
                };
                let category = reply
                    .detected_category()
                    .unwrap_or(classification.category.label())
                    .to_string();

                info!(
                    request_id = %request_id,
                    reference = reference.id(),
                    tokens_used,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Request answered"
                );

                DispatchOutcome::succeeded(
                    request_id,
                    reference,
                    answer,
                    tokens_used,
                    response_time,
                    category,
                    classification.subcategory,
                )
            }
            Err(e) => {
                self.mark_failed(&local_id);
                warn!(
                    request_id = %request_id,
                    local_id = %local_id,
                    kind = ?e.failure_kind(),
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Dispatch failed"
                );
                self.failure(request_id, local_id, &e, question, context)
            }
        }
    }

    /// Answer a pending assistant record offline with the local rules.
    #[instrument(skip(self))]
    pub fn process_locally(&self, local_id: &str) -> Result<Solicitation, AppError> {
        let record = self
            .store
            .get(local_id)
            .ok_or_else(|| StoreError::NotFound(local_id.to_string()))?;
        let details = record
            .assistant()
            .ok_or_else(|| StoreError::NotAssistant(local_id.to_string()))?;

        let context = details
            .context
            .as_ref()
            .map(|snapshot| snapshot.module.clone())
            .unwrap_or_default();
        let module = module_context::resolve(&context);
        let answer = fallback_answer(&details.question, &context, &module);
        let tokens_used = 2 * ComplexityDetector::word_count(&answer) as u64;

        self.store.set_status(local_id, SolicitationStatus::Processing)?;
        self.store
            .set_answer(local_id, answer, tokens_used, LOCAL_RESPONSE_TIME)?;
        info!(local_id, tokens_used, "Request answered locally");

        self.store
            .get(local_id)
            .ok_or_else(|| StoreError::NotFound(local_id.to_string()).into())
    }

    pub async fn check_health(&self) -> HealthStatus {
        self.gateway.health().await
    }

    fn mark_failed(&self, local_id: &str) {
        if let Err(e) = self.store.set_status(local_id, SolicitationStatus::Error) {
            error!(local_id, error = %e, "Failed to mark dispatch as failed");
        }
    }

    fn failure(
        &self,
        request_id: String,
        local_id: String,
        error: &DispatchError,
        question: &str,
        context: &ContextMap,
    ) -> DispatchOutcome {
        let module = module_context::resolve(context);
        DispatchOutcome::failed(
            request_id,
            Some(RequestRef::Pending(local_id)),
            DispatchFailure {
                kind: error.failure_kind(),
                message: error.user_message(),
                fallback_answer: fallback_answer(question, context, &module),
            },
        )
    }

    fn unexpected_store_failure(
        &self,
        request_id: String,
        local_id: String,
        error: StoreError,
        question: &str,
        context: &ContextMap,
    ) -> DispatchOutcome {
        error!(local_id = %local_id, error = %error, "Failed to start dispatch");
        let error = DispatchError::Unexpected(error.to_string());
        self.failure(request_id, local_id, &error, question, context)
    }
}
