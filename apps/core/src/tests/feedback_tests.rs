//! Feedback Tests
//!
//! Feedback submission against a mock assistant service.

use crate::config::AssistantConfig;
use crate::dispatch::outcome::FEEDBACK_STORED_LOCALLY;
use crate::dispatch::{DispatcherHandle, FeedbackSubmitter, HttpAssistantGateway};
use crate::models::{FeedbackSubmission, OriginalResultContext};
use crate::solicitations::SolicitationStore;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn submitter(config: AssistantConfig) -> FeedbackSubmitter<HttpAssistantGateway> {
    let gateway = Arc::new(HttpAssistantGateway::new(config.clone()).unwrap());
    FeedbackSubmitter::new(gateway, &config)
}

#[tokio::test]
async fn test_five_star_feedback_is_sent() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/solicitacoes/R1/feedback"))
        .and(header("X-Request-Source", "mock_erp_feedback"))
        .and(body_partial_json(json!({
            "avaliacao_usuario": 5,
            "feedback_texto": "Perfeito",
            "usuario_satisfeito": true,
            "resolveu_problema": true,
            "precisou_escalacao": false,
            "origem_feedback": "mock_erp_dashboard",
            "contexto_original": {"request_id": "REQ-1", "categoria": "sales"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "F1"})))
        .expect(1)
        .mount(&server)
        .await;
    let submission = FeedbackSubmission::new("R1", 5, "Perfeito").with_original(
        OriginalResultContext::from_response_data(&json!({
            "request": {"requestId": "REQ-1"},
            "result": {"categoria": "sales", "tokens_used": 10, "response_time": 0.5}
        })),
    );

    // Act
    let outcome = submitter(AssistantConfig::for_base_url(&server.uri()).unwrap())
        .submit(&submission)
        .await;

    // Assert
    assert!(outcome.success);
    assert_eq!(outcome.message, "Feedback enviado com sucesso");
    assert_eq!(outcome.status_code, Some(201));
    assert_eq!(outcome.feedback_id.as_deref(), Some("F1"));
    assert_eq!(outcome.fallback_message, None);
}

#[tokio::test]
async fn test_no_content_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/solicitacoes/R2/feedback"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let outcome = submitter(AssistantConfig::for_base_url(&server.uri()).unwrap())
        .submit(&FeedbackSubmission::new("R2", 1, "não resolveu"))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.status_code, Some(204));
    assert_eq!(outcome.feedback_id, None);
}

#[tokio::test]
async fn test_rejected_feedback_is_stored_locally() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let outcome = submitter(AssistantConfig::for_base_url(&server.uri()).unwrap())
        .submit(&FeedbackSubmission::new("R404", 3, ""))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.status_code, Some(404));
    assert_eq!(outcome.error.as_deref(), Some("Erro ao enviar feedback: 404 - not found"));
    assert_eq!(outcome.fallback_message.as_deref(), Some(FEEDBACK_STORED_LOCALLY));
}

#[tokio::test]
async fn test_invalid_rating_never_leaves_the_process() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let submitter = submitter(AssistantConfig::for_base_url(&server.uri()).unwrap());

    for rating in [0, 6, -1] {
        let outcome = submitter.submit(&FeedbackSubmission::new("R1", rating, "")).await;

        assert!(!outcome.success, "Expected rejection for rating {}", rating);
        assert_eq!(outcome.fallback_message.as_deref(), Some(FEEDBACK_STORED_LOCALLY));
    }
}

#[tokio::test]
async fn test_unreachable_feedback_service() {
    let outcome = submitter(AssistantConfig::for_base_url("http://127.0.0.1:1").unwrap())
        .submit(&FeedbackSubmission::new("R1", 4, ""))
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Serviço de feedback indisponível"));
    assert_eq!(outcome.fallback_message.as_deref(), Some(FEEDBACK_STORED_LOCALLY));
}

#[tokio::test]
async fn test_slow_feedback_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    let config = AssistantConfig::for_base_url(&server.uri())
        .unwrap()
        .with_request_timeout(Duration::from_millis(200));

    let outcome = submitter(config)
        .submit(&FeedbackSubmission::new("R1", 4, ""))
        .await;

    assert_eq!(
        outcome.error.as_deref(),
        Some("Timeout na conexão com o serviço de feedback")
    );
}

#[tokio::test]
async fn test_feedback_through_handle() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/solicitacoes/77/feedback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .mount(&server)
        .await;
    let config = AssistantConfig::for_base_url(&server.uri()).unwrap();
    let handle = DispatcherHandle::new(&config, Arc::new(SolicitationStore::new())).unwrap();

    let outcome = handle
        .submit_feedback(FeedbackSubmission::new("77", 4, "bom"))
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.feedback_id.as_deref(), Some("9"));
}
