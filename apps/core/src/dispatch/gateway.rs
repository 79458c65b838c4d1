use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::dispatch::messages::DispatchError;
use crate::dispatch::outcome::HealthStatus;
use crate::dispatch::traits::AssistantGateway;
use crate::dispatch::wire::{ExecutionPayload, ExecutionReply, FeedbackPayload, FeedbackReceipt};
use crate::error::AppError;

const REQUEST_SOURCE_HEADER: &str = "X-Request-Source";
const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Talks to the assistant service over HTTP.
pub struct HttpAssistantGateway {
    client: Client,
    config: AssistantConfig,
}

impl HttpAssistantGateway {
    pub fn new(config: AssistantConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.client_agent.clone())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn headers(&self, source: &str, request_id: Option<&str>) -> Result<HeaderMap, DispatchError> {
        let value = |text: &str| {
            HeaderValue::from_str(text)
                .map_err(|e| DispatchError::Unexpected(format!("invalid header value: {}", e)))
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(REQUEST_SOURCE_HEADER, value(source)?);
        if let Some(id) = request_id {
            headers.insert(REQUEST_ID_HEADER, value(id)?);
        }
        Ok(headers)
    }

    fn url(result: Result<url::Url, AppError>) -> Result<url::Url, DispatchError> {
        result.map_err(|e| DispatchError::Unexpected(e.to_string()))
    }
}

#[async_trait]
impl AssistantGateway for HttpAssistantGateway {
    async fn execute(
        &self,
        request_id: &str,
        payload: &ExecutionPayload,
    ) -> Result<ExecutionReply, DispatchError> {
        let url = Self::url(self.config.execute_url())?;
        let headers = self.headers(&self.config.request_source, Some(request_id))?;
        debug!(%url, request_id, "Sending request to assistant");

        let (status, body) = timeout(self.config.request_timeout, async {
            let res = self
                .client
                .post(url)
                .headers(headers)
                .json(payload)
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            Ok::<_, DispatchError>((status, body))
        })
        .await??;

        if status != StatusCode::OK {
            warn!(request_id, status = status.as_u16(), "Assistant rejected request");
            return Err(DispatchError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(request_id, error = %e, "Assistant reply is not valid JSON");
            DispatchError::Unexpected(format!("invalid reply: {}", e))
        })
    }

    async fn submit_feedback(
        &self,
        remote_id: &str,
        payload: &FeedbackPayload,
    ) -> Result<FeedbackReceipt, DispatchError> {
        let url = Self::url(self.config.feedback_url(remote_id))?;
        let headers = self.headers(&self.config.feedback_source, None)?;
        debug!(%url, remote_id, "Sending feedback to assistant");

        let (status, body) = timeout(self.config.request_timeout, async {
            let res = self
                .client
                .put(url)
                .headers(headers)
                .json(payload)
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Ok::<_, DispatchError>((status, body))
        })
        .await??;

        match status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => {
                Ok(FeedbackReceipt::from_body(status.as_u16(), &body))
            }
            _ => Err(DispatchError::RemoteRejected {
                status: status.as_u16(),
                body,
            }),
        }
    }

    async fn health(&self) -> HealthStatus {
        let url = match self.config.health_url() {
            Ok(url) => url,
            Err(e) => return HealthStatus::offline(e.to_string()),
        };

        let start = Instant::now();
        let probe = timeout(self.config.health_timeout, self.client.get(url).send()).await;
        let res = match probe {
            Ok(Ok(res)) => res,
            Ok(Err(e)) => return HealthStatus::offline(e.to_string()),
            Err(e) => return HealthStatus::offline(format!("Health check timed out: {}", e)),
        };
        let elapsed = start.elapsed().as_secs_f64();

        if res.status() != StatusCode::OK {
            return HealthStatus::error(res.status().as_u16());
        }

        let is_json = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        let service_info = if is_json {
            res.json().await.ok()
        } else {
            None
        };

        info!(response_time = elapsed, "Assistant is online");
        HealthStatus::online(elapsed, service_info)
    }
}
