use crate::{
    config::Config,
    constants::HEALTH_PATH,
    errors::{AskmeError, AskmeResult},
    logging::log_api_call,
    models::{ApiCallLog, AskRequest, AskResponse, HealthStatus},
};
use chrono::Utc;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

/// Client for the question-answering service.
#[derive(Debug, Clone)]
pub struct AskClient {
    client: Client,
    endpoint: Url,
}

impl AskClient {
    pub fn new(endpoint: &str, timeout: Duration) -> AskmeResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AskmeError::config_error(format!("Invalid endpoint URL: {}", e)))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config(config: &Config) -> AskmeResult<Self> {
        Self::new(&config.endpoint, config.request_timeout())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts `question` and returns the service's answer.
    ///
    /// Transport failures, non-2xx statuses and bodies without a string
    /// `answer` field are all errors.
    pub async fn ask(&self, question: &str) -> AskmeResult<String> {
        let start_time = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AskRequest { question })
            .send()
            .await?;

        let status = response.status();
        log_api_call(&ApiCallLog {
            timestamp: Utc::now(),
            endpoint: self.endpoint.to_string(),
            request_summary: format!("ask ({} chars)", question.chars().count()),
            response_status: status.as_u16(),
            response_time_ms: start_time.elapsed().as_millis(),
        });

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AskmeError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: AskResponse = serde_json::from_str(&body)
            .map_err(|e| AskmeError::malformed(format!("{} in body {:?}", e, truncate(&body))))?;

        Ok(parsed.answer)
    }

    /// Probes the service's health route on the endpoint's origin.
    pub async fn health(&self) -> AskmeResult<HealthStatus> {
        let url = self
            .endpoint
            .join(HEALTH_PATH)
            .map_err(|e| AskmeError::config_error(format!("Invalid health URL: {}", e)))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AskmeError::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AskmeError::malformed(e.to_string()))
    }
}

fn truncate(body: &str) -> String {
    const LIMIT: usize = 120;
    if body.chars().count() > LIMIT {
        format!("{}...", body.chars().take(LIMIT).collect::<String>())
    } else {
        body.to_string()
    }
}
