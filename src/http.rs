//! # HTTP Fetcher Module
//!
//! Thin wrapper around `reqwest` shared by the card database and pricing
//! collaborators. Every request carries the configured timeout and passes
//! through the service's circuit breaker.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::ServiceConfig;
use crate::errors::BotError;

const USER_AGENT: &str = concat!("cardbot/", env!("CARGO_PKG_VERSION"));

/// HTTP client bound to one named external service
pub struct HttpFetcher {
    client: Client,
    breaker: CircuitBreaker,
    service: &'static str,
}

impl HttpFetcher {
    pub fn new(service: &'static str, config: &ServiceConfig) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BotError::external(service, e.to_string()))?;

        Ok(Self {
            client,
            breaker: CircuitBreaker::new(config),
            service,
        })
    }

    /// GET a page and return its body, treating non-success statuses as failures
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, BotError> {
        match self.get(url, query).await? {
            (status, body) if status.is_success() => Ok(body),
            (status, _) => Err(BotError::external(
                self.service,
                format!("unexpected status {status} for {url}"),
            )),
        }
    }

    /// GET a page that may legitimately not exist; `404` is reported as `None`
    pub async fn get_optional_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<String>, BotError> {
        match self.get(url, query).await? {
            (StatusCode::NOT_FOUND, _) => Ok(None),
            (status, body) if status.is_success() => Ok(Some(body)),
            (status, _) => Err(BotError::external(
                self.service,
                format!("unexpected status {status} for {url}"),
            )),
        }
    }

    /// GET a JSON document; `404`/`400` answers are reported as `None`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, BotError> {
        let (status, body) = self.get(url, query).await?;

        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            debug!(service = self.service, url, %status, "Service reported no such resource");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(BotError::external(
                self.service,
                format!("unexpected status {status} for {url}"),
            ));
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| BotError::external(self.service, format!("invalid JSON: {e}")))
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<(StatusCode, String), BotError> {
        if self.breaker.is_open() {
            warn!(service = self.service, "Circuit breaker open, failing fast");
            return Err(BotError::ServiceUnavailable {
                service: self.service.to_string(),
            });
        }

        let result = self.send(url, query).await;
        match &result {
            Ok((status, _)) if status.is_server_error() => self.breaker.record_failure(),
            Ok(_) => self.breaker.record_success(),
            Err(e) if e.is_service_failure() => self.breaker.record_failure(),
            Err(_) => {}
        }
        result
    }

    async fn send(&self, url: &str, query: &[(&str, String)]) -> Result<(StatusCode, String), BotError> {
        debug!(service = self.service, url, params = query.len(), "Sending request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok((status, body))
    }

    fn classify(&self, err: reqwest::Error) -> BotError {
        if err.is_timeout() {
            BotError::Timeout {
                service: self.service.to_string(),
            }
        } else {
            BotError::external(self.service, err.to_string())
        }
    }
}
