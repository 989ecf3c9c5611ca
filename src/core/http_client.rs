// src/core/http_client.rs
//! Shared HTTP client: bearer token on every request, forced logout on 401.

use anyhow::{Context, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{trace, warn};

use crate::config::ApiConfig;
use crate::errors::ApiError;
use crate::session::TokenStore;
use crate::utils::join_url;

pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenStore>,
}

impl HttpClient {
    /// Create new HTTP client with configuration
    pub fn new(config: &ApiConfig, tokens: Arc<TokenStore>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Absolute URL for an endpoint; absolute URLs pass through
    pub fn url(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }

    pub fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client.get(self.url(endpoint))
    }

    pub fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client.post(self.url(endpoint))
    }

    /// Send a request once. Non-2xx becomes an `ApiError`; a 401 also clears the session first.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.tokens.auth_header() {
            Some(header) => request.header(AUTHORIZATION, header),
            None => request,
        };

        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        trace!("{} -> {}", response.url(), status);

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            warn!("Received 401 from {}, clearing session", response.url());
            self.tokens.clear();
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }

    /// POST with a JSON body, decode the JSON answer
    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, ApiError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(self.post(endpoint).json(payload)).await?;
        Self::read_json(response).await
    }

    /// GET and decode the JSON answer
    pub async fn get_json<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let response = self.execute(self.get(endpoint)).await?;
        Self::read_json(response).await
    }

    /// GET raw bytes (file downloads)
    pub async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(self.get(endpoint)).await?;
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;
        Ok(bytes.to_vec())
    }

    /// Decode a JSON body; an empty body decodes as `null`
    pub async fn read_json<R>(response: Response) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let text = response.text().await.map_err(ApiError::from_reqwest)?;
        let text = if text.trim().is_empty() { "null" } else { &text };

        serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
