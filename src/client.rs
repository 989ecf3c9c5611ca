// src/client.rs
//! One place that builds the shared token store, HTTP client and feature services.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::auth::AuthService;
use crate::config::ClientConfig;
use crate::core::HttpClient;
use crate::job_tracker::JobTracker;
use crate::optimization::{OptimizationPipeline, OptimizationService};
use crate::session::{FileBackend, SessionBackend, TokenStore};

pub struct MasarClient {
    config: ClientConfig,
    tokens: Arc<TokenStore>,
    http: Arc<HttpClient>,
    auth: AuthService,
    optimization: OptimizationService,
}

impl MasarClient {
    /// Client whose session lives in the configured session file
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = FileBackend::open(&config.session_path).with_context(|| {
            format!("Failed to open session file {}", config.session_path.display())
        })?;
        Self::with_backend(config, Arc::new(backend))
    }

    pub fn with_backend(config: ClientConfig, backend: Arc<dyn SessionBackend>) -> Result<Self> {
        let tokens = Arc::new(TokenStore::new(backend));
        let http = Arc::new(HttpClient::new(&config.api, Arc::clone(&tokens))?);

        let auth = AuthService::new(Arc::clone(&http));
        let optimization = OptimizationService::new(
            Arc::clone(&http),
            Duration::from_secs(config.api.upload_timeout_seconds),
        );

        info!("Client ready for {}", http.base_url());

        Ok(Self {
            config,
            tokens,
            http,
            auth,
            optimization,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn optimization(&self) -> &OptimizationService {
        &self.optimization
    }

    /// Fresh optimization page state
    pub fn pipeline(&self) -> OptimizationPipeline {
        OptimizationPipeline::new(self.optimization.clone())
    }

    pub async fn load_jobs(&self) -> Result<JobTracker> {
        JobTracker::load(&self.config.jobs_path).await
    }

    pub async fn save_jobs(&self, tracker: &JobTracker) -> Result<()> {
        tracker.save(&self.config.jobs_path).await
    }
}
