// src/optimization/service.rs
//! HTTP calls of the CV optimization feature

use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use super::progress::{progress_body, UploadProgress};
use super::validation::{validate_cv_file, CvFile};
use super::{OptimizationError, DEFAULT_DOWNLOAD_NAME};
use crate::core::{FsOps, HttpClient};
use crate::errors::{log_error, ApiError};
use crate::types::optimization::OptimizationResult;
use crate::utils::safe_file_name;

pub const OPTIMIZE_ENDPOINT: &str = "/api/cv/optimize";
pub const OPTIMIZATIONS_ENDPOINT: &str = "/api/cv/optimizations";

#[derive(Clone)]
pub struct OptimizationService {
    http: Arc<HttpClient>,
    upload_timeout: Duration,
}

impl OptimizationService {
    pub fn new(http: Arc<HttpClient>, upload_timeout: Duration) -> Self {
        Self {
            http,
            upload_timeout,
        }
    }

    /// Validate, then upload `file` as multipart field `file`.
    /// Byte progress goes to `progress` while the body is streamed.
    pub async fn optimize_cv(
        &self,
        file: &CvFile,
        progress: UnboundedSender<UploadProgress>,
    ) -> Result<OptimizationResult, OptimizationError> {
        validate_cv_file(file)?;

        let part = Part::stream_with_length(progress_body(file.data.clone(), progress), file.size())
            .file_name(file.name.clone())
            .mime_str(file.content_type())
            .map_err(|_| OptimizationError::InvalidFileType {
                file_name: file.name.clone(),
            })?;
        let form = Form::new().part("file", part);

        info!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.size(),
            OPTIMIZE_ENDPOINT
        );

        let request = self
            .http
            .post(OPTIMIZE_ENDPOINT)
            .multipart(form)
            .timeout(self.upload_timeout);

        let response = self.http.execute(request).await.map_err(|e| {
            log_error("cvOptimization.optimize", &e);
            OptimizationError::from_upload(e)
        })?;

        let result: OptimizationResult = HttpClient::read_json(response)
            .await
            .map_err(|e| {
                log_error("cvOptimization.optimize", &e);
                OptimizationError::from_upload(e)
            })?;

        info!(
            "Optimization {:?} finished with score {:?}",
            result.optimization_id, result.quality_score
        );
        Ok(result)
    }

    /// Reopen a stored optimization
    pub async fn get_optimization(
        &self,
        optimization_id: i64,
    ) -> Result<OptimizationResult, OptimizationError> {
        let endpoint = format!("{}/{}", OPTIMIZATIONS_ENDPOINT, optimization_id);

        self.http
            .get_json(&endpoint)
            .await
            .map_err(|e: ApiError| {
                log_error("cvOptimization.getOptimizationById", &e);
                OptimizationError::FetchFailed { status: e.status() }
            })
    }

    /// Fetch the optimized document and save it under `dest_dir`
    pub async fn download(
        &self,
        download_url: &str,
        file_name: Option<&str>,
        dest_dir: &Path,
    ) -> Result<PathBuf, OptimizationError> {
        let bytes = self.http.get_bytes(download_url).await.map_err(|e| {
            log_error("cvOptimization.download", &e);
            OptimizationError::DownloadFailed { status: e.status() }
        })?;

        let name = safe_file_name(
            file_name.unwrap_or(DEFAULT_DOWNLOAD_NAME),
            DEFAULT_DOWNLOAD_NAME,
        );

        FsOps::write_into(dest_dir, &name, &bytes).await.map_err(|e| {
            error!("Saving {} failed: {:#}", name, e);
            OptimizationError::Save(e.to_string())
        })
    }
}
