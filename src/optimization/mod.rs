// src/optimization/mod.rs
//! CV upload, optimization and result handling

pub mod pipeline;
pub mod progress;
pub mod service;
pub mod validation;

pub use pipeline::{OptimizationPipeline, OptimizationState, OptimizationStatus, PipelineEvent};
pub use progress::{upload_percent, UploadProgress};
pub use service::OptimizationService;
pub use validation::{validate_cv_file, CvFile, MAX_FILE_SIZE};

use thiserror::Error;

use crate::errors::ApiError;

pub const DEFAULT_DOWNLOAD_NAME: &str = "optimized-cv.docx";

/// Failures of the optimization workflow. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum OptimizationError {
    #[error("Please select a file first")]
    NoFileSelected,

    #[error("Invalid file type. Please upload a PDF or Word document.")]
    InvalidFileType { file_name: String },

    #[error("File size exceeds 10MB limit.")]
    FileTooLarge { size: u64 },

    #[error("Please login to use CV optimization.")]
    Unauthorized,

    #[error("Request timed out. Please try again.")]
    Timeout,

    #[error("Network error. Please check your connection.")]
    Network,

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to parse server response")]
    InvalidResponse,

    #[error("Failed to fetch optimization result")]
    FetchFailed { status: Option<u16> },

    #[error("No download available")]
    NoDownloadAvailable,

    #[error("Failed to download file")]
    DownloadFailed { status: Option<u16> },

    #[error("Failed to save the optimized CV: {0}")]
    Save(String),
}

impl OptimizationError {
    /// Map a failed optimize call onto the messages the upload screen shows
    pub fn from_upload(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => OptimizationError::Unauthorized,
            ApiError::Timeout => OptimizationError::Timeout,
            ApiError::Network(_) => OptimizationError::Network,
            ApiError::Decode(_) => OptimizationError::InvalidResponse,
            other => {
                let status = other.status().unwrap_or_default();
                let message = other
                    .server_message()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or("Failed to optimize CV")
                    .to_string();
                OptimizationError::Rejected { status, message }
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OptimizationError::InvalidFileType { .. } | OptimizationError::FileTooLarge { .. }
        )
    }
}
