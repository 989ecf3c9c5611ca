// src/optimization/pipeline.rs
//! UI state of the CV optimization page.
//!
//! All state changes go through [`OptimizationStatus::transition`], driven by
//! [`PipelineEvent`]s. The upload runs as a future while progress arrives on a
//! channel; the pipeline folds both into [`OptimizationState`].

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::progress::UPLOAD_SHARE;
use super::service::OptimizationService;
use super::validation::{validate_cv_file, CvFile};
use super::OptimizationError;
use crate::types::optimization::OptimizationResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptimizationStatus {
    #[default]
    Idle,
    Uploading,
    Processing,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Started,
    /// Overall progress, 0 to 50 during the upload
    UploadProgress(u8),
    Succeeded(Box<OptimizationResult>),
    Failed(String),
    Reset,
}

impl OptimizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationStatus::Idle => "idle",
            OptimizationStatus::Uploading => "uploading",
            OptimizationStatus::Processing => "processing",
            OptimizationStatus::Success => "success",
            OptimizationStatus::Error => "error",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            OptimizationStatus::Uploading | OptimizationStatus::Processing
        )
    }

    /// Next status for `event`, or `None` when the event does not apply here
    pub fn transition(self, event: &PipelineEvent) -> Option<Self> {
        use OptimizationStatus::*;

        match (self, event) {
            (_, PipelineEvent::Reset) => Some(Idle),
            (Idle | Success | Error, PipelineEvent::Started) => Some(Uploading),
            (Uploading, PipelineEvent::UploadProgress(p)) if *p >= UPLOAD_SHARE => Some(Processing),
            (Uploading, PipelineEvent::UploadProgress(_)) => Some(Uploading),
            (Processing, PipelineEvent::UploadProgress(_)) => Some(Processing),
            (Uploading | Processing, PipelineEvent::Succeeded(_)) => Some(Success),
            (Uploading | Processing, PipelineEvent::Failed(_)) => Some(Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizationState {
    pub status: OptimizationStatus,
    /// 0 to 100
    pub progress: u8,
    pub result: Option<OptimizationResult>,
    pub error: Option<String>,
}

impl OptimizationState {
    /// Apply `event`. Returns false, leaving the state untouched, when it does not apply.
    pub fn apply(&mut self, event: PipelineEvent) -> bool {
        let Some(next) = self.status.transition(&event) else {
            debug!("Ignoring {:?} while {}", event, self.status);
            return false;
        };

        match event {
            PipelineEvent::Reset => {
                *self = OptimizationState::default();
                return true;
            }
            PipelineEvent::Started => {
                self.progress = 0;
                self.error = None;
                self.result = None;
            }
            PipelineEvent::UploadProgress(percent) => {
                self.progress = self.progress.max(percent.min(UPLOAD_SHARE));
            }
            PipelineEvent::Succeeded(result) => {
                self.progress = 100;
                self.result = Some(*result);
                self.error = None;
            }
            PipelineEvent::Failed(message) => {
                self.progress = 0;
                self.error = Some(message);
            }
        }

        self.status = next;
        true
    }
}

/// Apply an event and let the observer see the outcome
fn step<F>(state: &mut OptimizationState, event: PipelineEvent, observer: &mut F)
where
    F: FnMut(&OptimizationState),
{
    if state.apply(event) {
        observer(state);
    }
}

pub struct OptimizationPipeline {
    service: OptimizationService,
    state: OptimizationState,
    file: Option<CvFile>,
}

impl OptimizationPipeline {
    pub fn new(service: OptimizationService) -> Self {
        Self {
            service,
            state: OptimizationState::default(),
            file: None,
        }
    }

    pub fn state(&self) -> &OptimizationState {
        &self.state
    }

    pub fn status(&self) -> OptimizationStatus {
        self.state.status
    }

    pub fn progress(&self) -> u8 {
        self.state.progress
    }

    pub fn result(&self) -> Option<&OptimizationResult> {
        self.state.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn selected_file(&self) -> Option<&CvFile> {
        self.file.as_ref()
    }

    /// Replace the pending selection and start over from Idle
    pub fn select_file(&mut self, file: CvFile) {
        debug!("Selected {} ({} bytes)", file.name, file.size());
        self.state = OptimizationState::default();
        self.file = Some(file);
    }

    pub fn remove_file(&mut self) {
        self.file = None;
        self.state = OptimizationState::default();
    }

    pub async fn optimize(&mut self) -> Result<OptimizationResult, OptimizationError> {
        self.optimize_with(|_| {}).await
    }

    /// Run the selected file through validation, upload and server processing.
    /// `observer` sees every state change as it happens.
    pub async fn optimize_with<F>(
        &mut self,
        mut observer: F,
    ) -> Result<OptimizationResult, OptimizationError>
    where
        F: FnMut(&OptimizationState),
    {
        let Some(file) = self.file.as_ref() else {
            let err = OptimizationError::NoFileSelected;
            self.state.error = Some(err.to_string());
            observer(&self.state);
            return Err(err);
        };

        step(&mut self.state, PipelineEvent::Started, &mut observer);

        if let Err(err) = validate_cv_file(file) {
            step(
                &mut self.state,
                PipelineEvent::Failed(err.to_string()),
                &mut observer,
            );
            return Err(err);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let upload = self.service.optimize_cv(file, tx);
        tokio::pin!(upload);

        let outcome = loop {
            tokio::select! {
                outcome = &mut upload => break outcome,
                Some(progress) = rx.recv() => {
                    step(
                        &mut self.state,
                        PipelineEvent::UploadProgress(progress.percent()),
                        &mut observer,
                    );
                }
            }
        };

        // progress sent just before completion
        while let Ok(progress) = rx.try_recv() {
            step(
                &mut self.state,
                PipelineEvent::UploadProgress(progress.percent()),
                &mut observer,
            );
        }

        match outcome {
            Ok(result) => {
                info!("Optimization of {} succeeded", file.name);
                step(
                    &mut self.state,
                    PipelineEvent::Succeeded(Box::new(result.clone())),
                    &mut observer,
                );
                Ok(result)
            }
            Err(err) => {
                warn!("Optimization of {} failed: {}", file.name, err);
                step(
                    &mut self.state,
                    PipelineEvent::Failed(err.to_string()),
                    &mut observer,
                );
                Err(err)
            }
        }
    }

    /// Save the optimized document of the current result under `dest_dir`.
    /// A failure lands in `error()` and leaves the status untouched.
    pub async fn download(&mut self, dest_dir: &Path) -> Result<PathBuf, OptimizationError> {
        let outcome = match self.state.result.as_ref() {
            Some(result) => match result.download_link() {
                Some(url) => {
                    self.service
                        .download(url, result.file_name.as_deref(), dest_dir)
                        .await
                }
                None => Err(OptimizationError::NoDownloadAvailable),
            },
            None => Err(OptimizationError::NoDownloadAvailable),
        };

        match outcome {
            Ok(path) => {
                self.state.error = None;
                Ok(path)
            }
            Err(err) => {
                warn!("Download failed: {}", err);
                self.state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        self.file = None;
        self.state.apply(PipelineEvent::Reset);
    }

    /// Show a result that was fetched some other way (by id)
    pub fn set_result(&mut self, result: OptimizationResult) {
        self.state = OptimizationState {
            status: OptimizationStatus::Success,
            progress: 100,
            result: Some(result),
            error: None,
        };
    }

    pub fn is_idle(&self) -> bool {
        self.state.status == OptimizationStatus::Idle
    }

    pub fn is_uploading(&self) -> bool {
        self.state.status == OptimizationStatus::Uploading
    }

    pub fn is_processing(&self) -> bool {
        self.state.status == OptimizationStatus::Processing
    }

    pub fn is_loading(&self) -> bool {
        self.state.status.is_loading()
    }

    pub fn is_success(&self) -> bool {
        self.state.status == OptimizationStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.state.status == OptimizationStatus::Error
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn has_result(&self) -> bool {
        self.state.result.is_some()
    }

    pub fn status_message(&self) -> Option<&'static str> {
        status_message(self.state.status)
    }
}

pub fn status_message(status: OptimizationStatus) -> Option<&'static str> {
    match status {
        OptimizationStatus::Uploading => Some("Uploading your CV..."),
        OptimizationStatus::Processing => Some("Analyzing and optimizing your CV..."),
        _ => None,
    }
}
