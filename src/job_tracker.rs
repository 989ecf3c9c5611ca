// src/job_tracker.rs
//! Local job application tracker, persisted as CSV.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::FsOps;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = JobTrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applied" => Ok(JobStatus::Applied),
            "interviewing" | "interview" => Ok(JobStatus::Interviewing),
            "offer" | "offers" => Ok(JobStatus::Offer),
            "rejected" => Ok(JobStatus::Rejected),
            other => Err(JobTrackerError::UnknownStatus(other.to_string())),
        }
    }
}

/// Tabs of the tracker page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobFilter {
    #[default]
    All,
    Applied,
    Interviewing,
    Offers,
}

impl JobFilter {
    pub fn matches(&self, status: JobStatus) -> bool {
        match self {
            JobFilter::All => true,
            JobFilter::Applied => status == JobStatus::Applied,
            JobFilter::Interviewing => status == JobStatus::Interviewing,
            JobFilter::Offers => status == JobStatus::Offer,
        }
    }
}

impl FromStr for JobFilter {
    type Err = JobTrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(JobFilter::All),
            "applied" => Ok(JobFilter::Applied),
            "interviewing" => Ok(JobFilter::Interviewing),
            "offers" | "offer" => Ok(JobFilter::Offers),
            other => Err(JobTrackerError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum JobTrackerError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("No application matches {0}")]
    NotFound(String),

    #[error("More than one application matches {0}")]
    Ambiguous(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct JobTracker {
    applications: Vec<JobApplication>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the tracker from `path`; a missing file is an empty tracker
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No job tracker at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job tracker: {}", path.display()))?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut applications = Vec::new();
        for record in reader.deserialize() {
            let application: JobApplication = record
                .with_context(|| format!("Invalid job tracker row in {}", path.display()))?;
            applications.push(application);
        }

        let mut tracker = Self { applications };
        tracker.sort();
        Ok(tracker)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            FsOps::ensure_dir_exists(parent).await?;
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for application in &self.applications {
            writer
                .serialize(application)
                .context("Failed to encode job application")?;
        }
        let data = writer
            .into_inner()
            .context("Failed to flush job tracker")?;

        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Failed to write job tracker: {}", path.display()))?;

        info!(
            "Saved {} job applications to {}",
            self.applications.len(),
            path.display()
        );
        Ok(())
    }

    pub fn add(
        &mut self,
        company: &str,
        position: &str,
        applied_on: NaiveDate,
        notes: Option<&str>,
    ) -> Result<&JobApplication, JobTrackerError> {
        let company = company.trim();
        let position = position.trim();
        if company.is_empty() {
            return Err(JobTrackerError::MissingField("Company"));
        }
        if position.is_empty() {
            return Err(JobTrackerError::MissingField("Position"));
        }

        let id = Uuid::new_v4();
        self.applications.push(JobApplication {
            id,
            company: company.to_string(),
            position: position.to_string(),
            status: JobStatus::Applied,
            applied_on,
            notes: notes.unwrap_or_default().trim().to_string(),
        });
        self.sort();

        info!("Tracking application {} at {}", position, company);
        self.get(id).ok_or_else(|| JobTrackerError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: Uuid) -> Option<&JobApplication> {
        self.applications.iter().find(|a| a.id == id)
    }

    /// Id of the single application whose id starts with `prefix`
    pub fn resolve(&self, prefix: &str) -> Result<Uuid, JobTrackerError> {
        let prefix = prefix.trim().to_lowercase();
        let mut matches = self
            .applications
            .iter()
            .filter(|a| !prefix.is_empty() && a.id.to_string().starts_with(&prefix));

        match (matches.next(), matches.next()) {
            (Some(application), None) => Ok(application.id),
            (Some(_), Some(_)) => Err(JobTrackerError::Ambiguous(prefix)),
            _ => Err(JobTrackerError::NotFound(prefix)),
        }
    }

    pub fn update_status(&mut self, id: Uuid, status: JobStatus) -> Result<(), JobTrackerError> {
        let application = self
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| JobTrackerError::NotFound(id.to_string()))?;

        debug!("{}: {} -> {}", application.company, application.status, status);
        application.status = status;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> Result<JobApplication, JobTrackerError> {
        let index = self
            .applications
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| JobTrackerError::NotFound(id.to_string()))?;
        Ok(self.applications.remove(index))
    }

    /// Applications shown under `filter`, most recent first
    pub fn filter(&self, filter: JobFilter) -> Vec<&JobApplication> {
        self.applications
            .iter()
            .filter(|a| filter.matches(a.status))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    fn sort(&mut self) {
        self.applications
            .sort_by(|a, b| b.applied_on.cmp(&a.applied_on));
    }
}
