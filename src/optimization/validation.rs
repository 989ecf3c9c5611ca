// src/optimization/validation.rs
use anyhow::Result;
use std::path::Path;
use tracing::warn;

use super::OptimizationError;
use crate::core::FsOps;
use crate::utils::{content_type_for, get_file_extension};

/// 10 MiB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// A CV picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct CvFile {
    pub name: String,
    /// MIME type as declared by whoever picked the file
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

impl CvFile {
    pub fn new(name: impl Into<String>, mime_type: Option<&str>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.map(str::to_string),
            data,
        }
    }

    /// Read a file from disk, declaring the MIME type its extension implies
    pub async fn from_path(path: &Path) -> Result<Self> {
        let data = FsOps::read_bytes(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cv")
            .to_string();
        let mime_type = content_type_for(&name).map(str::to_string);

        Ok(Self {
            name,
            mime_type,
            data,
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Content type to send: the declared one when allowed, else what the extension implies
    pub fn content_type(&self) -> &'static str {
        self.mime_type
            .as_deref()
            .and_then(|m| ALLOWED_MIME_TYPES.iter().copied().find(|allowed| *allowed == m))
            .or_else(|| content_type_for(&self.name))
            .unwrap_or("application/octet-stream")
    }
}

/// Type check (MIME, with the extension as fallback) and the size limit
pub fn validate_cv_file(file: &CvFile) -> Result<(), OptimizationError> {
    let mime_ok = file
        .mime_type
        .as_deref()
        .is_some_and(|m| ALLOWED_MIME_TYPES.contains(&m));
    let extension_ok = get_file_extension(&file.name)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    if !mime_ok && !extension_ok {
        warn!(
            "Rejected {}: type {:?} not allowed",
            file.name, file.mime_type
        );
        return Err(OptimizationError::InvalidFileType {
            file_name: file.name.clone(),
        });
    }

    if file.size() > MAX_FILE_SIZE {
        warn!(
            "Rejected {}: {:.1}MB exceeds limit",
            file.name,
            file.size() as f64 / 1024.0 / 1024.0
        );
        return Err(OptimizationError::FileTooLarge { size: file.size() });
    }

    Ok(())
}
