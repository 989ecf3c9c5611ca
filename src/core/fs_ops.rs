// src/core/fs_ops.rs
//! File system helpers for downloads and local CV files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
        fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write `data` as `dir/file_name`, creating `dir` if needed
    pub async fn write_into(dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        Self::ensure_dir_exists(dir).await?;

        let target = dir.join(file_name);
        fs::write(&target, data)
            .await
            .with_context(|| format!("Failed to write file: {}", target.display()))?;

        info!("Written file: {} ({} bytes)", target.display(), data.len());
        Ok(target)
    }
}
