// src/optimization/progress.rs
//! Upload progress: a request body that reports bytes as the transport pulls them.

use futures_util::{stream, StreamExt};
use tokio::sync::mpsc::UnboundedSender;

/// Share of the overall bar given to the byte upload; the rest is server processing
pub const UPLOAD_SHARE: u8 = 50;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Overall percentage for this many bytes sent
    pub fn percent(&self) -> u8 {
        upload_percent(self.sent, self.total)
    }
}

/// Map bytes sent onto 0..=50 of the overall progress
pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return UPLOAD_SHARE;
    }
    let fraction = (sent.min(total) as f64) / (total as f64);
    (fraction * UPLOAD_SHARE as f64).round() as u8
}

/// Wrap `data` in a streaming body that sends an `UploadProgress` per chunk read.
/// A closed receiver is ignored; the upload carries on.
pub fn progress_body(data: Vec<u8>, tx: UnboundedSender<UploadProgress>) -> reqwest::Body {
    let total = data.len() as u64;
    let chunks: Vec<Vec<u8>> = data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();

    let mut sent = 0u64;
    let body = stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        let _ = tx.send(UploadProgress { sent, total });
        Ok::<_, std::io::Error>(chunk)
    });

    reqwest::Body::wrap_stream(body)
}
