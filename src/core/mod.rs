// src/core/mod.rs
//! Transport and file plumbing shared by the feature services

pub mod fs_ops;
pub mod http_client;

pub use fs_ops::FsOps;
pub use http_client::HttpClient;
