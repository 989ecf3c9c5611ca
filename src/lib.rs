// src/lib.rs
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod errors;
pub mod job_tracker;
pub mod optimization;
pub mod presentation;
pub mod session;
pub mod types;
pub mod utils;

pub use client::MasarClient;
pub use config::{ApiConfig, ClientConfig};
pub use errors::{ApiError, ErrorKind};
pub use optimization::{OptimizationPipeline, OptimizationStatus};
pub use session::TokenStore;
