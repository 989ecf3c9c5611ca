// src/types/mod.rs
//! Wire types shared with the remote API

pub mod auth;
pub mod optimization;

pub use auth::{AuthResponse, AuthSession, RegisterRequest, Role};
pub use optimization::OptimizationResult;
