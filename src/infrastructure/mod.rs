//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The Alloy-based wallet boundary implementation (signing + confirmation)
//! - The Tokio runtime bridge that keeps the TUI thread non-blocking

pub mod runtime;
pub mod wallet;
