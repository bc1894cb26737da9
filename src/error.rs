//! Error types for Canopy operations.
//!
//! This module defines [`CanopyError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Step functions return `CanopyError` (or anything convertible via
//!   `CanopyError::Other`) to signal a failed attempt
//! - The orchestrator never lets an error cross the `run()` boundary; every
//!   error class ends up as a field on the returned record instead

use thiserror::Error;

/// Core error type for Canopy operations.
#[derive(Debug, Error)]
pub enum CanopyError {
    /// The caller-supplied input could not be shaped into a context.
    #[error("Context initialization failed: {message}")]
    ContextInit { message: String },

    /// Final result aggregation failed.
    #[error("Result aggregation failed: {message}")]
    Aggregation { message: String },

    /// A step function reported a failure.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// JSON serialization error wrapper.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Canopy operations.
pub type Result<T> = std::result::Result<T, CanopyError>;
