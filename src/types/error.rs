//! Unified Error Type System
//!
//! Centralized error type for the whole crate.
//!
//! ## Error Classes
//!
//! - **Fatal**: setup failures that abort the selected mode (invalid seed URL,
//!   invalid root directory, failed clone, bad configuration)
//! - **Per-item**: a single page, directory or file failed; the traversal
//!   logs it and moves on
//!
//! Degraded content (binary or oversized files) is never an error; it is
//! represented by markers in [`crate::types::FileContent`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    // -------------------------------------------------------------------------
    // Setup Errors
    // -------------------------------------------------------------------------
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Not a directory: {}", path.display())]
    InvalidRoot { path: PathBuf },

    #[error("Failed to clone repository {url}: {message}")]
    Clone { url: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Per-item Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

pub type Result<T> = std::result::Result<T, DigestError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl DigestError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error aborts the whole run rather than a single item
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. }
                | Self::InvalidRoot { .. }
                | Self::Clone { .. }
                | Self::Config(_)
                | Self::Toml(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
