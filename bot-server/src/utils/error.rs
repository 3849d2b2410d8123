//! Unified error handling
//!
//! One application error enum covering the whole taxonomy:
//!
//! | Variant | Meaning | Recovery |
//! |---------|---------|----------|
//! | `Validation` | bad user input (phone, short text) | re-prompt, no state advance |
//! | `Store` | record store unavailable / write failed | abort transition, report inline |
//! | `Gateway` | chat send/edit failed | log and keep going (downstream policy) |
//! | `NotFound` | complaint id not in the store | report inline |
//! | `Forbidden` | admin-only surface | report inline |
//! | `Internal` | everything else | log, keep serving |
//!
//! No error here ever terminates the process; the dispatch loop catches and
//! logs per event, the scheduler per iteration.

use thiserror::Error;

/// Application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias used throughout the server
pub type AppResult<T> = Result<T, AppError>;

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for failures of the durable record store (the only failures
    /// that abort a lifecycle transition).
    pub fn is_store(&self) -> bool {
        matches!(self, AppError::Store(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Gateway(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {e}"))
    }
}
