//! # Error Types
//!
//! Structured error types for windcalc_core.
//!
//! Only genuine input problems and explicitly configured hard stops become
//! errors. Recoverable ambiguity (unknown legacy labels, wind speeds beyond a
//! table, missing footing data in lenient mode) is reported through the
//! diagnostics lists on each result, and structural inadequacy is expressed
//! purely through the GREEN / YELLOW / RED status.
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_height(height_ft: f64) -> CalcResult<()> {
//!     if height_ft <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "height_total_ft",
//!             height_ft.to_string(),
//!             "Height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for windcalc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Exposure category is not one of B, C, D
    #[error("Invalid exposure category '{value}': expected B, C, or D")]
    InvalidExposure { value: String },

    /// Risk category is not one of I, II, III, IV
    #[error("Invalid risk category '{value}': expected I, II, III, or IV")]
    InvalidRiskCategory { value: String },

    /// Post record has no footing defaults and strict footing mode is on
    #[error("Footing data missing for post '{post_key}' (strict footing mode)")]
    MissingFootingData { post_key: String },

    /// Post key not present in the catalog
    #[error("Post not found in catalog: {post_key}")]
    PostNotFound { post_key: String },

    /// File I/O error (settings, spacing tables, CLI input)
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidExposure error
    pub fn invalid_exposure(value: impl Into<String>) -> Self {
        CalcError::InvalidExposure { value: value.into() }
    }

    /// Create an InvalidRiskCategory error
    pub fn invalid_risk_category(value: impl Into<String>) -> Self {
        CalcError::InvalidRiskCategory { value: value.into() }
    }

    /// Create a MissingFootingData error
    pub fn missing_footing_data(post_key: impl Into<String>) -> Self {
        CalcError::MissingFootingData {
            post_key: post_key.into(),
        }
    }

    /// Create a PostNotFound error
    pub fn post_not_found(post_key: impl Into<String>) -> Self {
        CalcError::PostNotFound {
            post_key: post_key.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller can correct the input and retry.
    ///
    /// Configuration-gated failures and I/O problems are not input mistakes.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::InvalidExposure { .. }
                | CalcError::InvalidRiskCategory { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidExposure { .. } => "INVALID_EXPOSURE",
            CalcError::InvalidRiskCategory { .. } => "INVALID_RISK_CATEGORY",
            CalcError::MissingFootingData { .. } => "MISSING_FOOTING_DATA",
            CalcError::PostNotFound { .. } => "POST_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
