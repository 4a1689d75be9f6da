//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`ApiError`], [`ConfigError`]) for detailed handling
//! - Name lookups never surface here; enrichment swallows them per record
//!
//! # Example
//!
//! ```ignore
//! use autotask_mapper::error::{Error, Result};
//!
//! async fn ticket(api: &dyn RecordsApi, id: i64) -> Result<Value> {
//!     api.get(Entity::Tickets, id)
//!         .await?
//!         .ok_or_else(|| Error::not_found(format!("Tickets/{}", id)))
//! }
//! ```

use crate::config::ConfigError;
use crate::records::ApiError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Records service error
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tool name not in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments missing or of the wrong type
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Create an invalid-arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ApiError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Api(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_passes_through() {
        let err: Error = ApiError::RateLimited.into();
        assert_eq!(err.to_string(), "Rate limited - try again later");
    }

    #[test]
    fn test_unknown_tool_display() {
        let err = Error::UnknownTool("frobnicate".into());
        assert_eq!(err.to_string(), "Unknown tool: frobnicate");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::not_found("Tickets/5").context("while fetching ticket details");
        let msg = err.to_string();
        assert!(msg.contains("while fetching ticket details"));
        assert!(msg.contains("Tickets/5"));
    }

    #[test]
    fn test_result_ext_on_api_result() {
        let result: std::result::Result<(), ApiError> = Err(ApiError::Unauthorized);
        let with_ctx = result.with_context("search_companies");
        let msg = with_ctx.unwrap_err().to_string();
        assert!(msg.starts_with("search_companies: "));
        assert!(msg.contains("Unauthorized"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::NoConfigDir.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
