//! Classified error taxonomy shared by every marketplace adapter.
//!
//! Adapters never surface raw transport errors. Each platform error is
//! classified into a [`MarketplaceError`] at the adapter boundary, so callers
//! can branch on [`ErrorCode`] and [`MarketplaceError::is_retriable`] without
//! knowing which platform produced it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result envelope returned by every single-item adapter call.
pub type OperationResult<T> = Result<T, MarketplaceError>;

/// Errors that can be returned across the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketplaceError {
    /// The adapter was used before `initialize` succeeded (or after `close`).
    #[error("Adapter not initialized")]
    NotInitialized,

    /// Required credentials were missing or the connectivity probe failed.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Entity does not exist on the platform.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was malformed or rejected by platform validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The platform throttled the request despite local rate limiting.
    #[error("Rate limited: {message}")]
    RateLimit {
        /// Human-readable description.
        message: String,
        /// Platform-suggested delay before retrying, if any.
        retry_after_secs: Option<u64>,
    },

    /// Network failure or timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Credentials were rejected by the platform.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Invalid local configuration (e.g. a rate-limit cost larger than the bucket).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unclassified platform failure.
    #[error("Platform error: {0}")]
    UnknownPlatform(String),
}

/// Stable error codes for [`MarketplaceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotInitialized,
    Initialization,
    NotFound,
    Validation,
    RateLimit,
    Transport,
    Authentication,
    Configuration,
    UnknownPlatform,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::NotInitialized => "not_initialized",
            Self::Initialization => "initialization",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::RateLimit => "rate_limit",
            Self::Transport => "transport",
            Self::Authentication => "authentication",
            Self::Configuration => "configuration",
            Self::UnknownPlatform => "unknown_platform",
        };
        f.write_str(code)
    }
}

/// Serializable snapshot of a classified error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error classification.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Whether repeating the same call later may succeed.
    pub retriable: bool,
}

impl MarketplaceError {
    /// Classification code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::Initialization(_) => ErrorCode::Initialization,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::Validation,
            Self::RateLimit { .. } => ErrorCode::RateLimit,
            Self::Transport(_) => ErrorCode::Transport,
            Self::Authentication(_) => ErrorCode::Authentication,
            Self::Configuration(_) => ErrorCode::Configuration,
            Self::UnknownPlatform(_) => ErrorCode::UnknownPlatform,
        }
    }

    /// Throttling and transport failures are worth retrying; nothing else is.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::RateLimit { .. } | Self::Transport(_))
    }

    /// Snapshot suitable for serialization or logging.
    #[must_use]
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            retriable: self.is_retriable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = MarketplaceError::NotFound("SKU ABC-1".to_string());
        assert_eq!(err.to_string(), "Not found: SKU ABC-1");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(!err.is_retriable());
    }

    #[test]
    fn test_rate_limit_is_retriable() {
        let err = MarketplaceError::RateLimit {
            message: "429 from platform".to_string(),
            retry_after_secs: Some(2),
        };
        assert!(err.is_retriable());
        assert_eq!(err.code(), ErrorCode::RateLimit);
    }

    #[test]
    fn test_transport_is_retriable() {
        assert!(MarketplaceError::Transport("timed out".to_string()).is_retriable());
        assert!(!MarketplaceError::NotInitialized.is_retriable());
        assert!(!MarketplaceError::Authentication("bad token".to_string()).is_retriable());
    }

    #[test]
    fn test_error_info_serializes_snake_case_code() {
        let info = MarketplaceError::Validation("quantity must be >= 0".to_string()).info();
        let json = serde_json::to_value(&info).expect("serialize");
        assert_eq!(json["code"], "validation");
        assert_eq!(json["retriable"], false);
        assert_eq!(json["message"], "Validation error: quantity must be >= 0");
    }

    #[test]
    fn test_error_code_display_matches_serde() {
        let code = ErrorCode::UnknownPlatform;
        let json = serde_json::to_value(code).expect("serialize");
        assert_eq!(json, code.to_string());
    }
}
