//! # Error Types Module
//!
//! This module defines the error types used throughout the bot: dataset
//! loading, action token parsing, webhook signature checks and startup
//! configuration.

use thiserror::Error;

/// Errors raised while loading the facility dataset
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The dataset file could not be read
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The dataset file is not a JSON array of facility records
    #[error("failed to parse dataset {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised when a postback payload does not describe a menu step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionTokenError {
    #[error("action token has no action field")]
    MissingAction,
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("action {action} requires field {field}")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },
    #[error("invalid page number: {0}")]
    InvalidPage(String),
}

/// Errors raised while authenticating a webhook request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("missing X-Line-Signature header")]
    MissingHeader,
    #[error("signature is not valid base64")]
    BadEncoding,
    #[error("signature does not match request body")]
    Mismatch,
    #[error("channel secret cannot be used as an HMAC key")]
    InvalidKey,
}

/// Errors raised while reading startup configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),
    #[error("environment variable {name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting() {
        let err = ActionTokenError::MissingField {
            action: "select_district",
            field: "city",
        };
        assert_eq!(err.to_string(), "action select_district requires field city");

        let err = ConfigError::MissingVar("CHANNEL_SECRET");
        assert_eq!(
            err.to_string(),
            "environment variable CHANNEL_SECRET must be set"
        );
    }
}
