//! Layered error definitions
//!
//! Categorized by source: resolution / invocation / general

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Resolution Errors =====
    /// No constructor registered for a consumer type
    #[error("no constructor registered for consumer '{consumer_type}'")]
    MissingConstructor { consumer_type: String },

    /// Consumer construction failed
    #[error("failed to construct consumer '{consumer_type}': {message}")]
    Construction {
        consumer_type: String,
        message: String,
    },

    /// No provider registered for a scoped service
    #[error("no provider registered for scoped service '{service_type}'")]
    MissingProvider { service_type: String },

    // ===== Invocation Errors =====
    /// Consumer cannot accept the message's runtime type
    ///
    /// Consumer/metadata mismatch is a fatal configuration bug, not a
    /// recoverable error.
    #[error("consumer '{consumer_type}' cannot accept message type '{message_type}'")]
    ConsumerMismatch {
        consumer_type: String,
        message_type: String,
    },

    /// Consumer-reported handling failure
    #[error("consumer '{consumer_type}' failed: {message}")]
    Consume {
        consumer_type: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create missing constructor error
    pub fn missing_constructor(consumer_type: impl Into<String>) -> Self {
        Self::MissingConstructor {
            consumer_type: consumer_type.into(),
        }
    }

    /// Create construction error
    pub fn construction(consumer_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            consumer_type: consumer_type.into(),
            message: message.into(),
        }
    }

    /// Create missing provider error
    pub fn missing_provider(service_type: impl Into<String>) -> Self {
        Self::MissingProvider {
            service_type: service_type.into(),
        }
    }

    /// Create consumer mismatch error
    pub fn consumer_mismatch(
        consumer_type: impl Into<String>,
        message_type: impl Into<String>,
    ) -> Self {
        Self::ConsumerMismatch {
            consumer_type: consumer_type.into(),
            message_type: message_type.into(),
        }
    }

    /// Create consume error
    pub fn consume(consumer_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Consume {
            consumer_type: consumer_type.into(),
            message: message.into(),
        }
    }
}
