//! Dispatcher error types

use contracts::ContractError;
use thiserror::Error;

/// Dispatcher-specific errors
///
/// `MultipleConsumers` and `InternalInvariant` can only come out of `build`;
/// `Resolution` and `Invocation` are per-call and leave the dispatcher intact
/// for subsequent dispatches.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Startup configuration error: message types with more than one direct
    /// consumer. Names every offender, not just the first found.
    #[error(
        "these message types have multiple direct consumers. Did you intend to declare them as events? {}",
        offenders.join(", ")
    )]
    MultipleConsumers { offenders: Vec<String> },

    /// Post-filter assertion failed; cannot happen with accurate directory data
    #[error("internal invariant violated: '{message_type}' has {consumer_count} direct consumers after validation")]
    InternalInvariant {
        message_type: String,
        consumer_count: usize,
    },

    /// Consumer instance could not be resolved for this call
    #[error("failed to resolve consumer '{consumer_type}' for message '{message_type}'")]
    Resolution {
        consumer_type: String,
        message_type: String,
        #[source]
        source: ContractError,
    },

    /// Consumer invocation failed, including capability mismatch
    #[error("consumer '{consumer_type}' failed for message '{message_type}'")]
    Invocation {
        consumer_type: String,
        message_type: String,
        #[source]
        source: ContractError,
    },
}

impl DispatchError {
    /// Create a resolution error
    pub fn resolution(
        consumer_type: impl Into<String>,
        message_type: impl Into<String>,
        source: ContractError,
    ) -> Self {
        Self::Resolution {
            consumer_type: consumer_type.into(),
            message_type: message_type.into(),
            source,
        }
    }

    /// Create an invocation error
    pub fn invocation(
        consumer_type: impl Into<String>,
        message_type: impl Into<String>,
        source: ContractError,
    ) -> Self {
        Self::Invocation {
            consumer_type: consumer_type.into(),
            message_type: message_type.into(),
            source,
        }
    }
}
