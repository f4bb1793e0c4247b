//! ConsumerResolver trait - scoped instance resolution abstraction
//!
//! Replaces a general-purpose DI container with an explicit capability:
//! the dispatcher opens one scope per dispatch call, resolves exactly one
//! consumer through it, and drops the scope when the call ends.

use crate::{ConsumerInstance, ConsumerType, ContractError};

/// Consumer resolver trait
///
/// Shared by all concurrent dispatch calls; its registration state must be
/// immutable after construction so `create_scope` needs no locking.
pub trait ConsumerResolver: Send + Sync {
    /// Open a fresh resolution scope
    ///
    /// # Errors
    /// Returns resolution error if the scope cannot be created; the failure
    /// is fatal for that single dispatch call only.
    fn create_scope(&self) -> Result<Box<dyn ResolutionScope>, ContractError>;
}

/// A bounded lifetime context owning the instances created for one dispatch
///
/// Exclusively owned by the one dispatch call that created it; usage within a
/// call requires no synchronization. Release happens on `Drop`, which runs on
/// every exit path - there is no explicit release call to forget.
pub trait ResolutionScope: Send {
    /// Resolve an instance of the given consumer type within this scope
    ///
    /// # Errors
    /// Returns resolution error if no constructor is registered for the type
    /// or construction itself fails.
    fn resolve(&mut self, consumer_type: ConsumerType) -> Result<ConsumerInstance, ContractError>;
}
