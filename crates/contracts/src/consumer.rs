//! Consumer contracts - typed handling trait and erased instances

use std::any::{Any, TypeId};
use std::fmt;

use crate::{ContractError, Message};

/// Identity token for a consumer runtime type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsumerType {
    id: TypeId,
    name: &'static str,
}

impl ConsumerType {
    /// Token for the concrete consumer type `C`
    pub fn of<C: Any>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified type name (diagnostics only)
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ConsumerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Typed handling contract
///
/// One implementation per (consumer, message) pair. Mutable receiver: each
/// dispatch call owns a fresh instance, so handlers may keep per-call state.
///
/// # Errors
/// Handler failures propagate to the dispatch caller unmodified; the core
/// performs no retry and no suppression.
pub trait Consume<M: Message>: Send {
    /// Handle one message instance
    fn consume(&mut self, message: &M) -> Result<(), ContractError>;
}

/// A consumer instance with its concrete type erased
///
/// The unit a resolution scope produces and the invocation adapter consumes.
/// Pairs the boxed instance with its type token so the adapter can verify the
/// consumer/message capability match before downcasting.
pub struct ConsumerInstance {
    consumer_type: ConsumerType,
    instance: Box<dyn Any + Send>,
}

impl ConsumerInstance {
    /// Erase a concrete consumer instance
    pub fn new<C: Any + Send>(instance: C) -> Self {
        Self {
            consumer_type: ConsumerType::of::<C>(),
            instance: Box::new(instance),
        }
    }

    /// Type token of the erased instance
    pub fn consumer_type(&self) -> ConsumerType {
        self.consumer_type
    }

    /// Downcast to the concrete consumer type
    pub fn downcast_mut<C: Any>(&mut self) -> Option<&mut C> {
        self.instance.downcast_mut::<C>()
    }
}

impl fmt::Debug for ConsumerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerInstance")
            .field("consumer_type", &self.consumer_type.name())
            .finish()
    }
}
