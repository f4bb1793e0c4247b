//! Message trait and message type identity

use std::any::{Any, TypeId};
use std::fmt;

/// Identity token for a message runtime type
///
/// Used as the routing-table key. Carries the fully-qualified type name so
/// diagnostics can name the offending type without reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageType {
    id: TypeId,
    name: &'static str,
}

impl MessageType {
    /// Token for the concrete message type `M`
    pub fn of<M: Any>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    /// Underlying `TypeId` (map key)
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified type name (diagnostics only)
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Message instance abstraction
///
/// Blanket-implemented for every `'static + Send + Sync` type, so plain
/// structs are messages without ceremony. The dispatcher routes by
/// `message_type()`, the invocation adapter downcasts via `as_any()`.
pub trait Message: Any + Send + Sync {
    /// Runtime type token of this instance
    fn message_type(&self) -> MessageType;

    /// Erased view for downcasting at the invocation boundary
    fn as_any(&self) -> &dyn Any;
}

impl<M: Any + Send + Sync> Message for M {
    fn message_type(&self) -> MessageType {
        MessageType::of::<M>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
