//! MessageDirectory - startup-built registry of message metadata and invokers

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use contracts::{Consume, ConsumerInstance, ConsumerType, ContractError, Message, MessageType};

use crate::info::MessageInfo;

/// Erased invocation adapter for one (consumer, message) pair
type Invoker =
    Box<dyn Fn(&mut ConsumerInstance, &dyn Message) -> Result<(), ContractError> + Send + Sync>;

/// Builder for a `MessageDirectory`
///
/// Declarations are collected at startup; `build` freezes the directory.
#[derive(Default)]
pub struct MessageDirectoryBuilder {
    messages: Vec<MessageInfo>,
    index: HashMap<TypeId, usize>,
    invokers: HashMap<(TypeId, TypeId), Invoker>,
}

impl MessageDirectoryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that consumer `C` directly handles message type `M`
    ///
    /// Appends `C` to `M`'s `direct_consumers` (creating the entry on first
    /// declaration) and records the typed invoker for the pair. Declaration
    /// order is preserved, keeping `messages()` stable within a process run.
    pub fn declare<M, C>(mut self) -> Self
    where
        M: Any + Send + Sync,
        C: Consume<M> + Any + Send,
    {
        let message_type = MessageType::of::<M>();
        let consumer_type = ConsumerType::of::<C>();

        let slot = *self.index.entry(message_type.id()).or_insert_with(|| {
            self.messages.push(MessageInfo::new(message_type));
            self.messages.len() - 1
        });
        self.messages[slot].direct_consumers.push(consumer_type);

        self.invokers.insert(
            (consumer_type.id(), message_type.id()),
            Box::new(move |consumer, message| {
                let erased_type = consumer.consumer_type();
                let actual_type = message.message_type();
                let concrete = message.as_any().downcast_ref::<M>().ok_or_else(|| {
                    ContractError::consumer_mismatch(consumer_type.name(), actual_type.name())
                })?;
                let handler = consumer.downcast_mut::<C>().ok_or_else(|| {
                    ContractError::consumer_mismatch(erased_type.name(), message_type.name())
                })?;
                handler.consume(concrete)
            }),
        );

        debug!(
            message_type = %message_type,
            consumer_type = %consumer_type,
            "direct consumer declared"
        );

        self
    }

    /// Freeze the directory
    pub fn build(self) -> MessageDirectory {
        MessageDirectory {
            messages: self.messages,
            invokers: self.invokers,
        }
    }
}

/// Registry of message types and their declared direct consumers
///
/// Process-wide read-only state after `build`. Holds no invariant of its own
/// beyond accurate metadata; the dispatcher validates against it.
pub struct MessageDirectory {
    messages: Vec<MessageInfo>,
    invokers: HashMap<(TypeId, TypeId), Invoker>,
}

impl MessageDirectory {
    /// Complete catalog of known message types, in declaration order
    pub fn messages(&self) -> &[MessageInfo] {
        &self.messages
    }

    /// Invoke the consumer's handling behavior for the given message
    ///
    /// # Errors
    /// Returns `ContractError::ConsumerMismatch` if the instance's declared
    /// capability does not match the message's runtime type. That is a fatal
    /// configuration bug and is propagated, never swallowed. Handler failures
    /// propagate unmodified.
    pub fn invoke_consume(
        &self,
        consumer: &mut ConsumerInstance,
        message: &dyn Message,
    ) -> Result<(), ContractError> {
        let key = (consumer.consumer_type().id(), message.message_type().id());
        let invoker = self.invokers.get(&key).ok_or_else(|| {
            ContractError::consumer_mismatch(
                consumer.consumer_type().name(),
                message.message_type().name(),
            )
        })?;
        invoker(consumer, message)
    }
}

impl fmt::Debug for MessageDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDirectory")
            .field("messages", &self.messages)
            .finish()
    }
}
