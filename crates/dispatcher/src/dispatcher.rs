//! SingleConsumerDispatcher - validated routing to exactly one consumer

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use contracts::{ConsumerResolver, ConsumerType, Message, MessageType};
use directory::MessageDirectory;

use crate::error::DispatchError;
use crate::metrics::DispatchMetrics;

/// Routes each message to the single consumer authoritative for its type
///
/// Built in one step from a populated `MessageDirectory`: validation and
/// routing-table construction happen inside `build`, so an unvalidated
/// dispatcher is unrepresentable. The routing table is frozen after `build`
/// and read lock-free by concurrent dispatch calls.
pub struct SingleConsumerDispatcher {
    directory: Arc<MessageDirectory>,
    resolver: Arc<dyn ConsumerResolver>,
    routes: HashMap<TypeId, ConsumerType>,
    metrics: Arc<DispatchMetrics>,
}

impl SingleConsumerDispatcher {
    /// Validate the directory and build the routing table
    ///
    /// # Errors
    /// - `DispatchError::MultipleConsumers` if any message type has more than
    ///   one direct consumer. The error names every offending type; a message
    ///   with many consumers is assumed to be a misclassified event. No
    ///   routing table is built.
    /// - `DispatchError::InternalInvariant` if a remaining entry does not
    ///   have exactly one consumer (cannot happen with accurate metadata).
    #[instrument(
        name = "dispatcher_build",
        skip(directory, resolver),
        fields(message_count = directory.messages().len())
    )]
    pub fn build(
        directory: Arc<MessageDirectory>,
        resolver: Arc<dyn ConsumerResolver>,
    ) -> Result<Self, DispatchError> {
        let offenders: Vec<String> = directory
            .messages()
            .iter()
            .filter(|info| info.direct_consumers.len() > 1)
            .map(|info| info.message_type.name().to_string())
            .collect();

        if !offenders.is_empty() {
            return Err(DispatchError::MultipleConsumers { offenders });
        }

        let mut routes = HashMap::with_capacity(directory.messages().len());
        for info in directory.messages() {
            let [consumer_type] = info.direct_consumers.as_slice() else {
                return Err(DispatchError::InternalInvariant {
                    message_type: info.message_type.name().to_string(),
                    consumer_count: info.direct_consumers.len(),
                });
            };
            routes.insert(info.message_type.id(), *consumer_type);
        }

        info!(routes = routes.len(), "routing table built");

        Ok(Self {
            directory,
            resolver,
            routes,
            metrics: Arc::new(DispatchMetrics::new()),
        })
    }

    /// Number of routed message types
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Dispatch one message to its authoritative consumer
    ///
    /// The topic is carried for logging only; routing is by the message's
    /// runtime type. Returns `Ok(false)` if this dispatcher owns no consumer
    /// for the type - a normal outcome that lets dispatchers be chained over
    /// one message stream. Returns `Ok(true)` after the single resolved
    /// consumer handled the message.
    ///
    /// # Errors
    /// Resolution and invocation failures propagate to the caller with no
    /// retry and no suppression; the call's scope is released before the
    /// error surfaces, and the dispatcher stays usable for later calls.
    #[instrument(
        name = "dispatch_message",
        skip(self, message),
        fields(topic = %topic, message_type = %message.message_type())
    )]
    pub fn dispatch_message(
        &self,
        topic: &str,
        message: &dyn Message,
    ) -> Result<bool, DispatchError> {
        let message_type = message.message_type();
        let Some(consumer_type) = self.routes.get(&message_type.id()).copied() else {
            self.metrics.inc_unrouted_count();
            debug!("no consumer registered, message not dispatched");
            return Ok(false);
        };

        match self.consume_in_scope(consumer_type, message_type, message) {
            Ok(()) => {
                self.metrics.inc_dispatched_count();
                Ok(true)
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                error!(consumer_type = %consumer_type, error = %e, "dispatch failed");
                Err(e)
            }
        }
    }

    /// Resolve and invoke inside a fresh scope
    ///
    /// Scope and instance are dropped when this returns, on every exit path.
    fn consume_in_scope(
        &self,
        consumer_type: ConsumerType,
        message_type: MessageType,
        message: &dyn Message,
    ) -> Result<(), DispatchError> {
        let mut scope = self
            .resolver
            .create_scope()
            .map_err(|e| DispatchError::resolution(consumer_type.name(), message_type.name(), e))?;

        let mut consumer = scope
            .resolve(consumer_type)
            .map_err(|e| DispatchError::resolution(consumer_type.name(), message_type.name(), e))?;

        self.directory
            .invoke_consume(&mut consumer, message)
            .map_err(|e| DispatchError::invocation(consumer_type.name(), message_type.name(), e))
    }
}

impl fmt::Debug for SingleConsumerDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleConsumerDispatcher")
            .field("route_count", &self.routes.len())
            .finish()
    }
}
