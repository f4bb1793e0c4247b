//! MessageInfo - per-message-type metadata

use contracts::{ConsumerType, MessageType};

/// Metadata describing one known message type
///
/// Constructed during directory population at startup, immutable thereafter.
/// The dispatcher (not the directory) enforces the single-consumer invariant
/// against `direct_consumers`.
#[derive(Debug, Clone)]
pub struct MessageInfo {
    /// Runtime type identity of the message (routing key)
    pub message_type: MessageType,

    /// Consumer types declared to handle this message, in declaration order
    pub direct_consumers: Vec<ConsumerType>,
}

impl MessageInfo {
    /// Create metadata with no consumers yet
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            direct_consumers: Vec::new(),
        }
    }
}
