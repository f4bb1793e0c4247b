//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module types and traits
//! for the message-dispatch core. All business crates can only depend on this
//! crate, reverse dependencies are prohibited.
//!
//! ## Identity Model
//! - Message and consumer types are identified by `TypeId` tokens carrying the
//!   fully-qualified type name for diagnostics
//! - No runtime reflection beyond `Any` downcasts at the invocation boundary

mod consumer;
mod error;
mod message;
mod resolver;

pub use consumer::{Consume, ConsumerInstance, ConsumerType};
pub use error::ContractError;
pub use message::{Message, MessageType};
pub use resolver::{ConsumerResolver, ResolutionScope};
