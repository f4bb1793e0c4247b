//! # Directory
//!
//! Message Directory - the source of truth for message metadata.
//!
//! Responsibilities:
//! - Catalog all known message types and their declared direct consumers
//! - Provide the typed invocation adapter (`invoke_consume`)
//! - Populated once at startup via the builder, read-only afterward

pub mod directory;
pub mod info;

pub use contracts::{ConsumerType, ContractError, Message, MessageType};
pub use directory::{MessageDirectory, MessageDirectoryBuilder};
pub use info::MessageInfo;
