//! # Consumer Factory
//!
//! Concrete `ConsumerResolver` implementation.
//!
//! Responsibilities:
//! - Hold consumer constructors registered at startup
//! - Open one `FactoryScope` per dispatch call
//! - Cache scoped service dependencies per scope, never across scopes
//! - Release everything a scope owns when the scope drops

pub mod factory;
pub mod scope;

pub use contracts::{ConsumerInstance, ConsumerResolver, ConsumerType, ResolutionScope};
pub use factory::{ConsumerFactory, ConsumerFactoryBuilder};
pub use scope::{FactoryScope, ScopeServices};
