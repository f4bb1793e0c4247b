//! ConsumerFactory - constructor-registration resolver

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use contracts::{ConsumerInstance, ConsumerResolver, ContractError, ResolutionScope};

use crate::scope::{FactoryScope, ScopeServices};

/// Erased consumer constructor, run once per resolving scope
pub(crate) type ConsumerCtor =
    Arc<dyn Fn(&mut ScopeServices) -> Result<ConsumerInstance, ContractError> + Send + Sync>;

/// Erased scoped-service provider, run at most once per scope
pub(crate) type ServiceProvider = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Builder for a `ConsumerFactory`
///
/// Registrations are collected at startup; `build` freezes them behind `Arc`
/// so scope creation needs no locking.
#[derive(Default)]
pub struct ConsumerFactoryBuilder {
    ctors: HashMap<TypeId, ConsumerCtor>,
    providers: HashMap<TypeId, ServiceProvider>,
}

impl ConsumerFactoryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for consumer type `C`
    ///
    /// The constructor receives the scope's services and may pull transitive
    /// dependencies from them; everything it resolves shares the scope's
    /// lifetime.
    pub fn register<C, F>(mut self, ctor: F) -> Self
    where
        C: Any + Send,
        F: Fn(&mut ScopeServices) -> Result<C, ContractError> + Send + Sync + 'static,
    {
        self.ctors.insert(
            TypeId::of::<C>(),
            Arc::new(move |services| Ok(ConsumerInstance::new(ctor(services)?))),
        );
        self
    }

    /// Register a `Default`-constructible consumer type `C`
    pub fn register_default<C>(self) -> Self
    where
        C: Any + Send + Default,
    {
        self.register::<C, _>(|_| Ok(C::default()))
    }

    /// Register a provider for scoped service type `S`
    ///
    /// Within one scope the provider runs on first request and the result is
    /// cached; two scopes never share a service instance.
    pub fn provide<S, F>(mut self, provider: F) -> Self
    where
        S: Any + Send,
        F: Fn() -> S + Send + Sync + 'static,
    {
        self.providers
            .insert(TypeId::of::<S>(), Arc::new(move || Box::new(provider())));
        self
    }

    /// Freeze registrations into a factory
    pub fn build(self) -> ConsumerFactory {
        ConsumerFactory {
            ctors: Arc::new(self.ctors),
            providers: Arc::new(self.providers),
            scopes_created: Arc::new(AtomicU64::new(0)),
            live_scopes: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Constructor-registration implementation of `ConsumerResolver`
///
/// Registration state is immutable after `build`; all concurrent dispatch
/// calls share the factory and open exclusive scopes from it.
pub struct ConsumerFactory {
    ctors: Arc<HashMap<TypeId, ConsumerCtor>>,
    providers: Arc<HashMap<TypeId, ServiceProvider>>,
    scopes_created: Arc<AtomicU64>,
    live_scopes: Arc<AtomicU64>,
}

impl ConsumerFactory {
    /// Total scopes opened since construction
    pub fn scopes_created(&self) -> u64 {
        self.scopes_created.load(Ordering::Relaxed)
    }

    /// Scopes currently alive (opened and not yet dropped)
    pub fn live_scopes(&self) -> u64 {
        self.live_scopes.load(Ordering::Relaxed)
    }
}

impl ConsumerResolver for ConsumerFactory {
    fn create_scope(&self) -> Result<Box<dyn ResolutionScope>, ContractError> {
        self.scopes_created.fetch_add(1, Ordering::Relaxed);
        self.live_scopes.fetch_add(1, Ordering::Relaxed);
        trace!(live = self.live_scopes(), "resolution scope opened");

        Ok(Box::new(FactoryScope::new(
            Arc::clone(&self.ctors),
            ScopeServices::new(Arc::clone(&self.providers)),
            Arc::clone(&self.live_scopes),
        )))
    }
}
