//! FactoryScope - per-dispatch resolution scope with drop-based release

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use contracts::{ConsumerInstance, ConsumerType, ContractError, ResolutionScope};

use crate::factory::{ConsumerCtor, ServiceProvider};

/// Per-scope service cache
///
/// Handed to consumer constructors so transitive dependencies resolved during
/// a dispatch call share that call's scope. The cache is dropped with the
/// scope, releasing every service it built.
pub struct ScopeServices {
    providers: Arc<HashMap<TypeId, ServiceProvider>>,
    cache: HashMap<TypeId, Box<dyn std::any::Any + Send>>,
}

impl ScopeServices {
    pub(crate) fn new(providers: Arc<HashMap<TypeId, ServiceProvider>>) -> Self {
        Self {
            providers,
            cache: HashMap::new(),
        }
    }

    /// Get the scope's instance of service type `S`
    ///
    /// Runs the registered provider on first request, then hands out clones
    /// of the cached instance. Services are typically cheap handles
    /// (`Arc`-backed), so the `Clone` bound is the sharing mechanism within
    /// the scope.
    ///
    /// # Errors
    /// Returns `ContractError::MissingProvider` if no provider was registered
    /// for `S`.
    pub fn get<S: std::any::Any + Send + Clone>(&mut self) -> Result<S, ContractError> {
        let id = TypeId::of::<S>();
        let slot = match self.cache.entry(id) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let provider = self
                    .providers
                    .get(&id)
                    .ok_or_else(|| ContractError::missing_provider(std::any::type_name::<S>()))?;
                vacant.insert(provider())
            }
        };
        slot.downcast_ref::<S>().cloned().ok_or_else(|| {
            ContractError::Other(format!(
                "scoped service cache corrupted for '{}'",
                std::any::type_name::<S>()
            ))
        })
    }
}

/// A resolution scope backed by the factory's frozen registrations
///
/// Exclusively owned by one dispatch call. Dropping the scope releases the
/// service cache and decrements the factory's live-scope count, on every exit
/// path.
pub struct FactoryScope {
    ctors: Arc<HashMap<TypeId, ConsumerCtor>>,
    services: ScopeServices,
    live_scopes: Arc<AtomicU64>,
}

impl FactoryScope {
    pub(crate) fn new(
        ctors: Arc<HashMap<TypeId, ConsumerCtor>>,
        services: ScopeServices,
        live_scopes: Arc<AtomicU64>,
    ) -> Self {
        Self {
            ctors,
            services,
            live_scopes,
        }
    }
}

impl ResolutionScope for FactoryScope {
    fn resolve(&mut self, consumer_type: ConsumerType) -> Result<ConsumerInstance, ContractError> {
        let ctor = self
            .ctors
            .get(&consumer_type.id())
            .ok_or_else(|| ContractError::missing_constructor(consumer_type.name()))?;
        let ctor = Arc::clone(ctor);
        ctor(&mut self.services)
    }
}

impl Drop for FactoryScope {
    fn drop(&mut self) {
        self.live_scopes.fetch_sub(1, Ordering::Relaxed);
        trace!("resolution scope released");
    }
}
