//! The adapter type registry.
//!
//! A `TypeUniverse` owns every adapter type it synthesizes and the cache
//! that lets repeated builds for the same (interface, source type) pair share
//! one type. The registry lock is held across lookup, synthesis and insert,
//! so concurrent builds of the same pair mint exactly one type.

use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use graft_core::{InterfaceDescriptor, Reflect, SourceType, Target, TypeDesc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::adapter::{Adapter, Interface};
use crate::cache::{CacheKey, CacheStats, Lookup, SynthesisCache};
use crate::config::AdapterConfig;
use crate::error::{BuildError, MatchError, SynthesisError};
use crate::matcher::{self, MatchTable};
use crate::synth::{self, AdapterType, AdapterTypeId};

static GLOBAL: Lazy<TypeUniverse> = Lazy::new(|| TypeUniverse::new(AdapterConfig::from_env()));

/// Process-wide universe, configured from the environment on first use.
pub fn global() -> &'static TypeUniverse {
    &GLOBAL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniverseStats {
    /// Adapter types synthesized so far.
    pub minted: u64,
    pub cache: CacheStats,
}

pub struct TypeUniverse {
    config: AdapterConfig,
    next_id: AtomicU64,
    minted: AtomicU64,
    cache: Mutex<SynthesisCache>,
}

impl TypeUniverse {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(0),
            minted: AtomicU64::new(0),
            cache: Mutex::new(SynthesisCache::new(config.cache.capacity())),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Wrap `target` in an adapter implementing `I`.
    pub fn build<I: Interface, S: Reflect>(&self, target: Arc<S>) -> Result<I, BuildError> {
        let interface = I::descriptor();
        let ty = self.adapter_type(&interface, TypeDesc::of::<S>(), || Cow::Owned(SourceType::of::<S>()))?;
        let adapter = ty.instantiate(target)?;
        Ok(I::from_adapter(adapter))
    }

    /// Wrap `target` in an adapter implementing a runtime-described interface.
    /// `source` must describe the concrete type of `target`.
    pub fn build_dynamic(
        &self,
        interface: Arc<InterfaceDescriptor>,
        source: &SourceType,
        target: Arc<Target>,
    ) -> Result<Adapter, BuildError> {
        let ty = self.adapter_type(&interface, source.ty(), || Cow::Borrowed(source))?;
        Ok(ty.instantiate(target)?)
    }

    /// Match `interface` against `source` under this universe's ambiguity policy.
    pub fn resolve(&self, interface: &InterfaceDescriptor, source: &SourceType) -> Result<MatchTable, MatchError> {
        matcher::resolve(interface, source, self.config.ambiguity)
    }

    /// The adapter type for `interface` over the source type `source`, from
    /// the cache or freshly synthesized. `describe` only runs on a miss.
    fn adapter_type<'a>(
        &self,
        interface: &Arc<InterfaceDescriptor>,
        source: TypeDesc,
        describe: impl FnOnce() -> Cow<'a, SourceType>,
    ) -> Result<Arc<AdapterType>, BuildError> {
        let mut cache = self.cache.lock();
        if cache.capacity() == 0 {
            drop(cache);
            return self.mint(interface, &describe());
        }

        let key = CacheKey {
            interface: interface.id(),
            source,
        };
        match cache.lookup(&key, interface) {
            Lookup::Hit(ty) => {
                trace!(adapter = ty.name(), id = %ty.id(), "synthesis cache hit");
                return Ok(ty);
            }
            Lookup::Collision(ty) => {
                debug!(adapter = ty.name(), interface = interface.name(), "interface fingerprint collision");
                return Err(SynthesisError::IdentityCollision {
                    interface: interface.name().to_string(),
                    id: interface.id(),
                }
                .into());
            }
            Lookup::Miss => {}
        }

        let ty = self.mint(interface, &describe())?;
        if let Some(evicted) = cache.insert(key, Arc::clone(&ty)) {
            debug!(adapter = evicted.name(), id = %evicted.id(), "evicted adapter type");
        }
        Ok(ty)
    }

    fn mint(&self, interface: &Arc<InterfaceDescriptor>, source: &SourceType) -> Result<Arc<AdapterType>, BuildError> {
        let table = self.resolve(interface, source)?;
        let id = AdapterTypeId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let ty = synth::synthesize(id, Arc::clone(interface), source, table)?;
        self.minted.fetch_add(1, Ordering::Relaxed);
        debug!(adapter = ty.name(), id = %ty.id(), slots = ty.methods().len(), "synthesized adapter type");
        Ok(Arc::new(ty))
    }

    pub fn stats(&self) -> UniverseStats {
        UniverseStats {
            minted: self.minted.load(Ordering::Relaxed),
            cache: self.cache.lock().stats(),
        }
    }

    /// Drop every cached adapter type. Adapters already built keep theirs.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CachePolicy;
    use graft_core::{TypeBuilder, Value};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;

    struct Target {
        base: i32,
    }

    impl Target {
        fn add(&self, a: i32, b: i32) -> i32 {
            self.base + a + b
        }
    }

    impl Reflect for Target {
        fn describe(ty: &mut TypeBuilder<Self>) {
            ty.method("add", Target::add);
        }
    }

    fn add_numbers() -> Arc<InterfaceDescriptor> {
        Arc::new(InterfaceDescriptor::builder("AddNumbers").method::<(i32, i32), i32>("add").build())
    }

    fn build(universe: &TypeUniverse, base: i32) -> Adapter {
        universe
            .build_dynamic(add_numbers(), &SourceType::of::<Target>(), Arc::new(Target { base }))
            .unwrap()
    }

    #[test]
    fn test_same_pair_shares_one_type() {
        let universe = TypeUniverse::default();
        let a = build(&universe, 0);
        let b = build(&universe, 100);
        assert!(Arc::ptr_eq(a.adapter_type(), b.adapter_type()));
        assert_eq!(universe.stats().minted, 1);

        let out = b.invoke(0, vec![Value::new(1), Value::new(2)]).unwrap();
        assert_eq!(out.downcast::<i32>().ok(), Some(103));
    }

    #[test]
    fn test_disabled_cache_mints_per_build() {
        let universe = TypeUniverse::new(AdapterConfig::uncached());
        let a = build(&universe, 0);
        let b = build(&universe, 0);
        assert_ne!(a.adapter_type().id(), b.adapter_type().id());
        assert_eq!(universe.stats().minted, 2);
        assert_eq!(universe.stats().cache.len, 0);
    }

    #[test]
    fn test_identity_collision_is_reported() {
        let universe = TypeUniverse::default();
        let other = Arc::new(InterfaceDescriptor::builder("Other").method::<(i32, i32), i32>("add").build());
        let ty = universe.mint(&other, &SourceType::of::<Target>()).unwrap();

        // File a different interface's adapter type under AddNumbers' key.
        let key = CacheKey {
            interface: add_numbers().id(),
            source: graft_core::TypeDesc::of::<Target>(),
        };
        universe.cache.lock().insert(key, ty);

        let err = universe
            .build_dynamic(add_numbers(), &SourceType::of::<Target>(), Arc::new(Target { base: 0 }))
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::SynthesisFailure(SynthesisError::IdentityCollision { .. })
        ));
        let stats = universe.stats().cache;
        assert_eq!((stats.hits, stats.misses), (0, 1));
    }

    static DESCRIBED: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl Counted {
        fn add(&self, a: i32, b: i32) -> i32 {
            a.wrapping_add(b)
        }
    }

    impl Reflect for Counted {
        fn describe(ty: &mut TypeBuilder<Self>) {
            DESCRIBED.fetch_add(1, Ordering::SeqCst);
            ty.method("add", Counted::add);
        }
    }

    crate::interface! {
        trait AddNumbers {
            fn add(a: i32, b: i32) -> i32;
        }
    }

    #[test]
    fn test_cache_hits_skip_describe() {
        let universe = TypeUniverse::default();
        for _ in 0..3 {
            let adder: AddNumbers = universe.build(Arc::new(Counted)).unwrap();
            assert_eq!(adder.add(5, 6).unwrap(), 11);
        }
        assert_eq!(DESCRIBED.load(Ordering::SeqCst), 1);
        let stats = universe.stats();
        assert_eq!(stats.minted, 1);
        assert_eq!(stats.cache.hits, 2);
    }

    #[test]
    fn test_uncached_ids_keep_increasing() {
        let universe = TypeUniverse::new(AdapterConfig::uncached());
        universe.next_id.store(u64::from(u32::MAX), Ordering::Relaxed);
        let a = build(&universe, 0);
        let b = build(&universe, 0);
        assert_eq!(a.adapter_type().id().as_u64(), u64::from(u32::MAX));
        assert!(b.adapter_type().id() > a.adapter_type().id());
    }

    #[test]
    fn test_eviction_is_counted() {
        let universe = TypeUniverse::new(AdapterConfig::default().with_cache(CachePolicy::Lru { capacity: 1 }));
        build(&universe, 0);
        let other = Arc::new(InterfaceDescriptor::builder("Sum").method::<(i32, i32), i32>("add").build());
        universe
            .build_dynamic(other, &SourceType::of::<Target>(), Arc::new(Target { base: 0 }))
            .unwrap();
        let stats = universe.stats();
        assert_eq!(stats.cache.evictions, 1);
        assert_eq!(stats.cache.len, 1);
        assert_eq!(stats.minted, 2);
    }

    #[test]
    fn test_concurrent_builds_mint_once() {
        let universe = TypeUniverse::default();
        let barrier = Barrier::new(8);
        let ids: Vec<AdapterTypeId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let universe = &universe;
                    let barrier = &barrier;
                    scope.spawn(move || {
                        barrier.wait();
                        build(universe, i).adapter_type().id()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(universe.stats().minted, 1);
    }
}
