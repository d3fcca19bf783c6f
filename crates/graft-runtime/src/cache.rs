//! Synthesis cache.
//!
//! Adapter types keyed by (interface id, source type), evicted least
//! recently used first. The cache itself is not synchronized; the owning
//! `TypeUniverse` keeps it behind its registry lock.

use std::sync::Arc;

use graft_core::{InterfaceDescriptor, InterfaceId, TypeDesc};
use hashbrown::HashMap;

use crate::synth::AdapterType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub interface: InterfaceId,
    pub source: TypeDesc,
}

impl CacheKey {
    pub fn of(ty: &AdapterType) -> Self {
        Self {
            interface: ty.interface().id(),
            source: ty.source(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Outcome of a cache lookup.
#[derive(Debug)]
pub enum Lookup {
    Hit(Arc<AdapterType>),
    Miss,
    /// The key is taken by an adapter type for a structurally different
    /// interface with the same fingerprint. Counted as a miss.
    Collision(Arc<AdapterType>),
}

struct Entry {
    ty: Arc<AdapterType>,
    last_used: u64,
}

pub struct SynthesisCache {
    capacity: usize,
    tick: u64,
    entries: HashMap<CacheKey, Entry>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl SynthesisCache {
    /// A capacity of 0 caches nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the adapter type for `interface` under `key`, marking it most
    /// recently used on a hit.
    pub fn lookup(&mut self, key: &CacheKey, interface: &Arc<InterfaceDescriptor>) -> Lookup {
        self.tick += 1;
        let Some(entry) = self.entries.get_mut(key) else {
            self.misses += 1;
            return Lookup::Miss;
        };
        let cached = entry.ty.interface();
        if !Arc::ptr_eq(cached, interface) && **cached != **interface {
            self.misses += 1;
            return Lookup::Collision(Arc::clone(&entry.ty));
        }
        entry.last_used = self.tick;
        self.hits += 1;
        Lookup::Hit(Arc::clone(&entry.ty))
    }

    /// Store `ty` under `key`, returning the entry evicted to make room, if any.
    pub fn insert(&mut self, key: CacheKey, ty: Arc<AdapterType>) -> Option<Arc<AdapterType>> {
        if self.capacity == 0 {
            return None;
        }
        self.tick += 1;

        let evicted = if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };
        self.entries.insert(
            key,
            Entry {
                ty,
                last_used: self.tick,
            },
        );
        evicted
    }

    fn evict_lru(&mut self) -> Option<Arc<AdapterType>> {
        let key = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| *key)?;
        self.evictions += 1;
        self.entries.remove(&key).map(|entry| entry.ty)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
            capacity: self.capacity,
        }
    }
}
