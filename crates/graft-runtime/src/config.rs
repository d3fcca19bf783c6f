//! Adapter synthesis configuration.
//!
//! Defaults: LRU cache of 256 adapter types, ambiguous matches rejected.
//! `AdapterConfig::from_env` reads:
//! - `GRAFT_CACHE` - `off` to mint a new type per build, or a cache capacity
//! - `GRAFT_AMBIGUITY` - `first` (first registered match wins) or `reject`

use tracing::warn;

pub const CACHE_VAR: &str = "GRAFT_CACHE";
pub const AMBIGUITY_VAR: &str = "GRAFT_AMBIGUITY";

/// How synthesized adapter types are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "policy", rename_all = "snake_case"))]
pub enum CachePolicy {
    /// Mint a fresh adapter type on every build.
    Disabled,
    /// Keep up to `capacity` adapter types keyed by (interface, source type),
    /// evicting the least recently used. A capacity of 0 disables caching.
    Lru { capacity: usize },
}

impl CachePolicy {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Effective capacity; 0 means no caching.
    pub fn capacity(&self) -> usize {
        match self {
            CachePolicy::Disabled => 0,
            CachePolicy::Lru { capacity } => *capacity,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "off" | "disabled" | "none" => Some(CachePolicy::Disabled),
            n => n.parse().ok().map(|capacity| CachePolicy::Lru { capacity }),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Lru {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}

/// What the matcher does when several source methods match one interface method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AmbiguityPolicy {
    /// Take the first candidate in registration order.
    FirstMatch,
    /// Fail with `MatchError::AmbiguousMatch`.
    #[default]
    Reject,
}

impl AmbiguityPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "first" | "first_match" => Some(AmbiguityPolicy::FirstMatch),
            "reject" => Some(AmbiguityPolicy::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AdapterConfig {
    pub cache: CachePolicy,
    pub ambiguity: AmbiguityPolicy,
}

impl AdapterConfig {
    /// Defaults overridden by `GRAFT_CACHE` / `GRAFT_AMBIGUITY`.
    pub fn from_env() -> Self {
        Self::default().with_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup. Unparseable values are
    /// logged and ignored.
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(CACHE_VAR) {
            match CachePolicy::parse(&value) {
                Some(cache) => self.cache = cache,
                None => warn!(var = CACHE_VAR, %value, "ignoring invalid cache policy"),
            }
        }
        if let Some(value) = lookup(AMBIGUITY_VAR) {
            match AmbiguityPolicy::parse(&value) {
                Some(ambiguity) => self.ambiguity = ambiguity,
                None => warn!(var = AMBIGUITY_VAR, %value, "ignoring invalid ambiguity policy"),
            }
        }
        self
    }

    pub fn uncached() -> Self {
        Self {
            cache: CachePolicy::Disabled,
            ..Self::default()
        }
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }
}
