//! # graft-runtime
//!
//! Runtime structural adapters. Given an interface (an ordered set of method
//! signatures) and a value whose type publishes its methods through
//! [`Reflect`], [`build`] synthesizes an adapter type whose methods forward
//! to the value's methods of the same name and parameter types, then binds
//! the value to a new adapter instance.
//!
//! - `matcher` - signature matching, all-or-nothing
//! - `synth` - adapter types and forwarding methods
//! - `cache` - LRU cache of adapter types keyed by (interface, source type)
//! - `universe` - the registry owning adapter types, behind one lock
//! - `adapter` - adapter instances and the `interface!` facade
//! - `config` - cache and ambiguity policies, environment overrides
//!
//! ```
//! use std::sync::Arc;
//! use graft_runtime::{interface, reflect, BuildError};
//!
//! interface! {
//!     pub trait AddNumbers {
//!         fn add(a: i32, b: i32) -> i32;
//!     }
//! }
//!
//! interface! {
//!     pub trait FooBar {
//!         fn foo();
//!         fn bar();
//!     }
//! }
//!
//! struct Target;
//!
//! #[reflect]
//! impl Target {
//!     pub fn add(&self, a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//!
//! let adder: AddNumbers = graft_runtime::build(Arc::new(Target)).unwrap();
//! assert_eq!(adder.add(-3, 3).unwrap(), 0);
//!
//! let err = graft_runtime::build::<FooBar, _>(Arc::new(Target)).unwrap_err();
//! assert!(matches!(err, BuildError::ResolutionFailed(_)));
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod synth;
pub mod cache;
pub mod universe;
pub mod adapter;

use std::sync::Arc;

pub use graft_core::{
    types, Fault, InterfaceBuilder, InterfaceDescriptor, InterfaceId, IntoFallibleMethod, IntoMethod, MethodSig,
    ParamList, Reflect, SourceMethod, SourceType, Target, Thunk, TypeBuilder, TypeDesc, Value,
};
pub use graft_macros::reflect;

pub use adapter::{Adapter, Interface};
pub use cache::CacheStats;
pub use config::{AdapterConfig, AmbiguityPolicy, CachePolicy};
pub use error::{BuildError, MatchError, SynthesisError};
pub use matcher::{resolve, MatchEntry, MatchTable};
pub use synth::{AdapterType, AdapterTypeId, ForwardingMethod};
pub use universe::{global, TypeUniverse, UniverseStats};

/// Wrap `target` in an adapter implementing `I`, using the global universe.
pub fn build<I: Interface, S: Reflect>(target: Arc<S>) -> Result<I, BuildError> {
    global().build(target)
}

/// Wrap `target` in an adapter implementing a runtime-described interface,
/// using the global universe.
pub fn build_dynamic(
    interface: Arc<InterfaceDescriptor>,
    source: &SourceType,
    target: Arc<Target>,
) -> Result<Adapter, BuildError> {
    global().build_dynamic(interface, source, target)
}
