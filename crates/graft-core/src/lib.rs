//! # graft-core
//!
//! Core types shared by the adapter runtime and the `#[reflect]` macro:
//! - `types` - `TypeDesc` and `MethodSig`, the matching vocabulary
//! - `value` - type-erased argument and return values
//! - `interface` - `InterfaceDescriptor`, the target capability set
//! - `reflect` - `Reflect`, `TypeBuilder` and `SourceType`, the source side
//! - `method` - forwarding thunks built from plain Rust functions
//! - `fault` - errors raised while forwarding a call

#[macro_use]
mod macros;

pub mod types;
pub mod value;
pub mod interface;
pub mod reflect;
pub mod method;
pub mod fault;

pub use types::{MethodSig, TypeDesc};
pub use value::Value;
pub use interface::{InterfaceBuilder, InterfaceDescriptor, InterfaceId, ParamList};
pub use reflect::{Reflect, SourceMethod, SourceType, TypeBuilder};
pub use method::{IntoFallibleMethod, IntoMethod, Target, Thunk};
pub use fault::Fault;
