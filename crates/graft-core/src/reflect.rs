//! Source-side reflection.
//!
//! Rust keeps no method tables at runtime, so a source type publishes its
//! methods explicitly through `Reflect` (usually generated by the
//! `#[reflect]` attribute). The resulting `SourceType` is what the signature
//! matcher inspects.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::method::{IntoFallibleMethod, IntoMethod, Thunk};
use crate::types::{MethodSig, TypeDesc};

/// A type whose public methods can be enumerated at runtime.
pub trait Reflect: Any + Send + Sync {
    /// Register every method callers may adapt to, in declaration order.
    fn describe(ty: &mut TypeBuilder<Self>)
    where
        Self: Sized;
}

/// One published method: its signature and its forwarding thunk.
#[derive(Clone)]
pub struct SourceMethod {
    pub sig: MethodSig,
    pub thunk: Thunk,
}

impl fmt::Debug for SourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMethod").field("sig", &self.sig).finish_non_exhaustive()
    }
}

/// Runtime view of a source type: its identity and its published methods
/// in registration order.
#[derive(Debug, Clone)]
pub struct SourceType {
    ty: TypeDesc,
    methods: Vec<SourceMethod>,
}

impl SourceType {
    /// Describe `S` through its `Reflect` impl.
    pub fn of<S: Reflect>() -> Self {
        let mut builder = TypeBuilder::<S>::new();
        S::describe(&mut builder);
        builder.build()
    }

    /// Describe `S` by hand, e.g. for a foreign type without a `Reflect` impl.
    pub fn builder<S: Any + Send + Sync>() -> TypeBuilder<S> {
        TypeBuilder::new()
    }

    #[inline]
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    pub fn name(&self) -> &'static str {
        self.ty.short_name()
    }

    pub fn methods(&self) -> &[SourceMethod] {
        &self.methods
    }

    pub fn method(&self, index: usize) -> Option<&SourceMethod> {
        self.methods.get(index)
    }
}

/// Collects the methods of `S`.
pub struct TypeBuilder<S> {
    methods: Vec<SourceMethod>,
    _marker: PhantomData<fn() -> S>,
}

impl<S: Any + Send + Sync> TypeBuilder<S> {
    fn new() -> Self {
        Self {
            methods: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Publish `f` as method `name`.
    pub fn method<Args, F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: IntoMethod<S, Args>,
    {
        let sig = MethodSig::new(name, F::params(), F::returns());
        self.push(sig, f.into_thunk())
    }

    /// Publish `f`, whose `Err` results surface as `Fault::Raised`, as method `name`.
    pub fn try_method<Args, F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: IntoFallibleMethod<S, Args>,
    {
        let sig = MethodSig::new(name, F::params(), F::returns());
        self.push(sig, f.into_thunk())
    }

    fn push(&mut self, sig: MethodSig, thunk: Thunk) -> &mut Self {
        self.methods.push(SourceMethod { sig, thunk });
        self
    }

    pub fn build(self) -> SourceType {
        SourceType {
            ty: TypeDesc::of::<S>(),
            methods: self.methods,
        }
    }
}
