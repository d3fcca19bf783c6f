//! Interface descriptors: the capability set an adapter must satisfy.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::types::{MethodSig, TypeDesc};

/// Structural fingerprint of an interface: its name plus every method
/// signature, return types included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId(u64);

impl InterfaceId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Ordered set of method signatures under a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    id: InterfaceId,
    name: String,
    methods: Vec<MethodSig>,
}

impl InterfaceDescriptor {
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> InterfaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Methods in slot order.
    pub fn methods(&self) -> &[MethodSig] {
        &self.methods
    }

    pub fn method(&self, slot: usize) -> Option<&MethodSig> {
        self.methods.get(slot)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Slot of the first method declared with this name and parameter list.
    pub fn slot_of(&self, name: &str, params: &[TypeDesc]) -> Option<usize> {
        self.methods.iter().position(|m| m.accepts(name, params))
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder for `InterfaceDescriptor`.
#[derive(Debug, Clone)]
pub struct InterfaceBuilder {
    name: String,
    methods: Vec<MethodSig>,
}

impl InterfaceBuilder {
    /// Declare `name(P...) -> R`, with `P` given as a tuple.
    pub fn method<P: ParamList, R: Any>(self, name: impl Into<String>) -> Self {
        self.signature(MethodSig::new(name, P::types(), TypeDesc::of::<R>()))
    }

    pub fn signature(mut self, sig: MethodSig) -> Self {
        self.methods.push(sig);
        self
    }

    pub fn build(self) -> InterfaceDescriptor {
        let mut hasher = FxHasher::default();
        self.name.hash(&mut hasher);
        self.methods.hash(&mut hasher);
        InterfaceDescriptor {
            id: InterfaceId(hasher.finish()),
            name: self.name,
            methods: self.methods,
        }
    }
}

/// A tuple of parameter types.
pub trait ParamList: 'static {
    const ARITY: usize;

    fn types() -> Vec<TypeDesc>;
}

macro_rules! impl_param_list {
    ($($arg:ident),*) => {
        impl<$($arg: Any,)*> ParamList for ($($arg,)*) {
            const ARITY: usize = 0 $(+ one!($arg))*;

            fn types() -> Vec<TypeDesc> {
                vec![$(TypeDesc::of::<$arg>()),*]
            }
        }
    };
}

for_each_arity!(impl_param_list);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn add_numbers() -> InterfaceDescriptor {
        InterfaceDescriptor::builder("AddNumbers")
            .method::<(i32, i32), i32>("add")
            .build()
    }

    #[test]
    fn test_param_list() {
        assert_eq!(<() as ParamList>::ARITY, 0);
        assert_eq!(<(i32, String) as ParamList>::ARITY, 2);
        assert_eq!(
            <(i32, String) as ParamList>::types(),
            vec![TypeDesc::of::<i32>(), TypeDesc::of::<String>()]
        );
    }

    #[test]
    fn test_identity_is_structural() {
        assert_eq!(add_numbers().id(), add_numbers().id());

        let renamed = InterfaceDescriptor::builder("Adder")
            .method::<(i32, i32), i32>("add")
            .build();
        assert_ne!(add_numbers().id(), renamed.id());

        let widened = InterfaceDescriptor::builder("AddNumbers")
            .method::<(i32, i32), i64>("add")
            .build();
        assert_ne!(add_numbers().id(), widened.id());
    }

    #[test]
    fn test_slot_of() {
        let iface = InterfaceDescriptor::builder("Calc")
            .method::<(i32, i32), i32>("add")
            .method::<(i64, i64), i64>("add")
            .method::<(), ()>("reset")
            .build();
        assert_eq!(iface.len(), 3);
        assert_eq!(iface.slot_of("add", &<(i64, i64)>::types()), Some(1));
        assert_eq!(iface.slot_of("reset", &[]), Some(2));
        assert_eq!(iface.slot_of("add", &[]), None);
    }

    #[test]
    fn test_empty_interface() {
        let iface = InterfaceDescriptor::builder("Marker").build();
        assert!(iface.is_empty());
        assert_eq!(iface.method(0), None);
    }
}
