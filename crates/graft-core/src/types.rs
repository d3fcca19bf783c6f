//! Type descriptors and method signatures.
//!
//! A `TypeDesc` is the runtime identity of a Rust type. Two descriptors are
//! equal iff their `TypeId`s are equal; the name only exists for messages.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime identity of a Rust type.
#[derive(Clone, Copy)]
pub struct TypeDesc {
    id: TypeId,
    name: &'static str,
}

impl TypeDesc {
    pub fn of<T: ?Sized + Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified name as reported by `std::any::type_name`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name without module path, e.g. `Target` for `demo::Target`.
    pub fn short_name(&self) -> &'static str {
        short_name(self.name)
    }

    #[inline]
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Strip the module path of a type name, keeping generic arguments intact.
pub fn short_name(full: &'static str) -> &'static str {
    let head_end = full.find('<').unwrap_or(full.len());
    match full[..head_end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

/// A method's name, ordered parameter types and return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<TypeDesc>,
    pub ret: TypeDesc,
}

impl MethodSig {
    pub fn new(name: impl Into<String>, params: Vec<TypeDesc>, ret: TypeDesc) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
        }
    }

    /// Match key: same name and element-wise identical parameter types.
    /// The return type does not take part.
    pub fn matches(&self, other: &MethodSig) -> bool {
        self.accepts(&other.name, &other.params)
    }

    pub fn accepts(&self, name: &str, params: &[TypeDesc]) -> bool {
        self.name == name && self.params.as_slice() == params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `name(A, B)` without the return type.
    pub fn display_call(&self) -> String {
        format_call(&self.name, &self.params)
    }
}

impl fmt::Display for MethodSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.display_call(), self.ret)
    }
}

/// Render a call shape as `name(A, B)`.
pub fn format_call(name: &str, params: &[TypeDesc]) -> String {
    let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    format!("{}({})", name, params.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Local;

    #[test]
    fn test_type_desc_identity() {
        assert_eq!(TypeDesc::of::<i32>(), TypeDesc::of::<i32>());
        assert_ne!(TypeDesc::of::<i32>(), TypeDesc::of::<i64>());
        assert!(TypeDesc::of::<String>().is::<String>());
    }

    #[test]
    fn test_short_name() {
        assert_eq!(TypeDesc::of::<Local>().short_name(), "Local");
        assert_eq!(TypeDesc::of::<String>().short_name(), "String");
        assert_eq!(short_name("a::b::Wrap<c::D>"), "Wrap<c::D>");
        assert_eq!(short_name("i32"), "i32");
    }

    #[test]
    fn test_match_ignores_return_type() {
        let a = MethodSig::new("add", vec![TypeDesc::of::<i32>(), TypeDesc::of::<i32>()], TypeDesc::of::<i32>());
        let b = MethodSig::new("add", vec![TypeDesc::of::<i32>(), TypeDesc::of::<i32>()], TypeDesc::of::<i64>());
        assert!(a.matches(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_match_is_order_and_count_sensitive() {
        let a = MethodSig::new("f", vec![TypeDesc::of::<i32>(), TypeDesc::of::<u8>()], TypeDesc::of::<()>());
        let swapped = MethodSig::new("f", vec![TypeDesc::of::<u8>(), TypeDesc::of::<i32>()], TypeDesc::of::<()>());
        let shorter = MethodSig::new("f", vec![TypeDesc::of::<i32>()], TypeDesc::of::<()>());
        assert!(!a.matches(&swapped));
        assert!(!a.matches(&shorter));
    }

    #[test]
    fn test_display() {
        let sig = MethodSig::new("add", vec![TypeDesc::of::<i32>(), TypeDesc::of::<i32>()], TypeDesc::of::<i32>());
        assert_eq!(sig.to_string(), "add(i32, i32) -> i32");
        assert_eq!(sig.display_call(), "add(i32, i32)");
    }
}
