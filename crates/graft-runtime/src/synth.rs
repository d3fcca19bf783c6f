//! Adapter type synthesis.
//!
//! An `AdapterType` is the runtime counterpart of a generated class: a name,
//! the interface it implements, the source type it wraps, and one forwarding
//! method per interface slot. Each forwarding method holds the matched
//! source thunk directly, so a call never re-examines signatures.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use graft_core::{Fault, InterfaceDescriptor, MethodSig, SourceType, Target, Thunk, TypeDesc, Value};

use crate::adapter::Adapter;
use crate::error::SynthesisError;
use crate::matcher::MatchTable;

/// Process-unique id of a synthesized adapter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterTypeId(u64);

impl AdapterTypeId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AdapterTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One slot of an adapter type.
#[derive(Clone)]
pub struct ForwardingMethod {
    sig: MethodSig,
    source_index: usize,
    thunk: Thunk,
}

impl ForwardingMethod {
    /// The interface signature this slot implements.
    pub fn sig(&self) -> &MethodSig {
        &self.sig
    }

    /// Index of the forwarded-to method in the source type's registration order.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    #[inline]
    pub(crate) fn call(&self, target: &Target, args: Vec<Value>) -> Result<Value, Fault> {
        (self.thunk)(target, args)
    }
}

impl fmt::Debug for ForwardingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardingMethod")
            .field("sig", &self.sig)
            .field("source_index", &self.source_index)
            .finish_non_exhaustive()
    }
}

pub struct AdapterType {
    id: AdapterTypeId,
    name: String,
    interface: Arc<InterfaceDescriptor>,
    source: TypeDesc,
    methods: Box<[ForwardingMethod]>,
}

impl AdapterType {
    #[inline]
    pub fn id(&self) -> AdapterTypeId {
        self.id
    }

    /// `From{Interface}To{Source}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interface(&self) -> &Arc<InterfaceDescriptor> {
        &self.interface
    }

    pub fn source(&self) -> TypeDesc {
        self.source
    }

    /// Forwarding methods in interface slot order.
    pub fn methods(&self) -> &[ForwardingMethod] {
        &self.methods
    }

    pub fn method(&self, slot: usize) -> Option<&ForwardingMethod> {
        self.methods.get(slot)
    }

    /// Bind a wrapped instance. The instance must be of the source type this
    /// adapter type was synthesized for.
    pub fn instantiate(self: &Arc<Self>, target: Arc<Target>) -> Result<Adapter, SynthesisError> {
        if (*target).type_id() != self.source.id() {
            return Err(SynthesisError::TargetMismatch {
                adapter: self.name.clone(),
                expected: self.source,
            });
        }
        Ok(Adapter::new(Arc::clone(self), target))
    }
}

impl fmt::Debug for AdapterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("source", &self.source)
            .field("methods", &self.methods)
            .finish()
    }
}

pub fn adapter_type_name(interface: &InterfaceDescriptor, source: &SourceType) -> String {
    format!("From{}To{}", interface.name(), source.name())
}

/// Emit the adapter type for a resolved match table. Forwarding methods must
/// have the interface's exact signature, so a source method that matched on
/// name and parameters but returns another type is rejected here.
pub fn synthesize(
    id: AdapterTypeId,
    interface: Arc<InterfaceDescriptor>,
    source: &SourceType,
    table: MatchTable,
) -> Result<AdapterType, SynthesisError> {
    let mut methods = Vec::with_capacity(table.len());
    for entry in table.into_entries() {
        let wanted = &interface.methods()[entry.slot];
        let found = &source.methods()[entry.source_index];
        if wanted.ret != found.sig.ret {
            return Err(SynthesisError::ReturnTypeMismatch {
                interface: interface.name().to_string(),
                source_type: source.name(),
                method: wanted.display_call(),
                expected: wanted.ret,
                found: found.sig.ret,
            });
        }
        methods.push(ForwardingMethod {
            sig: wanted.clone(),
            source_index: entry.source_index,
            thunk: Arc::clone(&found.thunk),
        });
    }

    Ok(AdapterType {
        id,
        name: adapter_type_name(&interface, source),
        interface,
        source: source.ty(),
        methods: methods.into_boxed_slice(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmbiguityPolicy;
    use crate::matcher::resolve;

    struct Target;

    impl Target {
        fn add(&self, a: i32, b: i32) -> i32 {
            a + b
        }
    }

    fn source() -> SourceType {
        let mut builder = SourceType::builder::<Target>();
        builder.method("add", Target::add);
        builder.build()
    }

    fn emit(interface: InterfaceDescriptor) -> Result<AdapterType, SynthesisError> {
        let source = source();
        let table = resolve(&interface, &source, AmbiguityPolicy::Reject).unwrap();
        synthesize(AdapterTypeId::new(1), Arc::new(interface), &source, table)
    }

    #[test]
    fn test_synthesize_names_and_slots() {
        let ty = emit(InterfaceDescriptor::builder("AddNumbers").method::<(i32, i32), i32>("add").build()).unwrap();
        assert_eq!(ty.name(), "FromAddNumbersToTarget");
        assert_eq!(ty.methods().len(), 1);
        assert_eq!(ty.method(0).unwrap().sig().to_string(), "add(i32, i32) -> i32");

        let out = ty.method(0).unwrap().call(&Target, vec![Value::new(2), Value::new(3)]).unwrap();
        assert_eq!(out.downcast::<i32>().ok(), Some(5));
    }

    #[test]
    fn test_return_mismatch_is_a_synthesis_failure() {
        let err = emit(InterfaceDescriptor::builder("Wide").method::<(i32, i32), i64>("add").build()).unwrap_err();
        assert!(matches!(err, SynthesisError::ReturnTypeMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "`Wide` declares `add(i32, i32)` returning `i64`, but `Target` returns `i32`"
        );
    }

    #[test]
    fn test_instantiate_checks_target_type() {
        let ty = Arc::new(emit(InterfaceDescriptor::builder("AddNumbers").method::<(i32, i32), i32>("add").build()).unwrap());
        assert!(ty.instantiate(Arc::new(Target)).is_ok());
        let err = ty.instantiate(Arc::new(42u8)).unwrap_err();
        assert!(matches!(err, SynthesisError::TargetMismatch { .. }));
    }
}
