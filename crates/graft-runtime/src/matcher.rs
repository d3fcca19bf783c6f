//! Signature matching.
//!
//! An interface method matches a source method when the names are equal and
//! the parameter type sequences are element-wise identical. Return types do
//! not take part in matching. Resolution either matches every interface
//! method or fails.

use graft_core::{InterfaceDescriptor, MethodSig, SourceType};
use hashbrown::HashMap;
use tracing::trace;

use crate::config::AmbiguityPolicy;
use crate::error::MatchError;

/// One resolved pair: interface slot to source method index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchEntry {
    pub slot: usize,
    pub source_index: usize,
}

/// Complete resolution of an interface against a source type, one entry per
/// interface method in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchTable {
    entries: Vec<MatchEntry>,
}

impl MatchTable {
    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<MatchEntry> {
        self.entries
    }
}

/// Match every method of `interface` against `source`.
pub fn resolve(
    interface: &InterfaceDescriptor,
    source: &SourceType,
    policy: AmbiguityPolicy,
) -> Result<MatchTable, MatchError> {
    // Candidates by name, each list in registration order.
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, method) in source.methods().iter().enumerate() {
        by_name.entry(method.sig.name.as_str()).or_default().push(index);
    }

    let mut entries = Vec::with_capacity(interface.len());
    for (slot, wanted) in interface.methods().iter().enumerate() {
        let candidates: Vec<usize> = by_name
            .get(wanted.name.as_str())
            .map(|indices| {
                indices
                    .iter()
                    .copied()
                    .filter(|&i| source.methods()[i].sig.matches(wanted))
                    .collect()
            })
            .unwrap_or_default();

        let source_index = match candidates.as_slice() {
            [] => return Err(no_match(wanted, source)),
            [only] => *only,
            [first, ..] => match policy {
                AmbiguityPolicy::FirstMatch => *first,
                AmbiguityPolicy::Reject => {
                    return Err(MatchError::AmbiguousMatch {
                        method: wanted.name.clone(),
                        params: wanted.params.clone(),
                        source_type: source.name(),
                        candidates: candidates.len(),
                    })
                }
            },
        };
        trace!(
            interface = interface.name(),
            source = source.name(),
            slot,
            source_index,
            method = %wanted,
            "matched"
        );
        entries.push(MatchEntry { slot, source_index });
    }

    Ok(MatchTable { entries })
}

fn no_match(wanted: &MethodSig, source: &SourceType) -> MatchError {
    MatchError::NoMatchingMethod {
        method: wanted.name.clone(),
        params: wanted.params.clone(),
        source_type: source.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graft_core::{Reflect, TypeBuilder};
    use pretty_assertions::assert_eq;

    struct Calc;

    impl Calc {
        fn add(&self, a: i32, b: i32) -> i32 {
            a + b
        }

        fn add_wide(&self, a: i64, b: i64) -> i64 {
            a + b
        }

        fn add_other(&self, a: i32, b: i32) -> i32 {
            a.wrapping_add(b)
        }

        fn name(&self) -> String {
            "calc".to_string()
        }
    }

    impl Reflect for Calc {
        fn describe(ty: &mut TypeBuilder<Self>) {
            ty.method("add", Calc::add)
                .method("add", Calc::add_wide)
                .method("name", Calc::name);
        }
    }

    fn calc() -> SourceType {
        SourceType::of::<Calc>()
    }

    #[test]
    fn test_resolves_overloads_by_parameter_types() {
        let iface = InterfaceDescriptor::builder("Wide")
            .method::<(), String>("name")
            .method::<(i64, i64), i64>("add")
            .build();
        let table = resolve(&iface, &calc(), AmbiguityPolicy::Reject).unwrap();
        assert_eq!(
            table.entries(),
            &[
                MatchEntry { slot: 0, source_index: 2 },
                MatchEntry { slot: 1, source_index: 1 },
            ]
        );
    }

    #[test]
    fn test_return_type_is_ignored() {
        let iface = InterfaceDescriptor::builder("AddNumbers")
            .method::<(i32, i32), i64>("add")
            .build();
        let table = resolve(&iface, &calc(), AmbiguityPolicy::Reject).unwrap();
        assert_eq!(table.entries()[0].source_index, 0);
    }

    #[test]
    fn test_failure_is_atomic() {
        let iface = InterfaceDescriptor::builder("FooBar")
            .method::<(i32, i32), i32>("add")
            .method::<(), ()>("bar")
            .build();
        let err = resolve(&iface, &calc(), AmbiguityPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            MatchError::NoMatchingMethod {
                method: "bar".into(),
                params: vec![],
                source_type: "Calc",
            }
        );
    }

    #[test]
    fn test_parameter_order_matters() {
        let iface = InterfaceDescriptor::builder("Mixed")
            .method::<(i32, i64), i32>("add")
            .build();
        let err = resolve(&iface, &calc(), AmbiguityPolicy::FirstMatch).unwrap_err();
        assert_eq!(err.method(), "add");
    }

    #[test]
    fn test_empty_interface_always_resolves() {
        let iface = InterfaceDescriptor::builder("Any").build();
        let table = resolve(&iface, &calc(), AmbiguityPolicy::Reject).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_ambiguity_policy() {
        let mut builder = SourceType::builder::<Calc>();
        builder.method("add", Calc::add).method("add", Calc::add_other);
        let source = builder.build();
        let iface = InterfaceDescriptor::builder("AddNumbers")
            .method::<(i32, i32), i32>("add")
            .build();

        let err = resolve(&iface, &source, AmbiguityPolicy::Reject).unwrap_err();
        assert!(matches!(err, MatchError::AmbiguousMatch { candidates: 2, .. }));

        let table = resolve(&iface, &source, AmbiguityPolicy::FirstMatch).unwrap();
        assert_eq!(table.entries()[0].source_index, 0);
    }
}
