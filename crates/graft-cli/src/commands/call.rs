use std::sync::Arc;

use anyhow::{Context, Result};
use graft_runtime::{InterfaceDescriptor, SourceType, TypeUniverse, Value};

use crate::demo::Target;

/// Adapt the demo `Target` to a one-method interface `method(i32, i32) -> i32`
/// described at runtime, then call it.
pub fn call(universe: &TypeUniverse, method: &str, a: i32, b: i32) -> Result<i32> {
    let interface = Arc::new(
        InterfaceDescriptor::builder("Call")
            .method::<(i32, i32), i32>(method)
            .build(),
    );
    let adapter = universe.build_dynamic(interface, &SourceType::of::<Target>(), Arc::new(Target))?;
    let value = adapter
        .invoke_typed::<i32>(0, vec![Value::new(a), Value::new(b)])
        .with_context(|| format!("{}({}, {}) failed", method, a, b))?;
    Ok(value)
}
