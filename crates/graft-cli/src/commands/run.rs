use std::sync::Arc;

use anyhow::{Context, Result};
use graft_runtime::TypeUniverse;

use crate::demo::{AddNumbers, Target};

/// Adapt the demo `Target` to `AddNumbers` and call `add(a, b)`.
pub fn run(universe: &TypeUniverse, a: i32, b: i32) -> Result<i32> {
    let adder: AddNumbers = universe
        .build(Arc::new(Target))
        .context("cannot adapt Target to AddNumbers")?;
    Ok(adder.add(a, b)?)
}
