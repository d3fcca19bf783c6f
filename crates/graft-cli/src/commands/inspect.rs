use std::fmt::Write;
use std::sync::Arc;

use anyhow::Result;
use graft_runtime::{InterfaceDescriptor, SourceType, TypeUniverse};

use crate::demo::Target;

/// Synthesize the adapter type for an interface made of `methods`, each
/// `(i32, i32) -> i32`, over the demo `Target`, and describe it.
pub fn inspect(universe: &TypeUniverse, methods: &[String]) -> Result<String> {
    let source = SourceType::of::<Target>();
    let interface = methods
        .iter()
        .fold(InterfaceDescriptor::builder("Inspect"), |builder, name| {
            builder.method::<(i32, i32), i32>(name.as_str())
        })
        .build();
    let adapter = universe.build_dynamic(Arc::new(interface), &source, Arc::new(Target))?;
    let ty = adapter.adapter_type();

    let mut out = String::new();
    writeln!(out, "{} {}", ty.name(), ty.id())?;
    writeln!(out, "  interface {} ({})", ty.interface().name(), ty.interface().id())?;
    writeln!(out, "  source {}", ty.source())?;
    for (slot, method) in ty.methods().iter().enumerate() {
        let target = &source.methods()[method.source_index()];
        writeln!(
            out,
            "  [{}] {} => {}::{}",
            slot,
            method.sig(),
            source.name(),
            target.sig.name
        )?;
    }

    let stats = universe.stats();
    writeln!(
        out,
        "  minted {}, cache {}/{} ({} hits, {} misses, {} evictions)",
        stats.minted, stats.cache.len, stats.cache.capacity, stats.cache.hits, stats.cache.misses, stats.cache.evictions
    )?;
    Ok(out)
}
