//! Errors raised while resolving and synthesizing adapters.

use graft_core::types::format_call;
use graft_core::{InterfaceId, TypeDesc};
use thiserror::Error;

/// Signature resolution failed. Resolution is all-or-nothing: one
/// unmatched interface method fails the whole build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no method `{}` on `{source_type}`", format_call(.method, .params))]
    NoMatchingMethod {
        method: String,
        params: Vec<TypeDesc>,
        source_type: &'static str,
    },

    #[error(
        "method `{}` on `{source_type}` is ambiguous: {candidates} candidates",
        format_call(.method, .params)
    )]
    AmbiguousMatch {
        method: String,
        params: Vec<TypeDesc>,
        source_type: &'static str,
        candidates: usize,
    },
}

impl MatchError {
    /// Name of the interface method that could not be resolved.
    pub fn method(&self) -> &str {
        match self {
            MatchError::NoMatchingMethod { method, .. } | MatchError::AmbiguousMatch { method, .. } => method,
        }
    }

    pub fn params(&self) -> &[TypeDesc] {
        match self {
            MatchError::NoMatchingMethod { params, .. } | MatchError::AmbiguousMatch { params, .. } => params,
        }
    }
}

/// Emitting or instantiating an adapter type failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error(
        "`{interface}` declares `{method}` returning `{expected}`, but `{source_type}` returns `{found}`"
    )]
    ReturnTypeMismatch {
        interface: String,
        source_type: &'static str,
        method: String,
        expected: TypeDesc,
        found: TypeDesc,
    },

    #[error("interface `{interface}` collides with a different interface under id {id}")]
    IdentityCollision { interface: String, id: InterfaceId },

    #[error("adapter `{adapter}` wraps `{expected}` and cannot bind an instance of another type")]
    TargetMismatch { adapter: String, expected: TypeDesc },
}

/// Why `build` produced no adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    ResolutionFailed(#[from] MatchError),

    #[error(transparent)]
    SynthesisFailure(#[from] SynthesisError),
}

impl BuildError {
    pub fn as_match(&self) -> Option<&MatchError> {
        match self {
            BuildError::ResolutionFailed(err) => Some(err),
            BuildError::SynthesisFailure(_) => None,
        }
    }
}
