//! Errors raised while forwarding a call.

use std::error::Error;

use crate::types::TypeDesc;

/// Failure of a single forwarded call.
///
/// `Raised` carries the error returned by the wrapped method itself, boxed
/// but otherwise untouched. Every other variant reports a misuse of the
/// dynamic call path (wrong argument count or types), which the typed
/// `interface!` facade rules out.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error("{0}")]
    Raised(Box<dyn Error + Send + Sync + 'static>),

    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },

    #[error("argument {index}: expected `{expected}`, found `{found}`")]
    Argument {
        index: usize,
        expected: TypeDesc,
        found: TypeDesc,
    },

    #[error("receiver is not a `{expected}`")]
    Receiver { expected: TypeDesc },

    #[error("no forwarding method in slot {slot} (adapter has {count})")]
    NoSuchSlot { slot: usize, count: usize },

    #[error("return value: expected `{expected}`, found `{found}`")]
    Return { expected: TypeDesc, found: TypeDesc },
}

impl Fault {
    pub fn raised<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Fault::Raised(Box::new(error))
    }

    pub fn is_raised(&self) -> bool {
        matches!(self, Fault::Raised(_))
    }

    /// The wrapped method's error as its concrete type.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            Fault::Raised(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take back the wrapped method's error.
    pub fn into_raised(self) -> Result<Box<dyn Error + Send + Sync + 'static>, Fault> {
        match self {
            Fault::Raised(inner) => Ok(inner),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("boom {0}")]
    struct Boom(u8);

    #[test]
    fn test_raised_keeps_identity() {
        let fault = Fault::raised(Boom(7));
        assert!(fault.is_raised());
        assert_eq!(fault.to_string(), "boom 7");
        assert_eq!(fault.downcast_ref::<Boom>(), Some(&Boom(7)));

        let inner = fault.into_raised().unwrap();
        assert_eq!(inner.downcast::<Boom>().ok().map(|b| *b), Some(Boom(7)));
    }

    #[test]
    fn test_misuse_is_not_raised() {
        let fault = Fault::Arity { expected: 2, found: 1 };
        assert!(!fault.is_raised());
        assert!(fault.downcast_ref::<Boom>().is_none());
        assert_eq!(fault.to_string(), "expected 2 argument(s), got 1");
    }
}
