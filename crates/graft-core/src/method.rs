//! Forwarding thunks.
//!
//! A thunk is the type-erased body of one source method: it downcasts the
//! receiver, moves each argument out by exact type, calls the method and
//! boxes the result. Thunks are built once, when a source type is described,
//! and never inspect signatures again.

use std::any::Any;
use std::error::Error;
use std::sync::Arc;

use crate::fault::Fault;
use crate::interface::ParamList;
use crate::types::TypeDesc;
use crate::value::Value;

/// The wrapped instance as seen by a thunk.
pub type Target = dyn Any + Send + Sync;

/// Type-erased method body.
pub type Thunk = Arc<dyn Fn(&Target, Vec<Value>) -> Result<Value, Fault> + Send + Sync>;

/// A function usable as an infallible method of `S`: `Fn(&S, A1..An) -> R`.
pub trait IntoMethod<S, Args>: Send + Sync + 'static {
    fn params() -> Vec<TypeDesc>;

    fn returns() -> TypeDesc;

    fn into_thunk(self) -> Thunk;
}

/// A function usable as a fallible method of `S`: `Fn(&S, A1..An) -> Result<R, E>`.
///
/// The method's signature returns `R`; an `Err(e)` surfaces as
/// `Fault::Raised` holding `e`.
pub trait IntoFallibleMethod<S, Args>: Send + Sync + 'static {
    fn params() -> Vec<TypeDesc>;

    fn returns() -> TypeDesc;

    fn into_thunk(self) -> Thunk;
}

/// Moves arguments out of a call's argument vector by exact type.
struct ArgReader {
    args: std::vec::IntoIter<Value>,
    index: usize,
}

impl ArgReader {
    fn new(args: Vec<Value>, arity: usize) -> Result<Self, Fault> {
        if args.len() != arity {
            return Err(Fault::Arity {
                expected: arity,
                found: args.len(),
            });
        }
        Ok(Self {
            args: args.into_iter(),
            index: 0,
        })
    }

    fn next<T: Any>(&mut self) -> Result<T, Fault> {
        let index = self.index;
        self.index += 1;
        let value = self.args.next().ok_or(Fault::Arity {
            expected: index + 1,
            found: index,
        })?;
        value.downcast::<T>().map_err(|value| Fault::Argument {
            index,
            expected: TypeDesc::of::<T>(),
            found: value.ty(),
        })
    }
}

fn receiver<S: Any>(target: &Target) -> Result<&S, Fault> {
    target.downcast_ref::<S>().ok_or(Fault::Receiver {
        expected: TypeDesc::of::<S>(),
    })
}

macro_rules! impl_into_method {
    ($($arg:ident),*) => {
        impl<S, F, R, $($arg,)*> IntoMethod<S, ($($arg,)*)> for F
        where
            S: Any + Send + Sync,
            F: Fn(&S, $($arg),*) -> R + Send + Sync + 'static,
            R: Any + Send,
            $($arg: Any + Send,)*
        {
            fn params() -> Vec<TypeDesc> {
                <($($arg,)*) as ParamList>::types()
            }

            fn returns() -> TypeDesc {
                TypeDesc::of::<R>()
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_thunk(self) -> Thunk {
                let f = self;
                Arc::new(move |target: &Target, args: Vec<Value>| -> Result<Value, Fault> {
                    let this = receiver::<S>(target)?;
                    let mut reader = ArgReader::new(args, <($($arg,)*) as ParamList>::ARITY)?;
                    $(let $arg = reader.next::<$arg>()?;)*
                    Ok(Value::new(f(this, $($arg),*)))
                })
            }
        }

        impl<S, F, R, E, $($arg,)*> IntoFallibleMethod<S, ($($arg,)*)> for F
        where
            S: Any + Send + Sync,
            F: Fn(&S, $($arg),*) -> Result<R, E> + Send + Sync + 'static,
            R: Any + Send,
            E: Error + Send + Sync + 'static,
            $($arg: Any + Send,)*
        {
            fn params() -> Vec<TypeDesc> {
                <($($arg,)*) as ParamList>::types()
            }

            fn returns() -> TypeDesc {
                TypeDesc::of::<R>()
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_thunk(self) -> Thunk {
                let f = self;
                Arc::new(move |target: &Target, args: Vec<Value>| -> Result<Value, Fault> {
                    let this = receiver::<S>(target)?;
                    let mut reader = ArgReader::new(args, <($($arg,)*) as ParamList>::ARITY)?;
                    $(let $arg = reader.next::<$arg>()?;)*
                    match f(this, $($arg),*) {
                        Ok(value) => Ok(Value::new(value)),
                        Err(error) => Err(Fault::raised(error)),
                    }
                })
            }
        }
    };
}

for_each_arity!(impl_into_method);
