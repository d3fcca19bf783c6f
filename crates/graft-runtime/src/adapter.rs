//! Adapter instances and the typed interface facade.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use graft_core::{Fault, InterfaceDescriptor, Target, TypeDesc, Value};

use crate::synth::AdapterType;

/// An instance of a synthesized adapter type bound to one wrapped instance.
///
/// Cloning is cheap and shares both the adapter type and the target.
#[derive(Clone)]
pub struct Adapter {
    ty: Arc<AdapterType>,
    target: Arc<Target>,
}

impl Adapter {
    pub(crate) fn new(ty: Arc<AdapterType>, target: Arc<Target>) -> Self {
        Self { ty, target }
    }

    pub fn adapter_type(&self) -> &Arc<AdapterType> {
        &self.ty
    }

    pub fn interface(&self) -> &InterfaceDescriptor {
        self.ty.interface()
    }

    /// The wrapped instance.
    pub fn target(&self) -> &Arc<Target> {
        &self.target
    }

    pub fn target_as<S: Any>(&self) -> Option<&S> {
        (*self.target).downcast_ref::<S>()
    }

    /// Slot of the interface method `name(params...)`.
    pub fn slot(&self, name: &str, params: &[TypeDesc]) -> Option<usize> {
        self.interface().slot_of(name, params)
    }

    /// Call the forwarding method in `slot`. Errors raised by the wrapped
    /// method come back untouched as `Fault::Raised`; panics propagate.
    pub fn invoke(&self, slot: usize, args: Vec<Value>) -> Result<Value, Fault> {
        let method = self.ty.method(slot).ok_or(Fault::NoSuchSlot {
            slot,
            count: self.ty.methods().len(),
        })?;
        method.call(&*self.target, args)
    }

    /// `invoke`, then take the result out as `R`.
    pub fn invoke_typed<R: Any>(&self, slot: usize, args: Vec<Value>) -> Result<R, Fault> {
        self.invoke(slot, args)?.downcast::<R>().map_err(|value| Fault::Return {
            expected: TypeDesc::of::<R>(),
            found: value.ty(),
        })
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("type", &self.ty.name())
            .field("id", &self.ty.id())
            .finish_non_exhaustive()
    }
}

/// A statically typed view of an interface, normally declared with
/// [`interface!`](crate::interface).
pub trait Interface: Sized + Send + Sync + 'static {
    /// The interface's method set. Implementations should return the same
    /// `Arc` on every call.
    fn descriptor() -> Arc<InterfaceDescriptor>;

    fn from_adapter(adapter: Adapter) -> Self;

    fn adapter(&self) -> &Adapter;
}

/// Declare an interface: a struct wrapping an [`Adapter`] with one typed
/// forwarding method per declared method.
///
/// ```
/// use std::sync::Arc;
/// use graft_runtime::{interface, reflect};
///
/// interface! {
///     pub trait AddNumbers {
///         fn add(a: i32, b: i32) -> i32;
///     }
/// }
///
/// struct Target;
///
/// #[reflect]
/// impl Target {
///     pub fn add(&self, a: i32, b: i32) -> i32 {
///         a + b
///     }
/// }
///
/// let adder: AddNumbers = graft_runtime::build(Arc::new(Target)).unwrap();
/// assert_eq!(adder.add(5, 6).unwrap(), 11);
/// ```
///
/// Each generated method returns `Result<R, Fault>`; an error raised by the
/// wrapped method is the `Fault::Raised` payload.
#[macro_export]
macro_rules! interface {
    (@ret) => { () };
    (@ret $ret:ty) => { $ret };

    (@methods $name:ident, $slot:expr;) => {};
    (@methods $name:ident, $slot:expr;
        $(#[$meta:meta])* fn $method:ident ( $($arg:ident : $ty:ty),* ) -> $ret:ty;
        $($rest:tt)*
    ) => {
        impl $name {
            $(#[$meta])*
            #[allow(clippy::too_many_arguments)]
            pub fn $method(&self, $($arg: $ty),*) -> ::std::result::Result<$ret, $crate::Fault> {
                $crate::Interface::adapter(self)
                    .invoke_typed::<$ret>($slot, vec![$($crate::Value::new($arg)),*])
            }
        }

        $crate::interface!(@methods $name, $slot + 1usize; $($rest)*);
    };

    (
        $(#[$attr:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$meta:meta])*
                fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) $(-> $ret:ty)? ;
            )*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug)]
        $vis struct $name {
            adapter: $crate::Adapter,
        }

        impl $crate::Interface for $name {
            fn descriptor() -> ::std::sync::Arc<$crate::InterfaceDescriptor> {
                static DESCRIPTOR: ::std::sync::OnceLock<::std::sync::Arc<$crate::InterfaceDescriptor>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(DESCRIPTOR.get_or_init(|| {
                    ::std::sync::Arc::new(
                        $crate::InterfaceDescriptor::builder(stringify!($name))
                            $(
                                .signature($crate::MethodSig::new(
                                    stringify!($method),
                                    vec![$($crate::TypeDesc::of::<$ty>()),*],
                                    $crate::TypeDesc::of::<$crate::interface!(@ret $($ret)?)>(),
                                ))
                            )*
                            .build(),
                    )
                }))
            }

            fn from_adapter(adapter: $crate::Adapter) -> Self {
                Self { adapter }
            }

            fn adapter(&self) -> &$crate::Adapter {
                &self.adapter
            }
        }

        $crate::interface!(@methods $name, 0usize; $(
            $(#[$meta])* fn $method ( $($arg : $ty),* ) -> $crate::interface!(@ret $($ret)?);
        )*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;
    use crate::universe::TypeUniverse;
    use graft_core::{Reflect, TypeBuilder};

    crate::interface! {
        trait Greeter {
            fn greet(name: String) -> String;
            fn reset();
        }
    }

    struct Host {
        greeting: &'static str,
    }

    impl Host {
        fn greet(&self, name: String) -> String {
            format!("{}, {}", self.greeting, name)
        }

        fn reset(&self) {}
    }

    impl Reflect for Host {
        fn describe(ty: &mut TypeBuilder<Self>) {
            ty.method("greet", Host::greet).method("reset", Host::reset);
        }
    }

    fn greeter() -> Greeter {
        TypeUniverse::new(AdapterConfig::default())
            .build(Arc::new(Host { greeting: "hello" }))
            .unwrap()
    }

    #[test]
    fn test_descriptor_is_stable() {
        let a = Greeter::descriptor();
        assert!(Arc::ptr_eq(&a, &Greeter::descriptor()));
        assert_eq!(a.name(), "Greeter");
        assert_eq!(a.method(0).unwrap().to_string(), "greet(String) -> String");
        assert_eq!(a.method(1).unwrap().to_string(), "reset() -> ()");
    }

    #[test]
    fn test_typed_calls() {
        let greeter = greeter();
        assert_eq!(greeter.greet("bob".to_string()).unwrap(), "hello, bob");
        greeter.reset().unwrap();
        assert_eq!(greeter.adapter().target_as::<Host>().map(|h| h.greeting), Some("hello"));
    }

    #[test]
    fn test_dynamic_invoke_misuse() {
        let greeter = greeter();
        let adapter = greeter.adapter();
        assert_eq!(adapter.slot("reset", &[]), Some(1));

        let err = adapter.invoke(7, vec![]).unwrap_err();
        assert!(matches!(err, Fault::NoSuchSlot { slot: 7, count: 2 }));

        let err = adapter.invoke_typed::<i32>(1, vec![]).unwrap_err();
        assert!(matches!(err, Fault::Return { .. }));

        let err = adapter.invoke(0, vec![Value::new(1u8)]).unwrap_err();
        assert!(matches!(err, Fault::Argument { index: 0, .. }));
    }
}
