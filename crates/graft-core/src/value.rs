//! Type-erased values passed through forwarding methods.

use std::any::Any;
use std::fmt;

use crate::types::TypeDesc;

/// An owned value of any `Send` type, tagged with its `TypeDesc`.
pub struct Value {
    ty: TypeDesc,
    data: Box<dyn Any + Send>,
}

impl Value {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            ty: TypeDesc::of::<T>(),
            data: Box::new(value),
        }
    }

    pub fn unit() -> Self {
        Self::new(())
    }

    #[inline]
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    /// Take the value out as `T`, or give it back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Value> {
        let Value { ty, data } = self;
        match data.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(data) => Err(Value { ty, data }),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.ty)
    }
}
