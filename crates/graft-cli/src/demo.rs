//! The demo source type and interface.

use graft_runtime::{interface, reflect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow")]
    Overflow,
}

#[derive(Debug, Default)]
pub struct Target;

#[reflect]
impl Target {
    pub fn add(&self, a: i32, b: i32) -> i32 {
        a.wrapping_add(b)
    }

    pub fn sub(&self, a: i32, b: i32) -> i32 {
        a.wrapping_sub(b)
    }

    pub fn mul(&self, a: i32, b: i32) -> Result<i32, ArithmeticError> {
        a.checked_mul(b).ok_or(ArithmeticError::Overflow)
    }

    pub fn div(&self, a: i32, b: i32) -> Result<i32, ArithmeticError> {
        if b == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        a.checked_div(b).ok_or(ArithmeticError::Overflow)
    }
}

interface! {
    pub trait AddNumbers {
        fn add(a: i32, b: i32) -> i32;
    }
}
