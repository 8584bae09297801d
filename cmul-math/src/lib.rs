//! # cmul-math
//!
//! Exact bit-width-parameterized integer arithmetic for the cmul kernel.
//!
//! This crate provides [`FixedInt`], an integer confined to a declared
//! [`Format`] (bit width + signedness), [`ComplexFixed`], a pair of such
//! values sharing one format, and [`multiply`], the exact complex product
//! with inferred output width `W1 + W2 + 1`.
//!
//! Values are backed by `i128`, so every format up to [`MAX_WIDTH`] bits is
//! representable. Construction rejects out-of-range values; nothing truncates
//! unless the caller asks for [`FixedInt::wrapping`].
//!
//! **No external dependencies** besides `thiserror` and `serde`, so it can be audited in isolation.

pub mod complex;
pub mod fixed_point;
pub mod multiplier;
pub mod ops;

pub use complex::ComplexFixed;
pub use fixed_point::{FixedInt, FixedPointError, Format, MAX_WIDTH};
pub use multiplier::{multiply, multiply_as};
