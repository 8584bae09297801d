use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Widest supported format. Any `i128` holds the full range of a
/// 127-bit signed or unsigned value.
pub const MAX_WIDTH: u32 = 127;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Invalid width: {0} (must be 1..=127)")]
    InvalidWidth(u32),
    #[error("Value {value} out of range for {format}")]
    OutOfRange { value: i128, format: Format },
    /// `value` is saturated to the `i128` bounds when the exact result exceeds them.
    #[error("Result {value} overflows {format}")]
    Overflow { value: i128, format: Format },
    #[error("Format mismatch: {0} vs {1}")]
    FormatMismatch(Format, Format),
}

/// Bit width and signedness of a fixed-point integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFormat")]
pub struct Format {
    width: u32,
    signed: bool,
}

impl Format {
    pub fn new(width: u32, signed: bool) -> Result<Self, FixedPointError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(FixedPointError::InvalidWidth(width));
        }
        Ok(Self { width, signed })
    }

    pub fn signed(width: u32) -> Result<Self, FixedPointError> {
        Self::new(width, true)
    }

    pub fn unsigned(width: u32) -> Result<Self, FixedPointError> {
        Self::new(width, false)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Smallest representable value (two's complement when signed)
    pub fn min(&self) -> i128 {
        if self.signed {
            -(1i128 << (self.width - 1))
        } else {
            0
        }
    }

    /// Largest representable value
    pub fn max(&self) -> i128 {
        if self.signed {
            (1i128 << (self.width - 1)) - 1
        } else {
            i128::MAX >> (MAX_WIDTH - self.width)
        }
    }

    pub fn contains(&self, value: i128) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// Format of the full-precision product of `a` and `b`.
    ///
    /// `W = Wa + Wb`, signed if either factor is signed.
    pub fn product(a: Format, b: Format) -> Result<Self, FixedPointError> {
        Self::new(a.width + b.width, a.signed || b.signed)
    }

    /// Format of the exact sum or difference of two equal-format values.
    ///
    /// One extra bit covers the worst-case carry.
    pub fn sum(a: Format, b: Format) -> Result<Self, FixedPointError> {
        if a != b {
            return Err(FixedPointError::FormatMismatch(a, b));
        }
        Self::new(a.width + 1, a.signed)
    }

    /// Format of `re*re' - im*im'` and `re*im' + im*re'`: `W1 + W2 + 1`.
    pub fn complex_product(a: Format, b: Format) -> Result<Self, FixedPointError> {
        let p = Self::product(a, b)?;
        Self::sum(p, p)
    }
}

// Deserialization goes through `Format::new` so widths stay validated.
#[derive(Deserialize)]
struct RawFormat {
    width: u32,
    signed: bool,
}

impl TryFrom<RawFormat> for Format {
    type Error = FixedPointError;

    fn try_from(raw: RawFormat) -> Result<Self, Self::Error> {
        Format::new(raw.width, raw.signed)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.signed { 'i' } else { 'u' };
        write!(f, "{}{}", prefix, self.width)
    }
}

/// An integer confined to a [`Format`].
///
/// Immutable: arithmetic in [`crate::ops`] returns new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedInt {
    value: i128,
    format: Format,
}

impl FixedInt {
    /// Build a value, rejecting anything outside `format`'s range.
    pub fn new(value: i128, format: Format) -> Result<Self, FixedPointError> {
        if !format.contains(value) {
            return Err(FixedPointError::OutOfRange { value, format });
        }
        Ok(Self { value, format })
    }

    /// Build a value by keeping only the low `width` bits of `value`
    /// (register-assignment semantics). Never fails.
    pub fn wrapping(value: i128, format: Format) -> Self {
        let width = format.width();
        let low = value & (i128::MAX >> (MAX_WIDTH - width));
        let value = if format.is_signed() && (low >> (width - 1)) & 1 == 1 {
            low.wrapping_sub(1i128 << width)
        } else {
            low
        };
        Self { value, format }
    }

    pub fn zero(format: Format) -> Self {
        Self { value: 0, format }
    }

    pub fn value(&self) -> i128 {
        self.value
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.format.width()
    }

    pub fn is_signed(&self) -> bool {
        self.format.is_signed()
    }

    /// Re-express the same value in another format if it fits.
    pub fn convert(&self, format: Format) -> Result<Self, FixedPointError> {
        Self::new(self.value, format)
    }
}

impl fmt::Display for FixedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
