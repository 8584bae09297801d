use crate::{FixedInt, FixedPointError, Format};
use std::fmt;

/// A complex number whose real and imaginary parts share one [`Format`].
///
/// Products are formed with [`crate::multiply`]; their format differs from
/// both operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComplexFixed {
    real: FixedInt,
    imag: FixedInt,
}

impl ComplexFixed {
    /// Pair two values, which must agree on width and signedness.
    pub fn new(real: FixedInt, imag: FixedInt) -> Result<Self, FixedPointError> {
        if real.format() != imag.format() {
            return Err(FixedPointError::FormatMismatch(real.format(), imag.format()));
        }
        Ok(Self { real, imag })
    }

    /// Build from two integer literals, range-checked against `format`
    pub fn from_parts(real: i128, imag: i128, format: Format) -> Result<Self, FixedPointError> {
        Ok(Self {
            real: FixedInt::new(real, format)?,
            imag: FixedInt::new(imag, format)?,
        })
    }

    pub fn zero(format: Format) -> Self {
        Self {
            real: FixedInt::zero(format),
            imag: FixedInt::zero(format),
        }
    }

    pub fn real(&self) -> FixedInt {
        self.real
    }

    pub fn imag(&self) -> FixedInt {
        self.imag
    }

    pub fn format(&self) -> Format {
        self.real.format()
    }

    /// Component values as plain integers
    pub fn parts(&self) -> (i128, i128) {
        (self.real.value(), self.imag.value())
    }

    /// Negation in the same format.
    pub fn negate(&self) -> Result<Self, FixedPointError> {
        let format = self.format();
        Ok(Self {
            real: self.real.neg(format)?,
            imag: self.imag.neg(format)?,
        })
    }
}

impl fmt::Display for ComplexFixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.real, self.imag)
    }
}
