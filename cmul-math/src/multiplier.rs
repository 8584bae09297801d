//! Exact complex multiplication with bit growth.
//!
//! ```text
//! real = a.re*b.re - a.im*b.im
//! imag = a.re*b.im + a.im*b.re
//! ```
//!
//! Each partial product is formed at `W1 + W2` bits, each sum/difference at
//! `W1 + W2 + 1`. The result is signed when either operand is signed.

use crate::{ComplexFixed, FixedInt, FixedPointError, Format};

/// Multiply `a` by `b` into the inferred format [`Format::complex_product`].
///
/// Two unsigned operands give an unsigned result, so a negative real part
/// fails with [`FixedPointError::Overflow`]. Use [`multiply_as`] with a signed
/// output to keep it.
///
/// # Example
/// ```
/// use cmul_math::{multiply, ComplexFixed, Format};
///
/// let i10 = Format::signed(10).unwrap();
/// let a = ComplexFixed::from_parts(10, 20, i10).unwrap();
/// let b = ComplexFixed::from_parts(5, 10, i10).unwrap();
///
/// let c = multiply(&a, &b).unwrap();
/// assert_eq!(c.parts(), (-150, 200));
/// assert_eq!(c.format(), Format::signed(21).unwrap());
/// ```
pub fn multiply(a: &ComplexFixed, b: &ComplexFixed) -> Result<ComplexFixed, FixedPointError> {
    let out = Format::complex_product(a.format(), b.format())?;
    multiply_as(a, b, out)
}

/// Multiply exactly, then place the result in a caller-declared format.
///
/// The products and sums are formed without any intermediate format, so only
/// `out` is checked. Fails with [`FixedPointError::Overflow`] if either
/// component of the exact product does not fit `out`.
pub fn multiply_as(
    a: &ComplexFixed,
    b: &ComplexFixed,
    out: Format,
) -> Result<ComplexFixed, FixedPointError> {
    let (real, imag) = exact_parts(a, b, out)?;
    let fit = |value: i128| {
        FixedInt::new(value, out).map_err(|_| FixedPointError::Overflow { value, format: out })
    };
    ComplexFixed::new(fit(real)?, fit(imag)?)
}

fn exact_parts(
    a: &ComplexFixed,
    b: &ComplexFixed,
    out: Format,
) -> Result<(i128, i128), FixedPointError> {
    // A valid product format (<= 127 bits) keeps every partial product inside i128
    Format::product(a.format(), b.format())?;

    let (ar, ai) = a.parts();
    let (br, bi) = b.parts();
    let (rr, ii, ri, ir) = (ar * br, ai * bi, ar * bi, ai * br);

    let real = rr.checked_sub(ii).ok_or(FixedPointError::Overflow {
        value: rr.saturating_sub(ii),
        format: out,
    })?;
    let imag = ri.checked_add(ir).ok_or(FixedPointError::Overflow {
        value: ri.saturating_add(ir),
        format: out,
    })?;
    Ok((real, imag))
}
