use super::{FixedInt, FixedPointError, Format};

impl FixedInt {
    /// Exact addition into `out`.
    ///
    /// The operands may have any format; the caller picks the result format
    /// (see [`Format::sum`]). Fails instead of truncating.
    pub fn add(&self, other: &Self, out: Format) -> Result<Self, FixedPointError> {
        let value = self
            .value()
            .checked_add(other.value())
            .ok_or(FixedPointError::Overflow { value: i128::MAX, format: out })?;
        Self::checked(value, out)
    }

    /// Exact subtraction into `out`
    pub fn sub(&self, other: &Self, out: Format) -> Result<Self, FixedPointError> {
        let value = self
            .value()
            .checked_sub(other.value())
            .ok_or(FixedPointError::Overflow { value: i128::MIN, format: out })?;
        Self::checked(value, out)
    }

    /// Exact multiplication into `out`.
    /// [`Format::product`] always holds the full-precision result.
    pub fn mul(&self, other: &Self, out: Format) -> Result<Self, FixedPointError> {
        let value = self
            .value()
            .checked_mul(other.value())
            .ok_or(FixedPointError::Overflow { value: i128::MAX, format: out })?;
        Self::checked(value, out)
    }

    pub fn neg(&self, out: Format) -> Result<Self, FixedPointError> {
        // |value| < 2^127, so negation cannot leave i128
        Self::checked(-self.value(), out)
    }

    fn checked(value: i128, out: Format) -> Result<Self, FixedPointError> {
        Self::new(value, out).map_err(|_| FixedPointError::Overflow { value, format: out })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(width: u32) -> Format {
        Format::signed(width).unwrap()
    }

    fn u(width: u32) -> Format {
        Format::unsigned(width).unwrap()
    }

    #[test]
    fn test_add_widened() {
        let a = FixedInt::new(511, i(10)).unwrap();
        let b = FixedInt::new(511, i(10)).unwrap();
        let out = Format::sum(a.format(), b.format()).unwrap();

        let c = a.add(&b, out).unwrap();
        assert_eq!(c.value(), 1022);
        assert_eq!(c.format(), i(11));
    }

    #[test]
    fn test_add_no_truncation() {
        let a = FixedInt::new(511, i(10)).unwrap();
        let err = a.add(&a, i(10)).unwrap_err();
        assert_eq!(err, FixedPointError::Overflow { value: 1022, format: i(10) });
    }

    #[test]
    fn test_sub_goes_negative() {
        let a = FixedInt::new(50, i(21)).unwrap();
        let b = FixedInt::new(200, i(21)).unwrap();
        assert_eq!(a.sub(&b, i(22)).unwrap().value(), -150);

        let a = FixedInt::new(3, u(4)).unwrap();
        let b = FixedInt::new(5, u(4)).unwrap();
        assert!(a.sub(&b, u(5)).is_err());
    }

    #[test]
    fn test_mul_mixed_sign() {
        let a = FixedInt::new(-512, i(10)).unwrap();
        let b = FixedInt::new(63, u(6)).unwrap();
        let out = Format::product(a.format(), b.format()).unwrap();

        let c = a.mul(&b, out).unwrap();
        assert_eq!(c.value(), -32256);
        assert!(c.is_signed());
        assert_eq!(c.width(), 16);
    }

    #[test]
    fn test_mul_signed_extremes() {
        // -2^(W-1) * -2^(W-1) = 2^(2W-2) still fits 2W signed bits
        let a = FixedInt::new(-512, i(10)).unwrap();
        let c = a.mul(&a, i(20)).unwrap();
        assert_eq!(c.value(), 262144);
    }

    #[test]
    fn test_neg() {
        let a = FixedInt::new(-512, i(10)).unwrap();
        assert!(a.neg(i(10)).is_err());
        assert_eq!(a.neg(i(11)).unwrap().value(), 512);

        let z = FixedInt::zero(u(8));
        assert_eq!(z.neg(u(8)).unwrap().value(), 0);
    }
}
