//! Q16.16 fixed-point helpers.
//!
//! Touch coordinates and screen dimensions fit comfortably in 32 bits, but
//! scaling by `2^16` does not, so every product is formed in `u64`.

use fixed::types::U16F16;

/// Number of fractional bits.
pub const FRACTION_BITS: u32 = 16;

/// The value 1.0.
pub const ONE: u32 = 1 << FRACTION_BITS;

/// Unsigned Q16.16 fixed-point number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q16(U16F16);

impl Q16 {
    /// Zero.
    pub const ZERO: Self = Self(U16F16::from_bits(0));

    /// One.
    pub const ONE: Self = Self(U16F16::from_bits(ONE));

    /// Largest value strictly below one.
    pub const MAX_FRACTION: Self = Self(U16F16::from_bits(ONE - 1));

    /// Wraps raw Q16.16 bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(U16F16::from_bits(bits))
    }

    /// Raw Q16.16 bits.
    #[must_use]
    pub const fn to_bits(self) -> u32 {
        self.0.to_bits()
    }

    /// `numerator / denominator`, truncated. `None` when the denominator is
    /// zero or the result does not fit in 32 bits.
    #[must_use]
    pub fn ratio(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let bits = numerator.checked_mul(u64::from(ONE))? / denominator;
        u32::try_from(bits).ok().map(Self::from_bits)
    }

    /// Scales an integer by this value, truncating.
    #[must_use]
    pub fn scale(self, value: u32) -> u32 {
        ((u64::from(self.to_bits()) * u64::from(value)) >> FRACTION_BITS) as u32
    }

    /// How many whole `step`s fit in this value. `None` for a zero step.
    #[must_use]
    pub fn div_floor(self, step: Self) -> Option<u32> {
        self.to_bits().checked_div(step.to_bits())
    }

    /// `1 - self` for values in `[0, 1)`, mirroring a fraction across the axis.
    #[must_use]
    pub fn mirror(self) -> Self {
        Self::MAX_FRACTION.saturating_sub(self)
    }

    /// Saturating subtraction.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<Q16> for U16F16 {
    fn from(value: Q16) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_exact() {
        assert_eq!(Q16::ratio(1, 2), Some(Q16::from_bits(ONE / 2)));
        assert_eq!(Q16::ratio(53, 800).map(Q16::to_bits), Some(53 * 65536 / 800));
    }

    #[test]
    fn test_ratio_rejects_zero_denominator() {
        assert_eq!(Q16::ratio(1, 0), None);
    }

    #[test]
    fn test_ratio_wide_numerator_does_not_overflow() {
        // u32::MAX << 16 does not fit in 32 bits; the widened product must.
        let q = Q16::ratio(u64::from(u32::MAX), u64::from(u32::MAX)).unwrap();
        assert_eq!(q, Q16::ONE);
        assert_eq!(Q16::ratio(u64::from(u32::MAX), 1), None);
    }

    #[test]
    fn test_scale_and_div() {
        let half = Q16::from_bits(ONE / 2);
        assert_eq!(half.scale(800), 400);
        assert_eq!(Q16::from_bits(ONE - 1).scale(800), 799);
        assert_eq!(Q16::from_bits(100).div_floor(Q16::from_bits(30)), Some(3));
        assert_eq!(Q16::ONE.div_floor(Q16::ZERO), None);
    }

    #[test]
    fn test_converts_to_fixed() {
        let half = U16F16::from(Q16::from_bits(ONE / 2));
        assert_eq!(half, U16F16::from_num(0.5));
    }

    #[test]
    fn test_mirror() {
        assert_eq!(Q16::ZERO.mirror(), Q16::MAX_FRACTION);
        assert_eq!(Q16::MAX_FRACTION.mirror(), Q16::ZERO);
    }
}
