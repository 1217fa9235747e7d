//! The read-only view shared by [`BigInt`](crate::BigInt) and
//! [`MutableBigInt`](crate::MutableBigInt).

use alloc::string::String;
use core::{
    cmp::Ordering,
    fmt::{self, Formatter, Write},
};

use crate::{
    arithmetic::{self, Limb},
    meta::Meta,
};

/// A sign-magnitude integer.
///
/// Implementors expose their [`Meta`] and a normalized magnitude of exactly
/// `meta().len()` limbs; everything else is derived from those two.
pub trait BigNumber {
    /// Sign and normalized length.
    fn meta(&self) -> Meta;

    /// Little-endian limbs of the absolute value, without high zero limbs.
    fn magnitude(&self) -> &[Limb];

    /// Checks whether the value is zero.
    fn is_zero(&self) -> bool {
        self.meta().is_zero()
    }

    /// Checks whether the value is negative.
    fn is_negative(&self) -> bool {
        self.meta().is_negative()
    }

    /// `-1`, `0` or `1` following the sign of the value.
    fn signum(&self) -> i32 {
        self.meta().signum()
    }

    /// Return the minimum number of bits needed to encode the absolute value.
    fn bit_len(&self) -> u32 {
        arithmetic::bit_len(self.magnitude())
    }

    /// Number of bits of the two's-complement encoding, sign bit excluded.
    ///
    /// This is one less than [`BigNumber::bit_len`] for a negative power of
    /// two, since `-2^k` needs only `k` bits beside the sign.
    fn bit_len_twos_complement(&self) -> u32 {
        let bits = self.bit_len();
        if self.is_negative() && self.is_power_of_two() {
            bits - 1
        } else {
            bits
        }
    }

    /// The 64 bits of the absolute value starting at bit `bit`. Bits past
    /// the end read as zero.
    fn u64_at_bit(&self, bit: u32) -> u64 {
        arithmetic::u64_at_bit(self.magnitude(), bit)
    }

    /// Find the `i`-th bit of the absolute value.
    fn test_bit(&self, i: u32) -> bool {
        arithmetic::test_bit(self.magnitude(), i)
    }

    /// Checks whether the absolute value is a power of two.
    fn is_power_of_two(&self) -> bool {
        arithmetic::is_power_of_two(self.magnitude())
    }

    /// Index of the lowest set bit, or `None` for zero.
    fn trailing_zeros(&self) -> Option<u32> {
        arithmetic::trailing_zeros(self.magnitude())
    }

    /// Number of set bits of the absolute value.
    fn count_ones(&self) -> u32 {
        arithmetic::count_ones(self.magnitude())
    }

    /// Compares absolute values.
    fn cmp_magnitude<N: BigNumber + ?Sized>(&self, other: &N) -> Ordering {
        arithmetic::cmp(self.magnitude(), other.magnitude())
    }
}

/// Compares two values by sign, then by magnitude.
pub(crate) fn cmp_signed<A, B>(a: &A, b: &B) -> Ordering
where
    A: BigNumber + ?Sized,
    B: BigNumber + ?Sized,
{
    match (a.is_negative(), b.is_negative()) {
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (false, false) => a.cmp_magnitude(b),
        (true, true) => b.cmp_magnitude(a),
    }
}

/// Formats a value in hexadecimal, most significant limb first.
pub(crate) fn fmt_hex<N: BigNumber + ?Sized>(
    value: &N,
    f: &mut Formatter<'_>,
    upper: bool,
) -> fmt::Result {
    let mut digits = String::new();
    let mut limbs = value.magnitude().iter().rev();
    match limbs.next() {
        None => digits.push('0'),
        Some(top) => {
            if upper {
                write!(digits, "{top:X}")?;
            } else {
                write!(digits, "{top:x}")?;
            }
        }
    }
    for limb in limbs {
        if upper {
            write!(digits, "{limb:08X}")?;
        } else {
            write!(digits, "{limb:08x}")?;
        }
    }
    f.pad_integral(!value.is_negative(), "0x", &digits)
}
