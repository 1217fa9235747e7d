//! Bit queries over magnitudes.

use super::{limb_at, normalize, Limb, LIMB_BITS};

/// Return the minimum number of bits needed to encode `x`.
///
/// High zero limbs are skipped, so `x` need not be normalized.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn bit_len(x: &[Limb]) -> u32 {
    let x = normalize(x);
    match x.last() {
        None => 0,
        Some(top) => {
            (x.len() as u32 - 1) * LIMB_BITS + (LIMB_BITS - top.leading_zeros())
        }
    }
}

/// Number of set bits in `x`.
#[must_use]
pub fn count_ones(x: &[Limb]) -> u32 {
    x.iter().map(|limb| limb.count_ones()).sum()
}

/// Index of the lowest set bit of `x`, or `None` if `x` is zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn trailing_zeros(x: &[Limb]) -> Option<u32> {
    let index = x.iter().position(|&limb| limb != 0)?;
    Some(index as u32 * LIMB_BITS + x[index].trailing_zeros())
}

/// Find the `bit`-th bit of `x`. Bits past the end of `x` are zero.
#[must_use]
pub fn test_bit(x: &[Limb], bit: u32) -> bool {
    let limb = (bit / LIMB_BITS) as usize;
    limb_at(x, limb) >> (bit % LIMB_BITS) & 1 == 1
}

/// Checks whether any of the `n` lowest bits of `x` is set.
#[must_use]
pub fn any_low_bits_set(x: &[Limb], n: u32) -> bool {
    let full = (n / LIMB_BITS) as usize;
    let rest = n % LIMB_BITS;

    if x.iter().take(full).any(|&limb| limb != 0) {
        return true;
    }
    rest != 0 && limb_at(x, full) & ((1 << rest) - 1) != 0
}

/// Checks whether the normalized magnitude `x` is an exact power of two.
#[must_use]
pub fn is_power_of_two(x: &[Limb]) -> bool {
    match x.split_last() {
        None => false,
        Some((top, rest)) => {
            top.is_power_of_two() && rest.iter().all(|&limb| limb == 0)
        }
    }
}

/// Extracts the 64 bits of `x` starting at bit index `bit`.
///
/// Bits past the end of `x` read as zero, so any index is valid.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn u64_at_bit(x: &[Limb], bit: u32) -> u64 {
    let index = (bit / LIMB_BITS) as usize;
    let offset = bit % LIMB_BITS;

    // A 64-bit window starting inside limb `index` spans at most three limbs.
    let window = u128::from(limb_at(x, index))
        | u128::from(limb_at(x, index + 1)) << LIMB_BITS
        | u128::from(limb_at(x, index + 2)) << (2 * LIMB_BITS);
    (window >> offset) as u64
}
