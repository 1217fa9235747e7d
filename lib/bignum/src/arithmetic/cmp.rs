//! Magnitude comparison.

use core::cmp::Ordering;

use super::{limb::split, Limb};

/// Compares two normalized magnitudes.
///
/// Unequal lengths decide the order; equal lengths are scanned from the most
/// significant limb down.
#[must_use]
pub fn cmp(x: &[Limb], y: &[Limb]) -> Ordering {
    x.len()
        .cmp(&y.len())
        .then_with(|| x.iter().rev().cmp(y.iter().rev()))
}

/// Compares the normalized magnitude `x` with the scalar `value`.
#[must_use]
pub fn cmp_u64(x: &[Limb], value: u64) -> Ordering {
    let (lo, hi) = split(value);
    match *x {
        [] => 0.cmp(&value),
        [a] => {
            if hi != 0 {
                Ordering::Less
            } else {
                a.cmp(&lo)
            }
        }
        [a, b] => b.cmp(&hi).then(a.cmp(&lo)),
        _ => Ordering::Greater,
    }
}
