//! The magnitude ALU.
//!
//! Magnitudes are little-endian [`Limb`] slices. A slice is *normalized* when
//! it is empty (the value zero) or its last limb is non-zero. Inputs may carry
//! high zero limbs, such as the output of a `new_*` call, and are normalized
//! on entry. Operations return the normalized length of their result.
//!
//! Operations come in three forms:
//!
//! - `new_*(x, y)` allocates a zeroed vector sized from the exact bit length
//!   of the result and computes into it. The vector may carry high zero limbs.
//! - `set_*(z, x, y)` writes into a distinct destination `z` and fails with
//!   [`Error::Overflow`] if `z` is shorter than the documented minimum.
//! - `*_assign(z, z_len, y)` computes `z[..z_len] op y` into `z` itself. Slots
//!   of `z` past `z_len` are treated as garbage and never read.
//!
//! [`Error::Overflow`]: crate::Error::Overflow

use alloc::{vec, vec::Vec};

use crate::error::{Error, Result};

pub mod add;
pub mod bits;
pub mod bitwise;
pub mod cmp;
pub mod div;
pub mod limb;
pub mod mul;
pub mod shift;

pub use add::*;
pub use bits::*;
pub use bitwise::*;
pub use cmp::*;
pub use div::*;
pub use limb::{Limb, WideLimb, LIMB_BITS};
pub use mul::*;
pub use shift::*;

/// Granularity, in limbs, of every allocation.
pub const ALLOC_QUANTUM: usize = 4;

/// Largest supported bit length of a magnitude.
pub const MAX_BIT_LEN: u64 = i32::MAX as u64;

/// Largest supported number of limbs of a magnitude.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_LIMBS: usize = MAX_BIT_LEN.div_ceil(LIMB_BITS as u64) as usize;

/// The canonical zero magnitude.
pub const ZERO: [Limb; 0] = [];

/// The canonical one magnitude.
pub const ONE: [Limb; 1] = [1];

/// Number of limbs needed to hold `bits` bits.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn limbs_for_bits(bits: u64) -> usize {
    bits.div_ceil(LIMB_BITS as u64) as usize
}

/// Number of limbs needed to hold `bits` bits, failing with
/// [`Error::InvalidAllocation`] past [`MAX_BIT_LEN`].
#[inline]
pub fn checked_limbs_for_bits(bits: u64) -> Result<usize> {
    if bits > MAX_BIT_LEN {
        return Err(Error::InvalidAllocation { bits });
    }
    Ok(limbs_for_bits(bits))
}

/// Rounds a limb count up to the [`ALLOC_QUANTUM`].
#[inline]
#[must_use]
pub const fn alloc_len(limbs: usize) -> usize {
    limbs.next_multiple_of(ALLOC_QUANTUM)
}

/// Allocates zeroed storage for at least `len` limbs, rounded up to the
/// allocation quantum.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if `len` exceeds [`MAX_LIMBS`].
pub fn alloc_limbs(len: usize) -> Result<Vec<Limb>> {
    if len > MAX_LIMBS {
        return Err(Error::InvalidAllocation {
            bits: (len as u64).saturating_mul(LIMB_BITS.into()),
        });
    }
    Ok(vec![0; alloc_len(len)])
}

/// Allocates zeroed storage for a magnitude of up to `bits` bits.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if `bits` exceeds [`MAX_BIT_LEN`].
pub fn alloc_bits(bits: u64) -> Result<Vec<Limb>> {
    alloc_limbs(checked_limbs_for_bits(bits)?)
}

/// Returns the length of `x` without its high zero limbs.
#[inline]
#[must_use]
pub fn normalized_len(x: &[Limb]) -> usize {
    x.iter().rposition(|&limb| limb != 0).map_or(0, |top| top + 1)
}

/// Returns `x` without its high zero limbs.
#[inline]
#[must_use]
pub fn normalize(x: &[Limb]) -> &[Limb] {
    &x[..normalized_len(x)]
}

/// Checks that `x` has no high zero limb.
#[inline]
#[must_use]
pub fn is_normalized(x: &[Limb]) -> bool {
    x.last().map_or(true, |&top| top != 0)
}

/// Splits a 64-bit scalar into limbs, returning them with their normalized
/// length.
#[inline]
#[must_use]
pub(crate) const fn scalar_limbs(value: u64) -> ([Limb; 2], usize) {
    let (lo, hi) = limb::split(value);
    let len = if hi != 0 {
        2
    } else if lo != 0 {
        1
    } else {
        0
    };
    ([lo, hi], len)
}

/// Reads limb `i` of `x`, or zero past its end.
#[inline(always)]
pub(crate) fn limb_at(x: &[Limb], i: usize) -> Limb {
    x.get(i).copied().unwrap_or(0)
}
