//! Bitwise logic on magnitudes.
//!
//! These are unsigned operations. Two's-complement semantics for signed
//! values are layered on top by [`BigInt`](crate::BigInt) and
//! [`MutableBigInt`](crate::MutableBigInt).

use alloc::vec::Vec;

use super::{
    add::ensure_prefix, alloc_limbs, limb_at, normalize, normalized_len, Limb,
};
use crate::error::{ensure_fits, Result};

/// Minimum destination length for `x & y`.
#[must_use]
pub fn and_len(x: &[Limb], y: &[Limb]) -> usize {
    normalize(x).len().min(normalize(y).len())
}

/// Minimum destination length for `x | y` and `x ^ y`.
#[must_use]
pub fn or_len(x: &[Limb], y: &[Limb]) -> usize {
    normalize(x).len().max(normalize(y).len())
}

/// Writes `op(x[i], y[i])` for `i < len` into `z`, reading missing limbs as
/// zero.
fn combine(
    z: &mut [Limb],
    x: &[Limb],
    y: &[Limb],
    len: usize,
    op: impl Fn(Limb, Limb) -> Limb,
) -> usize {
    for (i, limb) in z[..len].iter_mut().enumerate() {
        *limb = op(limb_at(x, i), limb_at(y, i));
    }
    normalized_len(&z[..len])
}

/// Applies `op` to `z[..z_len]` and `y` in place over `len` limbs. Slots of
/// `z` past `z_len` read as zero.
fn combine_assign(
    z: &mut [Limb],
    z_len: usize,
    y: &[Limb],
    len: usize,
    op: impl Fn(Limb, Limb) -> Limb,
) -> usize {
    for (i, limb) in z[..len].iter_mut().enumerate() {
        let a = if i < z_len { *limb } else { 0 };
        *limb = op(a, limb_at(y, i));
    }
    normalized_len(&z[..len])
}

/// Allocates and returns `x & y`.
///
/// # Errors
///
/// Only on allocation failure.
pub fn new_and(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    let len = and_len(x, y);
    let mut z = alloc_limbs(len)?;
    combine(&mut z, x, y, len, |a, b| a & b);
    Ok(z)
}

/// Computes `x & y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`and_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_and(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    let len = and_len(x, y);
    ensure_fits(len, z.len())?;
    Ok(combine(z, x, y, len, |a, b| a & b))
}

/// Computes `z[..z_len] & y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
pub fn and_assign(z: &mut [Limb], z_len: usize, y: &[Limb]) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    let len = z_len.min(y.len());
    Ok(combine_assign(z, z_len, y, len, |a, b| a & b))
}

/// Allocates and returns `x | y`.
///
/// # Errors
///
/// Only on allocation failure.
pub fn new_or(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    let len = or_len(x, y);
    let mut z = alloc_limbs(len)?;
    combine(&mut z, x, y, len, |a, b| a | b);
    Ok(z)
}

/// Computes `x | y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`or_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_or(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    let len = or_len(x, y);
    ensure_fits(len, z.len())?;
    Ok(combine(z, x, y, len, |a, b| a | b))
}

/// Computes `z[..z_len] | y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` is shorter than `y`.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn or_assign(z: &mut [Limb], z_len: usize, y: &[Limb]) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    let len = z_len.max(y.len());
    ensure_fits(len, z.len())?;
    Ok(combine_assign(z, z_len, y, len, |a, b| a | b))
}

/// Allocates and returns `x ^ y`.
///
/// # Errors
///
/// Only on allocation failure.
pub fn new_xor(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    let len = or_len(x, y);
    let mut z = alloc_limbs(len)?;
    combine(&mut z, x, y, len, |a, b| a ^ b);
    Ok(z)
}

/// Computes `x ^ y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`or_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_xor(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    let len = or_len(x, y);
    ensure_fits(len, z.len())?;
    Ok(combine(z, x, y, len, |a, b| a ^ b))
}

/// Computes `z[..z_len] ^ y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` is shorter than `y`.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn xor_assign(z: &mut [Limb], z_len: usize, y: &[Limb]) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    let len = z_len.max(y.len());
    ensure_fits(len, z.len())?;
    Ok(combine_assign(z, z_len, y, len, |a, b| a ^ b))
}

/// Allocates and returns `x & !y`.
///
/// # Errors
///
/// Only on allocation failure.
pub fn new_and_not(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    let mut z = alloc_limbs(x.len())?;
    combine(&mut z, x, y, x.len(), |a, b| a & !b);
    Ok(z)
}

/// Computes `x & !y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` is shorter than `x`.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_and_not(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    ensure_fits(x.len(), z.len())?;
    Ok(combine(z, x, y, x.len(), |a, b| a & !b))
}

/// Computes `z[..z_len] & !y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
pub fn and_not_assign(
    z: &mut [Limb],
    z_len: usize,
    y: &[Limb],
) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    Ok(combine_assign(z, z_len, y, z_len, |a, b| a & !b))
}
