//! Multiplication and squaring of magnitudes.

use alloc::{vec, vec::Vec};

use super::{
    add::{add_into, ensure_prefix, sub_assign_into},
    alloc_bits, bit_len,
    limb::{adc, carrying_mac, carrying_mul, split, widening_mul},
    limbs_for_bits, normalize, normalized_len,
    shift::{shl_within, set_shl},
    scalar_limbs, Limb, LIMB_BITS,
};
use crate::error::{ensure_fits, Result};

/// Operand length, in limbs, from which both multiplication operands are
/// split with Karatsuba.
pub const KARATSUBA_THRESHOLD: usize = 80;

/// Operand length, in limbs, from which squaring uses Karatsuba.
pub const KARATSUBA_SQUARE_THRESHOLD: usize = 128;

/// Minimum destination length for `x * y`.
#[must_use]
pub fn mul_len(x: &[Limb], y: &[Limb]) -> usize {
    match (bit_len(x), bit_len(y)) {
        (0, _) | (_, 0) => 0,
        (bx, by) => limbs_for_bits(u64::from(bx) + u64::from(by)),
    }
}

/// Minimum destination length for `x * value`.
#[must_use]
pub fn mul_u64_len(x: &[Limb], value: u64) -> usize {
    let bits = bit_len(x);
    if bits == 0 || value == 0 {
        return 0;
    }
    let value_bits = u64::BITS - value.leading_zeros();
    limbs_for_bits(u64::from(bits) + u64::from(value_bits))
}

/// Minimum destination length for `x * x`.
#[must_use]
pub fn square_len(x: &[Limb]) -> usize {
    limbs_for_bits(2 * u64::from(bit_len(x)))
}

/// Allocates and returns `x * y`.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if the product exceeds the supported size.
///
/// [`Error::InvalidAllocation`]: crate::Error::InvalidAllocation
pub fn new_mul(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    if x.is_empty() || y.is_empty() {
        return Ok(Vec::new());
    }
    let mut z = alloc_bits(u64::from(bit_len(x)) + u64::from(bit_len(y)))?;
    mul_into(&mut z, x, y);
    Ok(z)
}

/// Computes `x * y` into `z` and returns its normalized length.
///
/// `z` cannot alias either operand.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`mul_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_mul(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    ensure_fits(mul_len(x, y), z.len())?;
    Ok(mul_into(z, x, y))
}

/// Computes `x * y` into `z`, which must hold [`mul_len`] limbs.
pub(crate) fn mul_into(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> usize {
    let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };
    match short.len() {
        0 => 0,
        1 => mul_limb_into(z, long, short[0]),
        len if len >= KARATSUBA_THRESHOLD => karatsuba(z, long, short),
        _ => schoolbook(z, long, short),
    }
}

/// Computes `x * d` into `z`.
fn mul_limb_into(z: &mut [Limb], x: &[Limb], d: Limb) -> usize {
    if d == 0 || x.is_empty() {
        return 0;
    }
    let mut carry = 0;
    for (i, &a) in x.iter().enumerate() {
        (z[i], carry) = carrying_mul(a, d, carry);
    }
    if carry != 0 {
        z[x.len()] = carry;
        x.len() + 1
    } else {
        x.len()
    }
}

/// Schoolbook multiplication; `short` drives the outer loop.
fn schoolbook(z: &mut [Limb], long: &[Limb], short: &[Limb]) -> usize {
    let end = z.len().min(long.len() + short.len());
    z[..end].fill(0);

    for (i, &b) in short.iter().enumerate() {
        let mut carry = 0;
        for (j, &a) in long.iter().enumerate() {
            (z[i + j], carry) = carrying_mac(z[i + j], a, b, carry);
        }
        // The top limb of the full product is absent when it is zero.
        if let Some(top) = z.get_mut(i + long.len()) {
            *top = carry;
        } else {
            debug_assert_eq!(carry, 0);
        }
    }
    normalized_len(&z[..end])
}

/// Returns `x * y` in a vector of exactly `x.len() + y.len()` limbs,
/// truncated to its normalized length.
fn product(x: &[Limb], y: &[Limb]) -> Vec<Limb> {
    let mut z = vec![0; x.len() + y.len()];
    let len = mul_into(&mut z, x, y);
    z.truncate(len);
    z
}

fn square_product(x: &[Limb]) -> Vec<Limb> {
    let mut z = vec![0; 2 * x.len()];
    let len = square_into(&mut z, x);
    z.truncate(len);
    z
}

fn sum(x: &[Limb], y: &[Limb]) -> Vec<Limb> {
    let mut z = vec![0; x.len().max(y.len()) + 1];
    let len = add_into(&mut z, x, y);
    z.truncate(len);
    z
}

/// Adds `y` into `z` at limb `offset`. The sum must fit in `z`.
fn add_at(z: &mut [Limb], offset: usize, y: &[Limb]) {
    let z = &mut z[offset..];
    let mut carry = 0;
    for (i, &b) in y.iter().enumerate() {
        (z[i], carry) = adc(z[i], b, carry);
    }
    let mut i = y.len();
    while carry != 0 {
        (z[i], carry) = adc(z[i], 0, carry);
        i += 1;
    }
}

/// Splits `x` at limb `half` into normalized `(low, high)` parts.
fn split_at_half(x: &[Limb], half: usize) -> (&[Limb], &[Limb]) {
    let (lo, hi) = x.split_at(half.min(x.len()));
    (&lo[..normalized_len(lo)], hi)
}

/// Karatsuba multiplication.
///
/// With `x = x1·B + x0` and `y = y1·B + y0`, the middle term
/// `x0·y1 + x1·y0` is recovered as `(x0 + x1)(y0 + y1) - x0·y0 - x1·y1`.
fn karatsuba(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> usize {
    let half = x.len().min(y.len()) / 2;
    let (x0, x1) = split_at_half(x, half);
    let (y0, y1) = split_at_half(y, half);

    let low = product(x0, y0);
    let high = product(x1, y1);
    let mut mid = product(&sum(x0, x1), &sum(y0, y1));
    let mid_len = mid.len();
    let len = sub_assign_into(&mut mid, mid_len, &low);
    let len = sub_assign_into(&mut mid, len, &high);
    mid.truncate(len);

    let end = z.len().min(x.len() + y.len());
    z[..end].fill(0);
    add_at(z, 0, &low);
    add_at(z, half, &mid);
    add_at(z, 2 * half, &high);
    normalized_len(&z[..end])
}

/// Allocates and returns `x * x`.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if the square exceeds the supported size.
///
/// [`Error::InvalidAllocation`]: crate::Error::InvalidAllocation
pub fn new_square(x: &[Limb]) -> Result<Vec<Limb>> {
    let x = normalize(x);
    let mut z = alloc_bits(2 * u64::from(bit_len(x)))?;
    square_into(&mut z, x);
    Ok(z)
}

/// Computes `x * x` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`square_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_square(z: &mut [Limb], x: &[Limb]) -> Result<usize> {
    let x = normalize(x);
    ensure_fits(square_len(x), z.len())?;
    Ok(square_into(z, x))
}

/// Computes `x * x` into `z`, which must hold [`square_len`] limbs.
pub(crate) fn square_into(z: &mut [Limb], x: &[Limb]) -> usize {
    match x.len() {
        0 => 0,
        len if len >= KARATSUBA_SQUARE_THRESHOLD => karatsuba_square(z, x),
        _ => schoolbook_square(z, x),
    }
}

/// Schoolbook squaring: each cross product `x[i]·x[j]` with `i < j` is
/// computed once and doubled, then the diagonal squares are added.
fn schoolbook_square(z: &mut [Limb], x: &[Limb]) -> usize {
    let n = x.len();
    let end = z.len().min(2 * n);
    z[..end].fill(0);

    for (i, &b) in x.iter().enumerate() {
        let mut carry = 0;
        for j in i + 1..n {
            (z[i + j], carry) = carrying_mac(z[i + j], x[j], b, carry);
        }
        if let Some(top) = z.get_mut(i + n) {
            *top = carry;
        }
    }

    let mut spill = 0;
    for limb in &mut z[..end] {
        let next = *limb >> (LIMB_BITS - 1);
        *limb = *limb << 1 | spill;
        spill = next;
    }

    let mut carry = 0;
    for (i, &a) in x.iter().enumerate() {
        let (lo, hi) = split(widening_mul(a, a));
        (z[2 * i], carry) = adc(z[2 * i], lo, carry);
        if let Some(limb) = z.get_mut(2 * i + 1) {
            (*limb, carry) = adc(*limb, hi, carry);
        }
    }
    normalized_len(&z[..end])
}

/// Karatsuba squaring with `2·x0·x1 = (x0 + x1)^2 - x0^2 - x1^2`.
fn karatsuba_square(z: &mut [Limb], x: &[Limb]) -> usize {
    let half = x.len() / 2;
    let (x0, x1) = split_at_half(x, half);

    let low = square_product(x0);
    let high = square_product(x1);
    let mut mid = square_product(&sum(x0, x1));
    let mid_len = mid.len();
    let len = sub_assign_into(&mut mid, mid_len, &low);
    let len = sub_assign_into(&mut mid, len, &high);
    mid.truncate(len);

    let end = z.len().min(2 * x.len());
    z[..end].fill(0);
    add_at(z, 0, &low);
    add_at(z, half, &mid);
    add_at(z, 2 * half, &high);
    normalized_len(&z[..end])
}

/// Allocates and returns `x * value`.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if the product exceeds the supported size.
///
/// [`Error::InvalidAllocation`]: crate::Error::InvalidAllocation
pub fn new_mul_u64(x: &[Limb], value: u64) -> Result<Vec<Limb>> {
    let x = normalize(x);
    if x.is_empty() || value == 0 {
        return Ok(Vec::new());
    }
    let value_bits = u64::BITS - value.leading_zeros();
    let mut z = alloc_bits(u64::from(bit_len(x)) + u64::from(value_bits))?;
    set_mul_u64(&mut z, x, value)?;
    Ok(z)
}

/// Computes `x * value` into `z` and returns its normalized length.
///
/// A power-of-two multiplier becomes a left shift; a one-limb multiplier
/// takes a single pass.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`mul_u64_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_mul_u64(z: &mut [Limb], x: &[Limb], value: u64) -> Result<usize> {
    let x = normalize(x);
    ensure_fits(mul_u64_len(x, value), z.len())?;
    if x.is_empty() || value == 0 {
        return Ok(0);
    }
    if value.is_power_of_two() {
        return set_shl(z, x, value.trailing_zeros());
    }
    let (v, v_len) = scalar_limbs(value);
    if v_len == 1 {
        Ok(mul_limb_into(z, x, v[0]))
    } else {
        Ok(schoolbook(z, x, &v))
    }
}

/// Computes `z[..z_len] * value` in place and returns its normalized length.
///
/// Runs low to high, keeping the previous source limb in a 128-bit
/// accumulator.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` cannot hold the product.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
/// [`Error::Overflow`]: crate::Error::Overflow
#[allow(clippy::cast_possible_truncation)]
pub fn mul_u64_assign(
    z: &mut [Limb],
    z_len: usize,
    value: u64,
) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let z_len = normalized_len(&z[..z_len]);
    let len = mul_u64_len(&z[..z_len], value);
    ensure_fits(len, z.len())?;
    if len == 0 {
        return Ok(0);
    }
    if value.is_power_of_two() {
        return Ok(shl_within(z, z_len, value.trailing_zeros()));
    }

    // `acc` holds the pending high part of previous products.
    let value = u128::from(value);
    let mut acc: u128 = 0;
    for limb in &mut z[..z_len] {
        acc += u128::from(*limb) * value;
        *limb = acc as Limb;
        acc >>= LIMB_BITS;
    }
    let mut i = z_len;
    while acc != 0 {
        z[i] = acc as Limb;
        acc >>= LIMB_BITS;
        i += 1;
    }
    Ok(len)
}

/// Computes `z[..z_len] * d` in place and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` cannot hold the product.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn mul_limb_assign(z: &mut [Limb], z_len: usize, d: Limb) -> Result<usize> {
    mul_u64_assign(z, z_len, d.into())
}
