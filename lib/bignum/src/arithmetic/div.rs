//! Division of magnitudes.
//!
//! Every entry point first classifies its operands with [`div_path`] and
//! then takes the cheapest applicable route. Multi-limb divisors go through
//! Knuth's Algorithm D (TAOCP vol. 2, 4.3.1), with a dedicated variant for
//! divisors that fit in 64 bits.

use alloc::{vec, vec::Vec};
use core::cmp::Ordering;

use super::{
    add::{ensure_prefix, sub_into},
    alloc_limbs, bit_len, cmp, is_power_of_two,
    limb::{adc, carrying_mul, join, sbb, split},
    limbs_for_bits, normalize, normalized_len,
    shift::{set_low_bits, set_shr},
    Limb, WideLimb, LIMB_BITS,
};
use crate::error::{ensure_fits, Error, Result};

/// Route a division takes, decided before any work is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivPath {
    /// The divisor is the single limb `d`.
    Limb(Limb),
    /// The divisor has two limbs.
    TwoLimbs,
    /// The divisor is `2^k`.
    PowerOfTwo(u32),
    /// The quotient is `0` (`false`) or `1` (`true`).
    Trivial(bool),
    /// Knuth's Algorithm D with a divisor of three limbs or more.
    General,
}

/// Classifies the division of `x` by `y`.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero.
pub fn div_path(x: &[Limb], y: &[Limb]) -> Result<DivPath> {
    let (x, y) = (normalize(x), normalize(y));
    let path = match y.len() {
        0 => return Err(Error::DivisionByZero),
        1 => DivPath::Limb(y[0]),
        n if x.len() < n => DivPath::Trivial(false),
        2 => DivPath::TwoLimbs,
        _ if is_power_of_two(y) => DivPath::PowerOfTwo(bit_len(y) - 1),
        _ => match bit_len(x).cmp(&bit_len(y)) {
            Ordering::Less => DivPath::Trivial(false),
            Ordering::Equal => DivPath::Trivial(cmp(x, y) != Ordering::Less),
            Ordering::Greater => DivPath::General,
        },
    };
    Ok(path)
}

/// Minimum quotient destination length for `x / y`.
#[must_use]
pub fn div_len(x: &[Limb], y: &[Limb]) -> usize {
    let (bx, by) = (bit_len(x), bit_len(y));
    if bx < by || y.is_empty() {
        return 0;
    }
    limbs_for_bits(u64::from(bx - by) + 1)
}

/// Minimum remainder destination length for `x % y`.
#[must_use]
pub fn rem_len(x: &[Limb], y: &[Limb]) -> usize {
    normalize(x).len().min(normalize(y).len())
}

/// Divides `x` by the limb `d`, writing the quotient into `q`.
///
/// Returns the normalized quotient length and the remainder.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `d` is zero, [`Error::Overflow`] if `q`
/// cannot hold the quotient.
pub fn div_rem_limb(
    q: &mut [Limb],
    x: &[Limb],
    d: Limb,
) -> Result<(usize, Limb)> {
    if d == 0 {
        return Err(Error::DivisionByZero);
    }
    let x = normalize(x);
    ensure_fits(div_len(x, &[d]), q.len())?;

    let d = WideLimb::from(d);
    let mut rem: WideLimb = 0;
    for (i, &a) in x.iter().enumerate().rev() {
        let num = rem << LIMB_BITS | WideLimb::from(a);
        let (digit, _) = split(num / d);
        rem = num % d;
        if let Some(slot) = q.get_mut(i) {
            *slot = digit;
        } else {
            debug_assert_eq!(digit, 0);
        }
    }
    let (rem, _) = split(rem);
    Ok((normalized_len(&q[..x.len().min(q.len())]), rem))
}

/// Divides `z[..z_len]` by the limb `d` in place, high to low.
///
/// Returns the normalized quotient length and the remainder.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`,
/// [`Error::DivisionByZero`] if `d` is zero.
pub fn div_limb_assign(
    z: &mut [Limb],
    z_len: usize,
    d: Limb,
) -> Result<(usize, Limb)> {
    ensure_prefix(z_len, z.len())?;
    if d == 0 {
        return Err(Error::DivisionByZero);
    }
    let z_len = normalized_len(&z[..z_len]);

    let d = WideLimb::from(d);
    let mut rem: WideLimb = 0;
    for limb in z[..z_len].iter_mut().rev() {
        let num = rem << LIMB_BITS | WideLimb::from(*limb);
        (*limb, _) = split(num / d);
        rem = num % d;
    }
    let (rem, _) = split(rem);
    Ok((normalized_len(&z[..z_len]), rem))
}

/// Divides `z[..z_len]` by the scalar `d` in place.
///
/// Returns the normalized quotient length and the remainder. A `d` that fits
/// in one limb takes the [`div_limb_assign`] route.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`,
/// [`Error::DivisionByZero`] if `d` is zero.
#[allow(clippy::cast_possible_truncation)]
pub fn div_u64_assign(
    z: &mut [Limb],
    z_len: usize,
    d: u64,
) -> Result<(usize, u64)> {
    if let Ok(d) = Limb::try_from(d) {
        let (q_len, rem) = div_limb_assign(z, z_len, d)?;
        return Ok((q_len, rem.into()));
    }
    ensure_prefix(z_len, z.len())?;
    let z_len = normalized_len(&z[..z_len]);

    let d = u128::from(d);
    let mut rem: u128 = 0;
    for limb in z[..z_len].iter_mut().rev() {
        let num = rem << LIMB_BITS | u128::from(*limb);
        *limb = (num / d) as Limb;
        rem = num % d;
    }
    Ok((normalized_len(&z[..z_len]), rem as u64))
}

/// Returns `x mod d`.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `d` is zero.
pub fn rem_limb(x: &[Limb], d: Limb) -> Result<Limb> {
    if d == 0 {
        return Err(Error::DivisionByZero);
    }
    let d = WideLimb::from(d);
    let rem = x
        .iter()
        .rev()
        .fold(0, |rem, &a| (rem << LIMB_BITS | WideLimb::from(a)) % d);
    Ok(split(rem).0)
}

/// Writes `x << s` into `z[..x.len()]` and returns the bits shifted out
/// of the top limb. `s` is below [`LIMB_BITS`].
fn shl_bits_into(z: &mut [Limb], x: &[Limb], s: u32) -> Limb {
    if s == 0 {
        z[..x.len()].copy_from_slice(x);
        return 0;
    }
    let mut carry = 0;
    for (i, &a) in x.iter().enumerate() {
        z[i] = a << s | carry;
        carry = a >> (LIMB_BITS - s);
    }
    carry
}

/// Shifts `z` right by `s < LIMB_BITS` bits in place.
fn shr_bits_within(z: &mut [Limb], s: u32) {
    if s == 0 {
        return;
    }
    for i in 0..z.len() {
        let next = z.get(i + 1).map_or(0, |&limb| limb << (LIMB_BITS - s));
        z[i] = z[i] >> s | next;
    }
}

/// Estimates the quotient digit of `(u2·b^2 + u1·b + u0) / (v1·b + v0)`.
///
/// The estimate is exact or one too large.
#[allow(clippy::cast_possible_truncation)]
fn estimate(u2: Limb, u1: Limb, u0: Limb, v1: Limb, v0: Limb) -> Limb {
    const BASE: WideLimb = 1 << LIMB_BITS;

    let num = join(u2, u1);
    let v1 = WideLimb::from(v1);
    let mut qhat = num / v1;
    let mut rhat = num % v1;
    while qhat >= BASE
        || qhat * WideLimb::from(v0) > join(rhat as Limb, u0)
    {
        qhat -= 1;
        rhat += v1;
        if rhat >= BASE {
            break;
        }
    }
    qhat as Limb
}

/// Divides `x` by the normalized `y` with Algorithm D.
///
/// `u` receives the working dividend: on return the quotient sits in
/// `u[n..=m + n]` and the remainder in `u[..n]`, where `n = y.len()` and
/// `m = x.len() - n`. `v` receives the normalized divisor. Returns the
/// normalized lengths `(quotient, remainder)`.
///
/// # Panics
///
/// If `y` has fewer than two limbs, `x` is shorter than `y`, `u` holds fewer
/// than `x.len() + 1` limbs or `v` fewer than `y.len()`.
pub fn knuth_div_rem(
    u: &mut [Limb],
    v: &mut [Limb],
    x: &[Limb],
    y: &[Limb],
) -> (usize, usize) {
    let n = y.len();
    assert!(n >= 2, "divisor must have at least two limbs");
    assert!(x.len() >= n, "dividend must be at least as long as divisor");
    let m = x.len() - n;

    let _span =
        tracing::trace_span!("knuth_div_rem", dividend = x.len(), divisor = n)
            .entered();

    // Normalize so that the top bit of the divisor is set.
    let s = y[n - 1].leading_zeros();
    let spill = shl_bits_into(v, y, s);
    debug_assert_eq!(spill, 0);
    let spill = shl_bits_into(u, x, s);
    u[x.len()] = spill;

    let (v1, v0) = (v[n - 1], v[n - 2]);
    for j in (0..=m).rev() {
        let mut qhat = estimate(u[j + n], u[j + n - 1], u[j + n - 2], v1, v0);

        // u[j..=j + n] -= qhat * v
        let mut carry = 0;
        let mut borrow = 0;
        for i in 0..n {
            let (lo, hi) = carrying_mul(qhat, v[i], carry);
            carry = hi;
            (u[j + i], borrow) = sbb(u[j + i], lo, borrow);
        }
        (u[j + n], borrow) = sbb(u[j + n], carry, borrow);

        if borrow != 0 {
            qhat -= 1;
            let mut carry = 0;
            for i in 0..n {
                (u[j + i], carry) = adc(u[j + i], v[i], carry);
            }
            u[j + n] = u[j + n].wrapping_add(carry);
        }
        debug_assert_eq!(u[j + n], 0);
        u[j + n] = qhat;
    }

    shr_bits_within(&mut u[..n], s);
    (normalized_len(&u[n..=m + n]), normalized_len(&u[..n]))
}

/// Algorithm D for a normalized two-limb divisor, held in registers.
///
/// The layout of `u` on return is the same as for [`knuth_div_rem`] with
/// `n = 2`.
///
/// # Panics
///
/// If `y` does not have exactly two limbs, `x` is shorter than `y` or `u`
/// holds fewer than `x.len() + 1` limbs.
#[allow(clippy::cast_possible_truncation)]
pub fn knuth_div_rem_2(
    u: &mut [Limb],
    x: &[Limb],
    y: &[Limb],
) -> (usize, usize) {
    assert_eq!(y.len(), 2, "divisor must have two limbs");
    assert!(x.len() >= 2, "dividend must be at least as long as divisor");
    let m = x.len() - 2;

    let s = y[1].leading_zeros();
    let d = join(y[1], y[0]) << s;
    let (v0, v1) = split(d);
    let spill = shl_bits_into(u, x, s);
    u[x.len()] = spill;

    let d = u128::from(d);
    for j in (0..=m).rev() {
        let (u2, u1, u0) = (u[j + 2], u[j + 1], u[j]);
        let mut qhat = estimate(u2, u1, u0, v1, v0);

        let window =
            u128::from(u2) << (2 * LIMB_BITS) | u128::from(join(u1, u0));
        let mut product = u128::from(qhat) * d;
        if product > window {
            qhat -= 1;
            product -= d;
        }
        (u[j], u[j + 1]) = split((window - product) as WideLimb);
        u[j + 2] = qhat;
    }

    let (lo, hi) = split(join(u[1], u[0]) >> s);
    (u[0], u[1]) = (lo, hi);
    (normalized_len(&u[2..=m + 2]), normalized_len(&u[..2]))
}

/// Runs the division chosen by [`div_path`], writing whichever of the
/// quotient and remainder destinations are provided.
fn div_rem_dispatch(
    mut q: Option<&mut [Limb]>,
    mut r: Option<&mut [Limb]>,
    x: &[Limb],
    y: &[Limb],
) -> Result<(usize, usize)> {
    let (x, y) = (normalize(x), normalize(y));
    let path = div_path(x, y)?;
    if let Some(q) = q.as_deref() {
        ensure_fits(div_len(x, y), q.len())?;
    }
    if let Some(r) = r.as_deref() {
        ensure_fits(rem_len(x, y), r.len())?;
    }

    match path {
        DivPath::Limb(d) => {
            let rem = match q {
                Some(q) => {
                    let (q_len, rem) = div_rem_limb(q, x, d)?;
                    return Ok((q_len, write_limb_rem(r, rem)));
                }
                None => rem_limb(x, d)?,
            };
            Ok((0, write_limb_rem(r, rem)))
        }
        DivPath::Trivial(false) => {
            let r_len = r.map_or(0, |r| {
                r[..x.len()].copy_from_slice(x);
                x.len()
            });
            Ok((0, r_len))
        }
        DivPath::Trivial(true) => {
            let q_len = q.map_or(0, |q| {
                q[0] = 1;
                1
            });
            let r_len = r.map_or(0, |r| sub_into(r, x, y));
            Ok((q_len, r_len))
        }
        DivPath::PowerOfTwo(k) => {
            let q_len = match q.as_deref_mut() {
                Some(q) => set_shr(q, x, k)?,
                None => 0,
            };
            let r_len = match r.as_deref_mut() {
                Some(r) => set_low_bits(r, x, k)?,
                None => 0,
            };
            Ok((q_len, r_len))
        }
        DivPath::TwoLimbs | DivPath::General => {
            let mut u = vec![0; x.len() + 1];
            let (q_len, r_len) = if path == DivPath::TwoLimbs {
                knuth_div_rem_2(&mut u, x, y)
            } else {
                let mut v = vec![0; y.len()];
                knuth_div_rem(&mut u, &mut v, x, y)
            };

            let n = y.len();
            let q_len = q.map_or(0, |q| {
                q[..q_len].copy_from_slice(&u[n..n + q_len]);
                q_len
            });
            let r_len = r.map_or(0, |r| {
                r[..r_len].copy_from_slice(&u[..r_len]);
                r_len
            });
            Ok((q_len, r_len))
        }
    }
}

fn write_limb_rem(r: Option<&mut [Limb]>, rem: Limb) -> usize {
    match r {
        Some(r) if rem != 0 => {
            r[0] = rem;
            1
        }
        _ => 0,
    }
}

/// Computes the quotient and remainder of `x / y` into `q` and `r`.
///
/// Returns the normalized lengths `(quotient, remainder)`.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero, [`Error::Overflow`] if `q`
/// holds fewer than [`div_len`] limbs or `r` fewer than [`rem_len`].
pub fn set_div_rem(
    q: &mut [Limb],
    r: &mut [Limb],
    x: &[Limb],
    y: &[Limb],
) -> Result<(usize, usize)> {
    div_rem_dispatch(Some(q), Some(r), x, y)
}

/// Computes `x / y` into `q` and returns its normalized length.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero, [`Error::Overflow`] if `q`
/// holds fewer than [`div_len`] limbs.
pub fn set_div(q: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    div_rem_dispatch(Some(q), None, x, y).map(|(q_len, _)| q_len)
}

/// Computes `x % y` into `r` and returns its normalized length.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero, [`Error::Overflow`] if `r`
/// holds fewer than [`rem_len`] limbs.
pub fn set_rem(r: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    div_rem_dispatch(None, Some(r), x, y).map(|(_, r_len)| r_len)
}

/// Allocates and returns the quotient and remainder of `x / y`.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero.
pub fn new_div_rem(x: &[Limb], y: &[Limb]) -> Result<(Vec<Limb>, Vec<Limb>)> {
    let mut q = alloc_limbs(div_len(x, y))?;
    let mut r = alloc_limbs(rem_len(x, y))?;
    div_rem_dispatch(Some(&mut q), Some(&mut r), x, y)?;
    Ok((q, r))
}

/// Allocates and returns `x / y`.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero.
pub fn new_div(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let mut q = alloc_limbs(div_len(x, y))?;
    div_rem_dispatch(Some(&mut q), None, x, y)?;
    Ok(q)
}

/// Allocates and returns `x % y`.
///
/// # Errors
///
/// [`Error::DivisionByZero`] if `y` is zero.
pub fn new_rem(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let mut r = alloc_limbs(rem_len(x, y))?;
    div_rem_dispatch(None, Some(&mut r), x, y)?;
    Ok(r)
}

/// Divides with Algorithm D regardless of the operands' shape, returning
/// the normalized quotient and remainder.
#[cfg(all(test, feature = "std"))]
pub(crate) fn div_rem_general(
    x: &[Limb],
    y: &[Limb],
) -> (Vec<Limb>, Vec<Limb>) {
    let n = y.len();
    let mut u = vec![0; x.len() + 1];
    let mut v = vec![0; n];
    let (q_len, r_len) = knuth_div_rem(&mut u, &mut v, x, y);
    (u[n..n + q_len].to_vec(), u[..r_len].to_vec())
}
