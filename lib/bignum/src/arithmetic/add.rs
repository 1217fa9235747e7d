//! Addition and subtraction of magnitudes.

use alloc::vec::Vec;
use core::cmp::Ordering;

use super::{
    alloc_limbs, bit_len, cmp, cmp_u64,
    limb::{adc, sbb},
    limb_at, limbs_for_bits, normalize, normalized_len, scalar_limbs, Limb,
};
use crate::error::{ensure_fits, Error, Result};

/// Minimum destination length for `x + y`.
#[must_use]
pub fn add_len(x: &[Limb], y: &[Limb]) -> usize {
    limbs_for_bits(u64::from(bit_len(x).max(bit_len(y))) + 1)
}

/// Minimum destination length for `x + value`.
#[must_use]
pub fn add_u64_len(x: &[Limb], value: u64) -> usize {
    let value_bits = u64::BITS - value.leading_zeros();
    limbs_for_bits(u64::from(bit_len(x).max(value_bits)) + 1)
}

/// Checks that `z_len` addresses a prefix of a slice of `len` limbs.
#[inline]
pub(crate) fn ensure_prefix(z_len: usize, len: usize) -> Result<()> {
    if z_len > len {
        return Err(Error::InvalidArgument { what: "z_len" });
    }
    Ok(())
}

/// Computes `x + y` into `z`, which must hold [`add_len`] limbs.
pub(crate) fn add_into(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> usize {
    let (long, short) = if x.len() >= y.len() { (x, y) } else { (y, x) };

    let mut carry = 0;
    for (i, &a) in long.iter().enumerate() {
        (z[i], carry) = adc(a, limb_at(short, i), carry);
    }

    let len = long.len();
    if carry != 0 {
        z[len] = carry;
        len + 1
    } else {
        normalized_len(&z[..len])
    }
}

/// Adds `y` to `z[..z_len]` in place.
///
/// Stops as soon as `y` is exhausted and the carry vanishes, leaving the
/// remaining limbs of `z` untouched.
pub(crate) fn add_assign_into(
    z: &mut [Limb],
    z_len: usize,
    y: &[Limb],
) -> usize {
    let len = z_len.max(y.len());
    let mut carry = 0;
    let mut i = 0;
    while i < len && (i < y.len() || carry != 0) {
        let a = if i < z_len { z[i] } else { 0 };
        (z[i], carry) = adc(a, limb_at(y, i), carry);
        i += 1;
    }

    if carry != 0 {
        z[len] = carry;
        len + 1
    } else {
        normalized_len(&z[..len])
    }
}

/// Computes `x - y` into `z`. Requires `x >= y` and `z.len() >= x.len()`.
pub(crate) fn sub_into(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> usize {
    let mut borrow = 0;
    for (i, &a) in x.iter().enumerate() {
        (z[i], borrow) = sbb(a, limb_at(y, i), borrow);
    }
    debug_assert_eq!(borrow, 0, "subtraction underflow");
    normalized_len(&z[..x.len()])
}

/// Subtracts `y` from `z[..z_len]` in place. Requires `z[..z_len] >= y`.
pub(crate) fn sub_assign_into(
    z: &mut [Limb],
    z_len: usize,
    y: &[Limb],
) -> usize {
    let mut borrow = 0;
    let mut i = 0;
    while i < z_len && (i < y.len() || borrow != 0) {
        (z[i], borrow) = sbb(z[i], limb_at(y, i), borrow);
        i += 1;
    }
    debug_assert_eq!(borrow, 0, "subtraction underflow");
    normalized_len(&z[..z_len])
}

/// Computes `y - z[..z_len]` into `z`. Requires `y >= z[..z_len]` and
/// `z.len() >= y.len()`.
fn rsub_assign_into(z: &mut [Limb], z_len: usize, y: &[Limb]) -> usize {
    let mut borrow = 0;
    for (i, &a) in y.iter().enumerate() {
        let b = if i < z_len { z[i] } else { 0 };
        (z[i], borrow) = sbb(a, b, borrow);
    }
    debug_assert_eq!(borrow, 0, "subtraction underflow");
    normalized_len(&z[..y.len()])
}

/// Allocates and returns `x + y`.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if the sum exceeds the supported size.
pub fn new_add(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    let mut z = alloc_limbs(add_len(x, y))?;
    add_into(&mut z, x, y);
    Ok(z)
}

/// Computes `x + y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`add_len`] limbs.
pub fn set_add(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    ensure_fits(add_len(x, y), z.len())?;
    Ok(add_into(z, x, y))
}

/// Computes `z[..z_len] + y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` cannot hold the sum.
pub fn add_assign(z: &mut [Limb], z_len: usize, y: &[Limb]) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    ensure_fits(add_len(&z[..z_len], y), z.len())?;
    Ok(add_assign_into(z, z_len, y))
}

/// Allocates and returns `x + value`.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if the sum exceeds the supported size.
pub fn new_add_u64(x: &[Limb], value: u64) -> Result<Vec<Limb>> {
    let x = normalize(x);
    let mut z = alloc_limbs(add_u64_len(x, value))?;
    set_add_u64(&mut z, x, value)?;
    Ok(z)
}

/// Computes `x + value` into `z` and returns its normalized length.
///
/// Limbs of `x` above the last carry are copied unchanged.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`add_u64_len`] limbs.
pub fn set_add_u64(z: &mut [Limb], x: &[Limb], value: u64) -> Result<usize> {
    let x = normalize(x);
    ensure_fits(add_u64_len(x, value), z.len())?;

    let (v, v_len) = scalar_limbs(value);
    let v = &v[..v_len];
    let len = x.len().max(v_len);
    let mut carry = 0;
    let mut i = 0;
    while i < len && (i < v_len || carry != 0) {
        (z[i], carry) = adc(limb_at(x, i), limb_at(v, i), carry);
        i += 1;
    }
    if i < x.len() {
        z[i..x.len()].copy_from_slice(&x[i..]);
    }

    if carry != 0 {
        z[len] = carry;
        Ok(len + 1)
    } else {
        Ok(normalized_len(&z[..len]))
    }
}

/// Computes `z[..z_len] + value` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` cannot hold the sum.
pub fn add_u64_assign(
    z: &mut [Limb],
    z_len: usize,
    value: u64,
) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let z_len = normalized_len(&z[..z_len]);
    ensure_fits(add_u64_len(&z[..z_len], value), z.len())?;

    let (v, v_len) = scalar_limbs(value);
    Ok(add_assign_into(z, z_len, &v[..v_len]))
}

/// Allocates and returns `x - y`.
///
/// # Errors
///
/// [`Error::Underflow`] if `x < y`.
pub fn new_sub(x: &[Limb], y: &[Limb]) -> Result<Vec<Limb>> {
    let (x, y) = (normalize(x), normalize(y));
    if cmp(x, y) == Ordering::Less {
        return Err(Error::Underflow);
    }
    let mut z = alloc_limbs(x.len())?;
    sub_into(&mut z, x, y);
    Ok(z)
}

/// Computes `x - y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` is shorter than `x`, [`Error::Underflow`] if
/// `x < y`.
pub fn set_sub(z: &mut [Limb], x: &[Limb], y: &[Limb]) -> Result<usize> {
    let (x, y) = (normalize(x), normalize(y));
    ensure_fits(x.len(), z.len())?;
    if cmp(x, y) == Ordering::Less {
        return Err(Error::Underflow);
    }
    Ok(sub_into(z, x, y))
}

/// Computes `z[..z_len] - y` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Underflow`] if
/// `z[..z_len] < y`.
pub fn sub_assign(z: &mut [Limb], z_len: usize, y: &[Limb]) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    if cmp(&z[..z_len], y) == Ordering::Less {
        return Err(Error::Underflow);
    }
    Ok(sub_assign_into(z, z_len, y))
}

/// Computes `y - z[..z_len]` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` is shorter than `y`, [`Error::Underflow`] if `y < z[..z_len]`.
pub fn rsub_assign(z: &mut [Limb], z_len: usize, y: &[Limb]) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let (z_len, y) = (normalized_len(&z[..z_len]), normalize(y));
    ensure_fits(y.len(), z.len())?;
    if cmp(y, &z[..z_len]) == Ordering::Less {
        return Err(Error::Underflow);
    }
    Ok(rsub_assign_into(z, z_len, y))
}

/// Allocates and returns `x - value`.
///
/// # Errors
///
/// [`Error::Underflow`] if `x < value`.
pub fn new_sub_u64(x: &[Limb], value: u64) -> Result<Vec<Limb>> {
    let x = normalize(x);
    let mut z = alloc_limbs(x.len())?;
    set_sub_u64(&mut z, x, value)?;
    Ok(z)
}

/// Computes `x - value` into `z` and returns its normalized length.
///
/// Limbs of `x` above the last borrow are copied unchanged.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` is shorter than `x`, [`Error::Underflow`] if
/// `x < value`.
pub fn set_sub_u64(z: &mut [Limb], x: &[Limb], value: u64) -> Result<usize> {
    let x = normalize(x);
    ensure_fits(x.len(), z.len())?;
    if cmp_u64(x, value) == Ordering::Less {
        return Err(Error::Underflow);
    }

    let (v, v_len) = scalar_limbs(value);
    let v = &v[..v_len];
    let mut borrow = 0;
    let mut i = 0;
    while i < x.len() && (i < v_len || borrow != 0) {
        (z[i], borrow) = sbb(x[i], limb_at(v, i), borrow);
        i += 1;
    }
    z[i..x.len()].copy_from_slice(&x[i..]);
    Ok(normalized_len(&z[..x.len()]))
}

/// Computes `z[..z_len] - value` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Underflow`] if
/// `z[..z_len] < value`.
pub fn sub_u64_assign(
    z: &mut [Limb],
    z_len: usize,
    value: u64,
) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let z_len = normalized_len(&z[..z_len]);
    if cmp_u64(&z[..z_len], value) == Ordering::Less {
        return Err(Error::Underflow);
    }

    let (v, v_len) = scalar_limbs(value);
    Ok(sub_assign_into(z, z_len, &v[..v_len]))
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::vec;

    use proptest::prelude::*;

    use super::*;
    use crate::test_helpers::{from_biguint, limbs, to_biguint};

    #[test]
    fn carry_extends_the_magnitude() {
        let z = new_add(&[Limb::MAX], &[1]).unwrap();
        assert_eq!(&z[..2], &[0, 1]);

        let mut z = [Limb::MAX, Limb::MAX, 0, 0];
        assert_eq!(add_u64_assign(&mut z, 2, 1).unwrap(), 3);
        assert_eq!(z, [0, 0, 1, 0]);
    }

    #[test]
    fn undersized_destination_is_rejected() {
        let mut z = [0; 1];
        assert_eq!(
            set_add(&mut z, &[Limb::MAX], &[1]),
            Err(Error::Overflow { required: 2, available: 1 })
        );
        assert_eq!(z, [0]);

        let mut z = [Limb::MAX, 0];
        assert_eq!(add_assign(&mut z, 1, &[1]), Ok(2));
        assert_eq!(z, [0, 1]);

        let mut z = [Limb::MAX];
        assert!(matches!(
            add_assign(&mut z, 1, &[1]),
            Err(Error::Overflow { .. })
        ));
        assert!(matches!(
            add_assign(&mut z, 2, &[1]),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn underflow_is_rejected_before_writing() {
        let mut z = [7, 7];
        assert_eq!(set_sub(&mut z, &[1], &[2]), Err(Error::Underflow));
        assert_eq!(sub_assign(&mut z, 1, &[0, 1]), Err(Error::Underflow));
        assert_eq!(rsub_assign(&mut z, 2, &[1]), Err(Error::Underflow));
        assert_eq!(set_sub_u64(&mut z, &[1], 2), Err(Error::Underflow));
        assert_eq!(z, [7, 7]);
    }

    #[test]
    fn garbage_above_len_is_ignored() {
        let mut z = [5, 0xdead, 0xbeef, 0];
        assert_eq!(add_assign(&mut z, 1, &[1, 2]).unwrap(), 2);
        assert_eq!(&z[..2], &[6, 2]);

        let mut z = [5, 0xdead, 0xbeef];
        assert_eq!(rsub_assign(&mut z, 1, &[7, 1]).unwrap(), 2);
        assert_eq!(&z[..2], &[2, 1]);
    }

    #[test]
    fn high_zero_limbs_are_dropped_on_entry() {
        let x = new_add(&[2], &[1]).unwrap();
        assert_eq!(x, [3, 0, 0, 0]);

        let mut z = [0; 1];
        assert_eq!(set_add(&mut z, &x, &[2, 0]), Ok(1));
        assert_eq!(z, [5]);
        assert_eq!(set_sub(&mut z, &x, &[1, 0, 0]), Ok(1));
        assert_eq!(z, [2]);

        let mut z = [9, 0, 0, 0xdead];
        assert_eq!(sub_assign(&mut z, 3, &x), Ok(1));
        assert_eq!(z[0], 6);
    }

    #[test]
    fn check_add() {
        proptest!(|(x in limbs(6), y in limbs(6))| {
            let expected = to_biguint(&x) + to_biguint(&y);

            let z = new_add(&x, &y).unwrap();
            prop_assert_eq!(to_biguint(&z), expected.clone());

            let expected = from_biguint(&expected);
            let mut z = vec![0; add_len(&x, &y)];
            let len = set_add(&mut z, &x, &y).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());

            let mut z = x.clone();
            z.resize(add_len(&x, &y), Limb::MAX);
            let len = add_assign(&mut z, x.len(), &y).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());
        });
    }

    #[test]
    fn check_sub() {
        proptest!(|(x in limbs(6), y in limbs(6))| {
            let (x, y) =
                if cmp(&x, &y) == Ordering::Less { (y, x) } else { (x, y) };
            let expected = from_biguint(&(to_biguint(&x) - to_biguint(&y)));

            let mut z = vec![0; x.len()];
            let len = set_sub(&mut z, &x, &y).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());

            let mut z = x.clone();
            let len = sub_assign(&mut z, x.len(), &y).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());

            let mut z = y.clone();
            z.resize(x.len(), Limb::MAX);
            let len = rsub_assign(&mut z, y.len(), &x).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());
        });
    }

    #[test]
    fn check_add_sub_inverse() {
        proptest!(|(x in limbs(5), y in limbs(5))| {
            let sum = new_add(&x, &y).unwrap();
            let sum = &sum[..normalized_len(&sum)];
            let back = new_sub(sum, &y).unwrap();
            prop_assert_eq!(&back[..normalized_len(&back)], x.as_slice());
        });
    }

    #[test]
    fn check_scalar_add() {
        proptest!(|(x in limbs(4), value: u64)| {
            let expected = from_biguint(&(to_biguint(&x) + value));

            let mut z = vec![0; add_u64_len(&x, value)];
            let len = set_add_u64(&mut z, &x, value).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());

            let mut z = x.clone();
            z.resize(add_u64_len(&x, value), Limb::MAX);
            let len = add_u64_assign(&mut z, x.len(), value).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());
        });
    }

    #[test]
    fn scalar_sub_agrees_with_general_sub() {
        // One- and two-limb scalars take the same path as a general
        // subtraction of the scalar's limbs.
        proptest!(|(x in limbs(4), value: u64)| {
            let (v, v_len) = scalar_limbs(value);
            let general = new_sub(&x, &v[..v_len]);
            let scalar = new_sub_u64(&x, value);
            match (general, scalar) {
                (Ok(general), Ok(scalar)) => {
                    prop_assert_eq!(
                        &general[..normalized_len(&general)],
                        &scalar[..normalized_len(&scalar)]
                    );
                }
                (general, scalar) => {
                    prop_assert_eq!(general.unwrap_err(), Error::Underflow);
                    prop_assert_eq!(scalar.unwrap_err(), Error::Underflow);
                }
            }

            let small = value as Limb;
            let mut z = x.clone();
            let assigned = sub_u64_assign(&mut z, x.len(), u64::from(small));
            let general = new_sub(&x, &[small][..usize::from(small != 0)]);
            prop_assert_eq!(assigned.is_ok(), general.is_ok());
            if let (Ok(len), Ok(general)) = (assigned, general) {
                let general = &general[..normalized_len(&general)];
                prop_assert_eq!(&z[..len], general);
            }
        });
    }
}
