//! Bit shifts of magnitudes.

use alloc::vec::Vec;

use super::{
    add::ensure_prefix, alloc_bits, alloc_limbs, bit_len, limb_at,
    limbs_for_bits, normalize, normalized_len, Limb, LIMB_BITS,
};
use crate::error::{ensure_fits, Result};

/// Minimum destination length for `x << n`.
#[must_use]
pub fn shl_len(x: &[Limb], n: u32) -> usize {
    match bit_len(x) {
        0 => 0,
        bits => limbs_for_bits(u64::from(bits) + u64::from(n)),
    }
}

/// Minimum destination length for `x >> n`.
#[must_use]
pub fn shr_len(x: &[Limb], n: u32) -> usize {
    let bits = bit_len(x);
    if n >= bits {
        return 0;
    }
    limbs_for_bits(u64::from(bits - n))
}

fn split_shift(n: u32) -> (usize, u32) {
    ((n / LIMB_BITS) as usize, n % LIMB_BITS)
}

fn shl_into(z: &mut [Limb], x: &[Limb], n: u32) -> usize {
    let len = shl_len(x, n);
    if len == 0 {
        return 0;
    }
    let (limbs, bits) = split_shift(n);

    z[..limbs].fill(0);
    if bits == 0 {
        z[limbs..limbs + x.len()].copy_from_slice(x);
    } else {
        let mut carry = 0;
        for (i, &a) in x.iter().enumerate() {
            z[limbs + i] = a << bits | carry;
            carry = a >> (LIMB_BITS - bits);
        }
        if carry != 0 {
            z[limbs + x.len()] = carry;
        }
    }
    len
}

/// Shifts `z[..z_len]` left by `n` bits in place, writing high to low.
///
/// `z` must hold [`shl_len`] limbs.
pub(crate) fn shl_within(z: &mut [Limb], z_len: usize, n: u32) -> usize {
    let len = shl_len(&z[..z_len], n);
    if len == 0 {
        return 0;
    }
    let (limbs, bits) = split_shift(n);

    if bits == 0 {
        z.copy_within(..z_len, limbs);
    } else {
        let spill = z[z_len - 1] >> (LIMB_BITS - bits);
        if spill != 0 {
            z[limbs + z_len] = spill;
        }
        for i in (1..z_len).rev() {
            z[limbs + i] = z[i] << bits | z[i - 1] >> (LIMB_BITS - bits);
        }
        z[limbs] = z[0] << bits;
    }
    z[..limbs].fill(0);
    len
}

fn shr_into(z: &mut [Limb], x: &[Limb], n: u32) -> usize {
    let len = shr_len(x, n);
    if len == 0 {
        return 0;
    }
    let (limbs, bits) = split_shift(n);

    if bits == 0 {
        z[..len].copy_from_slice(&x[limbs..limbs + len]);
    } else {
        for i in 0..len {
            z[i] = x[limbs + i] >> bits
                | limb_at(x, limbs + i + 1) << (LIMB_BITS - bits);
        }
    }
    len
}

/// Shifts `z[..z_len]` right by `n` bits in place, writing low to high.
pub(crate) fn shr_within(z: &mut [Limb], z_len: usize, n: u32) -> usize {
    let len = shr_len(&z[..z_len], n);
    if len == 0 {
        return 0;
    }
    let (limbs, bits) = split_shift(n);

    if bits == 0 {
        z.copy_within(limbs..limbs + len, 0);
    } else {
        for i in 0..len {
            // The top output limb may read one limb past the active range.
            let next = if limbs + i + 1 < z_len { z[limbs + i + 1] } else { 0 };
            z[i] = z[limbs + i] >> bits | next << (LIMB_BITS - bits);
        }
    }
    len
}

/// Allocates and returns `x << n`.
///
/// # Errors
///
/// [`Error::InvalidAllocation`] if the result exceeds the supported size.
///
/// [`Error::InvalidAllocation`]: crate::Error::InvalidAllocation
pub fn new_shl(x: &[Limb], n: u32) -> Result<Vec<Limb>> {
    let x = normalize(x);
    let mut z = if x.is_empty() {
        Vec::new()
    } else {
        alloc_bits(u64::from(bit_len(x)) + u64::from(n))?
    };
    shl_into(&mut z, x, n);
    Ok(z)
}

/// Computes `x << n` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`shl_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_shl(z: &mut [Limb], x: &[Limb], n: u32) -> Result<usize> {
    let x = normalize(x);
    ensure_fits(shl_len(x, n), z.len())?;
    Ok(shl_into(z, x, n))
}

/// Computes `z[..z_len] << n` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`, [`Error::Overflow`] if
/// `z` cannot hold the result.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn shl_assign(z: &mut [Limb], z_len: usize, n: u32) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let z_len = normalized_len(&z[..z_len]);
    ensure_fits(shl_len(&z[..z_len], n), z.len())?;
    Ok(shl_within(z, z_len, n))
}

/// Allocates and returns `x >> n`.
///
/// # Errors
///
/// Infallible in practice; the result is never larger than `x`.
pub fn new_shr(x: &[Limb], n: u32) -> Result<Vec<Limb>> {
    let x = normalize(x);
    let mut z = alloc_limbs(shr_len(x, n))?;
    shr_into(&mut z, x, n);
    Ok(z)
}

/// Computes `x >> n` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`shr_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_shr(z: &mut [Limb], x: &[Limb], n: u32) -> Result<usize> {
    let x = normalize(x);
    ensure_fits(shr_len(x, n), z.len())?;
    Ok(shr_into(z, x, n))
}

/// Computes `z[..z_len] >> n` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
pub fn shr_assign(z: &mut [Limb], z_len: usize, n: u32) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    let z_len = normalized_len(&z[..z_len]);
    Ok(shr_within(z, z_len, n))
}

/// Minimum destination length for `x mod 2^k`.
#[must_use]
pub fn low_bits_len(x: &[Limb], k: u32) -> usize {
    normalize(x).len().min(limbs_for_bits(k.into()))
}

/// Computes `x mod 2^k` into `z` and returns its normalized length.
///
/// # Errors
///
/// [`Error::Overflow`] if `z` holds fewer than [`low_bits_len`] limbs.
///
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn set_low_bits(z: &mut [Limb], x: &[Limb], k: u32) -> Result<usize> {
    let x = normalize(x);
    let len = low_bits_len(x, k);
    ensure_fits(len, z.len())?;
    z[..len].copy_from_slice(&x[..len]);
    Ok(low_bits_within(z, len, k))
}

/// Truncates `z[..z_len]` to its `k` low bits and returns the normalized
/// length.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `z_len > z.len()`.
///
/// [`Error::InvalidArgument`]: crate::Error::InvalidArgument
pub fn low_bits_assign(z: &mut [Limb], z_len: usize, k: u32) -> Result<usize> {
    ensure_prefix(z_len, z.len())?;
    Ok(low_bits_within(z, z_len, k))
}

fn low_bits_within(z: &mut [Limb], z_len: usize, k: u32) -> usize {
    let len = low_bits_len(&z[..z_len], k);
    let bits = k % LIMB_BITS;
    if bits != 0 && len == limbs_for_bits(k.into()) {
        z[len - 1] &= (1 << bits) - 1;
    }
    normalized_len(&z[..len])
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::vec;

    use proptest::prelude::*;

    use super::*;
    use crate::{
        test_helpers::{from_biguint, limbs, to_biguint},
        Error,
    };

    #[test]
    fn shift_across_limb_boundary() {
        let z = new_shl(&[1], 32).unwrap();
        assert_eq!(&z[..2], &[0, 1]);

        let mut z = [0x8000_0001, 0, 0];
        assert_eq!(shl_assign(&mut z, 1, 1).unwrap(), 2);
        assert_eq!(&z[..2], &[2, 1]);
        assert_eq!(shr_assign(&mut z, 2, 33).unwrap(), 0);
    }

    #[test]
    fn shifting_zero_yields_zero() {
        assert!(new_shl(&[], 1000).unwrap().is_empty());
        assert_eq!(set_shr(&mut [], &[], 3), Ok(0));
        assert_eq!(shr_len(&[0xff], 8), 0);
    }

    #[test]
    fn undersized_destination_is_rejected() {
        let mut z = [0; 1];
        assert_eq!(
            set_shl(&mut z, &[0x8000_0000], 1),
            Err(Error::Overflow { required: 2, available: 1 })
        );
    }

    #[test]
    fn high_zero_limbs_are_dropped_on_entry() {
        let x = new_shl(&[1], 0).unwrap();
        assert_eq!(x, [1, 0, 0, 0]);

        let mut z = [0; 2];
        assert_eq!(set_shl(&mut z, &x, 32), Ok(2));
        assert_eq!(z, [0, 1]);
        assert_eq!(set_shr(&mut z, &[0, 1, 0, 0], 1), Ok(1));
        assert_eq!(z[0], 0x8000_0000);

        let mut z = x;
        assert_eq!(shl_assign(&mut z, 4, 96), Ok(4));
        assert_eq!(z, [0, 0, 0, 1]);
    }

    #[test]
    fn low_bits_truncate() {
        let mut z = [0; 2];
        assert_eq!(set_low_bits(&mut z, &[Limb::MAX, Limb::MAX, 1], 40), Ok(2));
        assert_eq!(z, [Limb::MAX, 0xff]);
        let mut z = [Limb::MAX, 0x100];
        assert_eq!(low_bits_assign(&mut z, 2, 40), Ok(1));
    }

    #[test]
    fn check_shl() {
        proptest!(|(x in limbs(5), n in 0u32..200)| {
            let expected = from_biguint(&(to_biguint(&x) << n));

            let mut z = vec![0; shl_len(&x, n)];
            let len = set_shl(&mut z, &x, n).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());

            let mut z = x.clone();
            z.resize(shl_len(&x, n).max(x.len()), Limb::MAX);
            let len = shl_assign(&mut z, x.len(), n).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());
        });
    }

    #[test]
    fn check_shr() {
        proptest!(|(x in limbs(5), n in 0u32..200)| {
            let expected = from_biguint(&(to_biguint(&x) >> n));

            let mut z = vec![0; shr_len(&x, n)];
            let len = set_shr(&mut z, &x, n).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());

            let mut z = x.clone();
            z.push(Limb::MAX);
            let len = shr_assign(&mut z, x.len(), n).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());
        });
    }

    #[test]
    fn check_shift_inverse() {
        proptest!(|(x in limbs(5), n in 0u32..300)| {
            let shifted = new_shl(&x, n).unwrap();
            let shifted = &shifted[..normalized_len(&shifted)];
            let back = new_shr(shifted, n).unwrap();
            prop_assert_eq!(&back[..normalized_len(&back)], x.as_slice());
        });
    }

    #[test]
    fn check_low_bits() {
        proptest!(|(x in limbs(5), k in 0u32..200)| {
            let mask = (num_bigint::BigUint::from(1u8) << k) - 1u8;
            let expected = from_biguint(&(to_biguint(&x) & mask));
            let mut z = x.clone();
            let len = low_bits_assign(&mut z, x.len(), k).unwrap();
            prop_assert_eq!(&z[..len], expected.as_slice());
        });
    }
}
