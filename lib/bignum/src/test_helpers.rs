use alloc::vec::Vec;

use num_bigint::BigUint;
use proptest::prelude::*;

use crate::arithmetic::{normalized_len, Limb};

/// A single limb, biased toward the values that exercise carries and
/// borrows.
pub(crate) fn limb() -> impl Strategy<Value = Limb> {
    prop_oneof![
        6 => any::<Limb>(),
        1 => Just(0),
        1 => Just(Limb::MAX),
        1 => Just(1 << 31),
    ]
}

/// A normalized magnitude of at most `max_len` limbs.
pub(crate) fn limbs(max_len: usize) -> impl Strategy<Value = Vec<Limb>> {
    prop::collection::vec(limb(), 0..=max_len).prop_map(|mut x| {
        x.truncate(normalized_len(&x));
        x
    })
}

/// A normalized magnitude of `min_len..=max_len` limbs.
pub(crate) fn limbs_in(
    min_len: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<Limb>> {
    (prop::collection::vec(limb(), min_len..=max_len), 1..=Limb::MAX)
        .prop_map(|(mut x, top)| {
            if let Some(last) = x.last_mut() {
                if *last == 0 {
                    *last = top;
                }
            }
            x
        })
}

/// A non-zero normalized magnitude of at most `max_len` limbs.
pub(crate) fn nonzero_limbs(
    max_len: usize,
) -> impl Strategy<Value = Vec<Limb>> {
    limbs_in(1, max_len)
}

pub(crate) fn to_biguint(x: &[Limb]) -> BigUint {
    BigUint::from_slice(x)
}

pub(crate) fn from_biguint(x: &BigUint) -> Vec<Limb> {
    x.to_u32_digits()
}
