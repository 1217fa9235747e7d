use core::cmp::Ordering;

use num_bigint::BigUint;
use openzeppelin_bignum::{
    arithmetic::{
        add_assign, add_len, cmp, is_normalized, is_power_of_two, new_add,
        new_add_u64, new_and, new_div, new_div_rem, new_mul, new_rem, new_shl,
        new_shr, new_square, new_sub, normalize, set_add, set_div_rem, set_mul,
        set_shl, shl_assign, KARATSUBA_THRESHOLD,
    },
    BigInt, BigNumber, Error, Limb, MutableBigInt,
};
use proptest::prelude::*;

fn limbs(max_len: usize) -> impl Strategy<Value = Vec<Limb>> {
    prop::collection::vec(any::<Limb>(), 0..=max_len)
        .prop_map(|x| normalize(&x).to_vec())
}

fn nonzero_limbs(max_len: usize) -> impl Strategy<Value = Vec<Limb>> {
    limbs(max_len).prop_filter("non-zero", |x| !x.is_empty())
}

fn signed(max_len: usize) -> impl Strategy<Value = BigInt> {
    (any::<bool>(), limbs(max_len))
        .prop_map(|(negative, x)| BigInt::from_le_limbs(negative, &x))
}

fn biguint(x: &[Limb]) -> BigUint {
    BigUint::from_slice(x)
}

fn long_limbs(max_len: usize) -> impl Strategy<Value = Vec<Limb>> {
    prop::collection::vec(any::<Limb>(), KARATSUBA_THRESHOLD..max_len)
}

fn padded(x: &[Limb], extra: usize) -> Vec<Limb> {
    let mut padded = x.to_vec();
    padded.resize(x.len() + extra, 0);
    padded
}

fn trimmed(x: Vec<Limb>) -> Vec<Limb> {
    normalize(&x).to_vec()
}

#[test]
fn carry_into_new_limb() {
    assert_eq!(normalize(&new_add(&[u32::MAX], &[1]).unwrap()), &[0, 1]);
    assert_eq!(normalize(&new_add_u64(&[u32::MAX], 1).unwrap()), &[0, 1]);
}

#[test]
fn two_to_the_64_by_three() {
    let x = [0, 0, 1];
    let (q, r) = new_div_rem(&x, &[3]).unwrap();
    assert_eq!(
        BigInt::from_le_limbs(false, &q),
        BigInt::from(6_148_914_691_236_517_205u64)
    );
    assert_eq!(normalize(&r), &[1]);
}

#[test]
fn shift_into_second_limb() {
    assert_eq!(normalize(&new_shl(&[1], 32).unwrap()), &[0, 1]);
}

#[test]
fn square_of_max_limb() {
    let expected: &[Limb] = &[1, 0xFFFF_FFFE];
    assert_eq!(normalize(&new_square(&[u32::MAX]).unwrap()), expected);
    let product = new_mul(&[u32::MAX], &[u32::MAX]).unwrap();
    assert_eq!(normalize(&product), expected);
}

#[test]
fn powers_of_two() {
    assert!(is_power_of_two(&[8]));
    assert!(!is_power_of_two(&[6]));
    assert!(is_power_of_two(&[0, 0, 1 << 31]));
}

#[test]
fn division_by_zero() {
    assert_eq!(new_div(&[5], &[]), Err(Error::DivisionByZero));
    assert_eq!(new_rem(&[], &[]), Err(Error::DivisionByZero));
    assert_eq!(
        BigInt::from(5u8).checked_div(&BigInt::zero()),
        Err(Error::DivisionByZero)
    );
    let mut acc = MutableBigInt::from(5u64);
    assert_eq!(acc.rem(&BigInt::zero()), Err(Error::DivisionByZero));
}

#[test]
#[should_panic = "division by zero"]
fn operator_division_by_zero_panics() {
    let _ = BigInt::from(1u8) / BigInt::zero();
}

proptest! {
    #[test]
    fn results_are_normalized(
        x in limbs(12),
        y in nonzero_limbs(8),
        k in 0u32..200,
    ) {
        let sum = new_add(&x, &y).unwrap();
        prop_assert!(is_normalized(normalize(&sum)));
        let (q, r) = new_div_rem(&x, &y).unwrap();
        let product = new_mul(&x, &y).unwrap();
        let shifted = new_shr(&x, k).unwrap();
        for z in [sum, q, r, product, shifted] {
            let z = normalize(&z);
            prop_assert!(z.last().map_or(true, |&top| top != 0));
        }
    }

    #[test]
    fn division_identity(x in limbs(16), y in nonzero_limbs(10)) {
        let (q, r) = new_div_rem(&x, &y).unwrap();
        let (q, r) = (normalize(&q), normalize(&r));
        prop_assert_eq!(cmp(r, &y), Ordering::Less);
        let back = new_add(normalize(&new_mul(q, &y).unwrap()), r).unwrap();
        prop_assert_eq!(normalize(&back), x.as_slice());
        prop_assert_eq!(biguint(q), biguint(&x) / biguint(&y));
    }

    #[test]
    fn modulo_is_least_residue(x in signed(8), m in nonzero_limbs(5)) {
        let m = BigInt::from_le_limbs(false, &m);
        let residue = x.modulo(&m).unwrap();
        prop_assert!(!residue.is_negative());
        prop_assert!(residue < m);
        if !x.is_negative() {
            prop_assert_eq!(residue, x.checked_rem(&m).unwrap());
        }
    }

    #[test]
    fn shift_round_trip(x in limbs(10), k in 0u32..500) {
        let shifted = new_shl(&x, k).unwrap();
        let back = new_shr(normalize(&shifted), k).unwrap();
        prop_assert_eq!(normalize(&back), x.as_slice());
    }

    #[test]
    fn add_then_sub(x in limbs(10), y in limbs(10)) {
        let sum = new_add(&x, &y).unwrap();
        let back = new_sub(normalize(&sum), &y).unwrap();
        prop_assert_eq!(normalize(&back), x.as_slice());
    }

    #[test]
    fn compare_is_antisymmetric(x in limbs(6), y in limbs(6)) {
        prop_assert_eq!(cmp(&x, &y), cmp(&y, &x).reverse());
        prop_assert_eq!(cmp(&x, &x), Ordering::Equal);
        prop_assert_eq!(cmp(&x, &y), biguint(&x).cmp(&biguint(&y)));
    }

    #[test]
    fn large_products_agree_with_oracle(
        x in long_limbs(3 * KARATSUBA_THRESHOLD),
        y in long_limbs(2 * KARATSUBA_THRESHOLD),
    ) {
        let (x, y) = (normalize(&x), normalize(&y));
        let product = new_mul(x, y).unwrap();
        prop_assert_eq!(biguint(normalize(&product)), biguint(x) * biguint(y));
        let square = new_square(x).unwrap();
        prop_assert_eq!(biguint(normalize(&square)), biguint(x) * biguint(x));
    }

    #[test]
    fn in_place_forms_agree(x in limbs(8), y in limbs(8), k in 0u32..100) {
        let mut z = vec![0; 24];
        let len = set_add(&mut z, &x, &y).unwrap();
        let mut w = vec![0; 24];
        w[..x.len()].copy_from_slice(&x);
        let w_len = add_assign(&mut w, x.len(), &y).unwrap();
        prop_assert_eq!(&z[..len], &w[..w_len]);

        let len = set_shl(&mut z, &x, k).unwrap();
        w[..x.len()].copy_from_slice(&x);
        let w_len = shl_assign(&mut w, x.len(), k).unwrap();
        prop_assert_eq!(&z[..len], &w[..w_len]);

        let product = new_mul(&x, &y).unwrap();
        let len = set_mul(&mut z, &x, &y).unwrap();
        prop_assert_eq!(&z[..len], normalize(&product));
    }

    #[test]
    fn high_zero_limbs_do_not_change_results(
        x in limbs(8),
        y in nonzero_limbs(6),
        pad in 1usize..6,
        k in 0u32..100,
    ) {
        let (px, py) = (padded(&x, pad), padded(&y, pad));

        let sum = new_add(&px, &py).unwrap();
        let expected_sum = trimmed(new_add(&x, &y).unwrap());
        prop_assert_eq!(trimmed(sum.clone()), expected_sum);
        prop_assert_eq!(trimmed(new_sub(&sum, &py).unwrap()), x.clone());

        let pairs = [
            (new_mul(&px, &py), new_mul(&x, &y)),
            (new_square(&px), new_square(&x)),
            (new_shl(&px, k), new_shl(&x, k)),
            (new_shr(&px, k), new_shr(&x, k)),
            (new_and(&px, &py), new_and(&x, &y)),
        ];
        for (actual, expected) in pairs {
            let (actual, expected) = (actual.unwrap(), expected.unwrap());
            prop_assert_eq!(trimmed(actual), trimmed(expected));
        }

        let (q, r) = new_div_rem(&px, &py).unwrap();
        let (expected_q, expected_r) = new_div_rem(&x, &y).unwrap();
        prop_assert_eq!(trimmed(q), trimmed(expected_q.clone()));
        prop_assert_eq!(trimmed(r), trimmed(expected_r.clone()));

        let (mut q, mut r) = (vec![0; px.len()], vec![0; y.len()]);
        let (q_len, r_len) =
            set_div_rem(&mut q, &mut r, &px, &padded(&y, pad)).unwrap();
        prop_assert_eq!(&q[..q_len], normalize(&expected_q));
        prop_assert_eq!(&r[..r_len], normalize(&expected_r));

        let mut z = vec![0; add_len(&x, &y)];
        let len = set_add(&mut z, &px, &py).unwrap();
        prop_assert_eq!(&z[..len], normalize(&sum));
        let mut w = padded(&px, 8);
        let w_len = add_assign(&mut w, px.len(), &py).unwrap();
        prop_assert_eq!(&w[..w_len], normalize(&sum));

        prop_assert_eq!(
            BigInt::from_le_limbs(true, &px),
            BigInt::from_le_limbs(true, &x)
        );
    }

    #[test]
    fn accumulator_matches_values(
        x in signed(8),
        y in signed(4),
        k in 0u32..64,
    ) {
        let mut acc = MutableBigInt::from(&x);
        acc.mul(&y).unwrap();
        acc.add(&x).unwrap();
        acc.shl(k).unwrap();
        prop_assert_eq!(acc.to_big_int(), ((&x * &y) + &x) << k);
        if !BigNumber::is_zero(&y) {
            let expected = (acc.to_big_int() / &y, acc.to_big_int() % &y);
            let mut rem = MutableBigInt::new();
            acc.div_rem(&y, &mut rem).unwrap();
            prop_assert_eq!((acc.to_big_int(), rem.to_big_int()), expected);
        }
    }
}
