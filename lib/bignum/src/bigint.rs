//! Immutable sign-magnitude integers.

use alloc::{boxed::Box, vec::Vec};
use core::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, LowerHex, Result as FmtResult, UpperHex},
    ops::{
        Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor,
        BitXorAssign, Div, DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign,
        Shl, ShlAssign, Shr, ShrAssign, Sub, SubAssign,
    },
};

use num_traits::{FromPrimitive, ToPrimitive};
use zeroize::Zeroize;

use crate::{
    accumulator::MutableBigInt,
    arithmetic::{
        any_low_bits_set, cmp, new_add, new_add_u64, new_div_rem, new_mul,
        new_shl, new_shr, new_square, new_sub, new_sub_u64, normalized_len,
        Limb, LIMB_BITS, MAX_BIT_LEN, ONE,
    },
    error::{Error, Result},
    logic::{signed_logic, LogicOp},
    meta::Meta,
    number::{cmp_signed, fmt_hex, BigNumber},
};

/// An immutable arbitrary-precision integer.
///
/// The limb array is sized exactly to the normalized magnitude, so a
/// `BigInt` never carries spare capacity. Use
/// [`MutableBigInt`](crate::MutableBigInt) to run long computations without
/// reallocating at every step.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BigInt {
    meta: Meta,
    limbs: Box<[Limb]>,
}

impl BigInt {
    /// The value zero.
    #[must_use]
    pub fn zero() -> Self {
        Self { meta: Meta::ZERO, limbs: Box::new([]) }
    }

    /// The value one.
    #[must_use]
    pub fn one() -> Self {
        Self::from_vec(false, ONE.to_vec())
    }

    /// Takes ownership of `limbs`, dropping its high zero limbs.
    pub(crate) fn from_vec(negative: bool, mut limbs: Vec<Limb>) -> Self {
        let len = normalized_len(&limbs);
        limbs.truncate(len);
        Self { meta: Meta::new(negative, len), limbs: limbs.into_boxed_slice() }
    }

    /// Copies the first `len` limbs of `limbs` into a new value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `len > limbs.len()` or the magnitude
    /// exceeds the supported size.
    pub fn from_limbs(
        negative: bool,
        limbs: &[Limb],
        len: usize,
    ) -> Result<Self> {
        let limbs =
            limbs.get(..len).ok_or(Error::InvalidArgument { what: "len" })?;
        let len = normalized_len(limbs);
        let meta = Meta::try_new(negative, len)?;
        Ok(Self { meta, limbs: limbs[..len].into() })
    }

    /// Copies a little-endian limb sequence into a new value.
    ///
    /// # Panics
    ///
    /// If the magnitude exceeds the supported size.
    #[must_use]
    pub fn from_le_limbs(negative: bool, limbs: &[Limb]) -> Self {
        Self::from_vec(negative, limbs.to_vec())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_u128_signed(negative: bool, value: u128) -> Self {
        let limbs =
            (0..4).map(|i| (value >> (LIMB_BITS * i)) as Limb).collect();
        Self::from_vec(negative, limbs)
    }

    /// Builds the non-negative value `hi * 2^64 + lo`.
    #[must_use]
    pub fn from_u128_parts(hi: u64, lo: u64) -> Self {
        Self::from_u128_signed(false, u128::from(hi) << 64 | u128::from(lo))
    }

    /// Generates a uniformly random non-negative value below `2^bits`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if `bits` exceeds the supported size.
    #[cfg(feature = "rand")]
    pub fn random_bits<R: rand::RngCore + ?Sized>(
        rng: &mut R,
        bits: u32,
    ) -> Result<Self> {
        let len = crate::arithmetic::checked_limbs_for_bits(bits.into())?;
        let mut limbs: Vec<Limb> = (0..len).map(|_| rng.next_u32()).collect();
        let rest = bits % LIMB_BITS;
        if let (Some(top), true) = (limbs.last_mut(), rest != 0) {
            *top &= (1 << rest) - 1;
        }
        Ok(Self::from_vec(false, limbs))
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self { meta: self.meta.abs(), limbs: self.limbs.clone() }
    }

    /// Returns `self + rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the sum exceeds the supported size.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self> {
        add_signed(
            self.is_negative(),
            &self.limbs,
            rhs.is_negative(),
            &rhs.limbs,
        )
    }

    /// Returns `self - rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the difference exceeds the supported
    /// size.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self> {
        add_signed(
            self.is_negative(),
            &self.limbs,
            !rhs.is_negative(),
            &rhs.limbs,
        )
    }

    /// Returns `self * rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the product exceeds the supported size.
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self> {
        let negative = self.is_negative() ^ rhs.is_negative();
        Ok(Self::from_vec(negative, new_mul(&self.limbs, &rhs.limbs)?))
    }

    /// Returns `self * self`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the square exceeds the supported size.
    pub fn square(&self) -> Result<Self> {
        Ok(Self::from_vec(false, new_square(&self.limbs)?))
    }

    /// Truncated division: the quotient rounds toward zero and the
    /// remainder takes the sign of `self`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div_rem(&self, rhs: &Self) -> Result<(Self, Self)> {
        let (q, r) = new_div_rem(&self.limbs, &rhs.limbs)?;
        let negative = self.is_negative();
        Ok((
            Self::from_vec(negative ^ rhs.is_negative(), q),
            Self::from_vec(negative, r),
        ))
    }

    /// Truncated quotient of `self / rhs`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self> {
        self.checked_div_rem(rhs).map(|(q, _)| q)
    }

    /// Truncated remainder of `self / rhs`, with the sign of `self`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `rhs` is zero.
    pub fn checked_rem(&self, rhs: &Self) -> Result<Self> {
        self.checked_div_rem(rhs).map(|(_, r)| r)
    }

    /// Least non-negative residue of `self` modulo `m`, in `[0, m)`.
    ///
    /// # Errors
    ///
    /// [`Error::NegativeModulus`] if `m` is negative,
    /// [`Error::DivisionByZero`] if `m` is zero.
    pub fn modulo(&self, m: &Self) -> Result<Self> {
        if m.is_negative() {
            return Err(Error::NegativeModulus);
        }
        let r = self.checked_rem(m)?;
        if r.is_negative() {
            Ok(Self::from_vec(false, new_sub(&m.limbs, &r.limbs)?))
        } else {
            Ok(r)
        }
    }

    /// Returns `self * 2^n`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the result exceeds the supported size.
    pub fn checked_shl(&self, n: u32) -> Result<Self> {
        Ok(Self::from_vec(self.is_negative(), new_shl(&self.limbs, n)?))
    }

    /// Returns `floor(self / 2^n)`; negative values round toward negative
    /// infinity.
    fn shr_floor(&self, n: u32) -> Result<Self> {
        let q = new_shr(&self.limbs, n)?;
        if self.is_negative() && any_low_bits_set(&self.limbs, n) {
            let q = &q[..normalized_len(&q)];
            return Ok(Self::from_vec(true, new_add_u64(q, 1)?));
        }
        Ok(Self::from_vec(self.is_negative(), q))
    }

    /// Returns `self^exp` by square-and-multiply.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the result exceeds the supported size.
    pub fn checked_pow(&self, exp: u32) -> Result<Self> {
        let bits =
            (u64::from(self.bit_len()) * u64::from(exp)).min(MAX_BIT_LEN);
        let mut acc = MutableBigInt::with_capacity_hint_bits(bits)?;
        acc.set_u64(1)?;
        for i in (0..u32::BITS - exp.leading_zeros()).rev() {
            acc.square()?;
            if exp >> i & 1 == 1 {
                acc.mul(self)?;
            }
        }
        Ok(acc.to_big_int())
    }

    /// Returns `self^exp`.
    ///
    /// # Panics
    ///
    /// If the result exceeds the supported size.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        or_panic(self.checked_pow(exp))
    }

    fn logic(&self, rhs: &Self, op: LogicOp) -> Result<Self> {
        let (negative, limbs) = signed_logic(
            op,
            self.is_negative(),
            &self.limbs,
            rhs.is_negative(),
            &rhs.limbs,
        )?;
        Ok(Self::from_vec(negative, limbs))
    }

    /// Two's-complement complement: `!x == -x - 1`.
    fn complement(&self) -> Result<Self> {
        if self.is_negative() {
            Ok(Self::from_vec(false, new_sub_u64(&self.limbs, 1)?))
        } else {
            Ok(Self::from_vec(true, new_add_u64(&self.limbs, 1)?))
        }
    }
}

fn add_signed(
    x_neg: bool,
    x: &[Limb],
    y_neg: bool,
    y: &[Limb],
) -> Result<BigInt> {
    if x_neg == y_neg {
        return Ok(BigInt::from_vec(x_neg, new_add(x, y)?));
    }
    match cmp(x, y) {
        Ordering::Less => Ok(BigInt::from_vec(y_neg, new_sub(y, x)?)),
        _ => Ok(BigInt::from_vec(x_neg, new_sub(x, y)?)),
    }
}

/// Unwraps the result of an operator that has no error channel.
#[inline]
fn or_panic<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{err}"),
    }
}

impl BigNumber for BigInt {
    #[inline]
    fn meta(&self) -> Meta {
        self.meta
    }

    #[inline]
    fn magnitude(&self) -> &[Limb] {
        &self.limbs
    }
}

impl Default for BigInt {
    fn default() -> Self {
        Self::zero()
    }
}

impl Zeroize for BigInt {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
        self.limbs = Box::new([]);
        self.meta = Meta::ZERO;
    }
}

impl From<&MutableBigInt> for BigInt {
    fn from(value: &MutableBigInt) -> Self {
        value.to_big_int()
    }
}

macro_rules! impl_from_unsigned {
    ($($int:ty),* $(,)?) => {$(
        impl From<$int> for BigInt {
            #[inline]
            fn from(value: $int) -> Self {
                Self::from_u128_signed(false, value.into())
            }
        }
    )*};
}

macro_rules! impl_from_signed {
    ($($int:ty),* $(,)?) => {$(
        impl From<$int> for BigInt {
            #[inline]
            fn from(value: $int) -> Self {
                Self::from_u128_signed(value < 0, value.unsigned_abs().into())
            }
        }
    )*};
}

impl_from_unsigned!(u8, u16, u32, u64, u128);
impl_from_signed!(i8, i16, i32, i64, i128);

impl num_traits::Zero for BigInt {
    fn zero() -> Self {
        BigInt::zero()
    }

    fn is_zero(&self) -> bool {
        self.meta.is_zero()
    }
}

impl num_traits::One for BigInt {
    fn one() -> Self {
        BigInt::one()
    }
}

impl FromPrimitive for BigInt {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::from(n))
    }

    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::from(n))
    }

    fn from_i128(n: i128) -> Option<Self> {
        Some(Self::from(n))
    }

    fn from_u128(n: u128) -> Option<Self> {
        Some(Self::from(n))
    }
}

impl BigInt {
    fn magnitude_u128(&self) -> Option<u128> {
        if self.limbs.len() > 4 {
            return None;
        }
        Some(
            self.limbs
                .iter()
                .rev()
                .fold(0, |acc, &limb| acc << LIMB_BITS | u128::from(limb)),
        )
    }
}

impl ToPrimitive for BigInt {
    fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|value| i64::try_from(value).ok())
    }

    fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|value| u64::try_from(value).ok())
    }

    #[allow(clippy::cast_possible_wrap)]
    fn to_i128(&self) -> Option<i128> {
        let magnitude = self.magnitude_u128()?;
        if self.is_negative() {
            // -2^127 has no positive counterpart.
            (magnitude <= 1 << 127).then(|| (magnitude as i128).wrapping_neg())
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    fn to_u128(&self) -> Option<u128> {
        if self.is_negative() {
            return None;
        }
        self.magnitude_u128()
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_signed(self, other)
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl UpperHex for BigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_hex(self, f, true)
    }
}

impl LowerHex for BigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_hex(self, f, false)
    }
}

impl Display for BigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // Use upper hex by default.
        fmt_hex(self, f, true)
    }
}

impl Debug for BigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{self}")
    }
}

// ----------- Operators -----------

/// Implements an operator for `&BigInt op &BigInt` from a checked method,
/// then forwards the owned and assigning forms to it.
macro_rules! impl_binop {
    (
        $trait:ident,
        $method:ident,
        $assign_trait:ident,
        $assign_method:ident,
        $checked:expr
    ) => {
        impl<'a> $trait<&'a BigInt> for &BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: &'a BigInt) -> BigInt {
                or_panic($checked(self, rhs))
            }
        }

        impl $trait<BigInt> for BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: BigInt) -> BigInt {
                <&BigInt as $trait<&BigInt>>::$method(&self, &rhs)
            }
        }

        impl<'a> $trait<&'a BigInt> for BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: &'a BigInt) -> BigInt {
                <&BigInt as $trait<&BigInt>>::$method(&self, rhs)
            }
        }

        impl $trait<BigInt> for &BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, rhs: BigInt) -> BigInt {
                <&BigInt as $trait<&BigInt>>::$method(self, &rhs)
            }
        }

        impl $assign_trait<BigInt> for BigInt {
            #[inline]
            fn $assign_method(&mut self, rhs: BigInt) {
                *self = <&BigInt as $trait<&BigInt>>::$method(self, &rhs);
            }
        }

        impl<'a> $assign_trait<&'a BigInt> for BigInt {
            #[inline]
            fn $assign_method(&mut self, rhs: &'a BigInt) {
                *self = <&BigInt as $trait<&BigInt>>::$method(self, rhs);
            }
        }
    };
}

impl_binop!(Add, add, AddAssign, add_assign, BigInt::checked_add);
impl_binop!(Sub, sub, SubAssign, sub_assign, BigInt::checked_sub);
impl_binop!(Mul, mul, MulAssign, mul_assign, BigInt::checked_mul);
// Division and remainder by zero panic, as they do for primitive integers.
impl_binop!(Div, div, DivAssign, div_assign, BigInt::checked_div);
impl_binop!(Rem, rem, RemAssign, rem_assign, BigInt::checked_rem);
impl_binop!(BitAnd, bitand, BitAndAssign, bitand_assign, |x: &BigInt, y| x
    .logic(y, LogicOp::And));
impl_binop!(BitOr, bitor, BitOrAssign, bitor_assign, |x: &BigInt, y| x
    .logic(y, LogicOp::Or));
impl_binop!(BitXor, bitxor, BitXorAssign, bitxor_assign, |x: &BigInt, y| x
    .logic(y, LogicOp::Xor));

macro_rules! impl_shift {
    (
        $trait:ident,
        $method:ident,
        $assign_trait:ident,
        $assign_method:ident,
        $checked:expr
    ) => {
        impl $trait<u32> for &BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, n: u32) -> BigInt {
                or_panic($checked(self, n))
            }
        }

        impl $trait<u32> for BigInt {
            type Output = BigInt;

            #[inline]
            fn $method(self, n: u32) -> BigInt {
                <&BigInt as $trait<u32>>::$method(&self, n)
            }
        }

        impl $assign_trait<u32> for BigInt {
            #[inline]
            fn $assign_method(&mut self, n: u32) {
                *self = <&BigInt as $trait<u32>>::$method(self, n);
            }
        }
    };
}

impl_shift!(Shl, shl, ShlAssign, shl_assign, BigInt::checked_shl);
impl_shift!(Shr, shr, ShrAssign, shr_assign, BigInt::shr_floor);

impl Neg for BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(mut self) -> BigInt {
        self.meta = self.meta.negate();
        self
    }
}

impl Neg for &BigInt {
    type Output = BigInt;

    #[inline]
    fn neg(self) -> BigInt {
        -self.clone()
    }
}

impl Not for &BigInt {
    type Output = BigInt;

    #[inline]
    fn not(self) -> BigInt {
        or_panic(self.complement())
    }
}

impl Not for BigInt {
    type Output = BigInt;

    #[inline]
    fn not(self) -> BigInt {
        !&self
    }
}

#[cfg(feature = "num-bigint")]
impl From<&BigInt> for num_bigint::BigInt {
    fn from(value: &BigInt) -> Self {
        let sign = match value.meta.signum() {
            -1 => num_bigint::Sign::Minus,
            0 => num_bigint::Sign::NoSign,
            _ => num_bigint::Sign::Plus,
        };
        num_bigint::BigInt::from_biguint(
            sign,
            num_bigint::BigUint::new(value.limbs.to_vec()),
        )
    }
}

#[cfg(feature = "num-bigint")]
impl From<&num_bigint::BigInt> for BigInt {
    fn from(value: &num_bigint::BigInt) -> Self {
        let (sign, digits) = value.to_u32_digits();
        BigInt::from_vec(sign == num_bigint::Sign::Minus, digits)
    }
}
