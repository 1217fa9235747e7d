//! A mutable accumulator that reuses its limb storage across operations.
//!
//! [`MutableBigInt`] keeps an over-allocated active limb array plus two
//! scratch arrays. Operations that can run in place do so in the active
//! array, growing it through its [`CapacityPlanner`] when the result would
//! not fit. Multiplication, squaring and multi-limb division compute into
//! the first scratch array and then swap it with the active one. That array
//! is sized by the same planner, so no operation allocates once the buffers
//! have reached their working size.

use alloc::vec;
use alloc::vec::Vec;
use core::{
    cmp::Ordering,
    fmt::{Display, Formatter, LowerHex, Result as FmtResult, UpperHex},
    mem,
};

use educe::Educe;
use zeroize::Zeroize;

use crate::{
    arithmetic::{
        add_assign, add_len, add_u64_assign, add_u64_len, alloc_len,
        and_assign, any_low_bits_set, cmp, cmp_u64, div_limb_assign,
        div_path, div_u64_assign, knuth_div_rem, knuth_div_rem_2,
        low_bits_assign, mul_len, mul_u64_assign, mul_u64_len, or_assign,
        or_len, rem_limb, rsub_assign, scalar_limbs, set_mul, set_square,
        shl_assign, shl_len, shr_assign, square_len, sub_assign,
        sub_u64_assign, u64_at_bit, xor_assign, DivPath, Limb, LIMB_BITS,
        MAX_LIMBS,
    },
    bigint::BigInt,
    capacity::{CapacityPlanner, ScratchBuffer, INLINE_LIMBS},
    error::{Error, Result},
    logic::{signed_logic, LogicOp},
    meta::Meta,
    number::{fmt_hex, BigNumber},
};

/// A mutable arbitrary-precision integer.
///
/// Capacity is managed by a [`CapacityPlanner`]: give the accumulator a hint
/// with [`MutableBigInt::with_capacity_hint_bits`] when the working size of
/// a computation is known, and its active array grows at most once.
///
/// ```
/// use openzeppelin_bignum::{BigInt, MutableBigInt};
///
/// let m = BigInt::from(1_000_003u32);
/// let mut acc = MutableBigInt::from(&BigInt::from(7u8));
/// acc.shl(100).unwrap();
/// acc.sub_u64(1).unwrap();
/// acc.rem(&m).unwrap();
///
/// let expected = ((BigInt::from(7u8) << 100) - BigInt::from(1u8)) % m;
/// assert_eq!(acc.to_big_int(), expected);
/// ```
#[derive(Educe, Clone)]
#[educe(Debug)]
pub struct MutableBigInt {
    meta: Meta,
    limbs: Vec<Limb>,
    #[educe(Debug(ignore))]
    scratch_a: ScratchBuffer,
    #[educe(Debug(ignore))]
    scratch_b: ScratchBuffer,
    planner: CapacityPlanner,
}

impl MutableBigInt {
    /// A zero accumulator with [`INLINE_LIMBS`] limbs of capacity and no
    /// hint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: Meta::ZERO,
            limbs: vec![0; INLINE_LIMBS],
            scratch_a: ScratchBuffer::default(),
            scratch_b: ScratchBuffer::default(),
            planner: CapacityPlanner::new(),
        }
    }

    /// A zero accumulator expecting values of up to `bits` bits.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if `bits` exceeds the supported bit
    /// length.
    pub fn with_capacity_hint_bits(bits: u64) -> Result<Self> {
        let mut acc = Self::new();
        acc.set_capacity_hint_bits(bits)?;
        Ok(acc)
    }

    /// Records the expected working size, in bits, for future growth.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if `bits` exceeds the supported bit
    /// length.
    pub fn set_capacity_hint_bits(&mut self, bits: u64) -> Result<()> {
        self.planner.set_hint_bits(bits)?;
        tracing::debug!(bits, limbs = self.planner.hint(), "capacity hint");
        Ok(())
    }

    /// Number of limbs the active array can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.limbs.len()
    }

    /// The capacity hint in bits, rounded up to whole limbs.
    #[must_use]
    pub fn capacity_hint_bits(&self) -> u64 {
        self.planner.hint_bits()
    }

    fn len(&self) -> usize {
        self.meta.len()
    }

    fn check_limbs(required: usize) -> Result<()> {
        if required > MAX_LIMBS {
            return Err(Error::InvalidAllocation {
                bits: required as u64 * u64::from(LIMB_BITS),
            });
        }
        Ok(())
    }

    /// Makes room for `required` limbs. The current value is lost when the
    /// array is replaced.
    fn ensure_capacity(&mut self, required: usize) -> Result<()> {
        if required <= self.limbs.len() {
            return Ok(());
        }
        Self::check_limbs(required)?;
        let capacity = self.planner.next_capacity(required);
        tracing::trace!(required, capacity, policy = "discard", "grow");
        self.limbs = vec![0; capacity];
        Ok(())
    }

    /// Makes room for `required` limbs, keeping the current value.
    fn ensure_capacity_preserving(&mut self, required: usize) -> Result<()> {
        if required <= self.limbs.len() {
            return Ok(());
        }
        Self::check_limbs(required)?;
        let capacity = self.planner.next_capacity(required);
        tracing::trace!(required, capacity, policy = "copy", "grow");
        let len = self.len();
        let mut limbs = vec![0; capacity];
        limbs[..len].copy_from_slice(&self.limbs[..len]);
        self.limbs = limbs;
        Ok(())
    }

    /// Capacity the first scratch array needs before a result of `required`
    /// limbs is computed into it and swapped in.
    fn swap_capacity(&mut self, required: usize) -> Result<usize> {
        Self::check_limbs(required)?;
        let active = self.limbs.len();
        if required <= active {
            return Ok(active);
        }
        let capacity = self.planner.next_capacity(required);
        tracing::trace!(required, capacity, policy = "swap", "grow");
        Ok(capacity)
    }

    /// Makes the first scratch array active. The result must already sit at
    /// its front.
    fn swap_scratch(&mut self, meta: Meta) {
        mem::swap(&mut self.limbs, self.scratch_a.as_mut_vec());
        self.meta = meta;
    }

    /// Makes the first scratch array active and moves the result, which
    /// starts at limb `offset`, to its front.
    fn swap_scratch_forward(&mut self, offset: usize, meta: Meta) {
        mem::swap(&mut self.limbs, self.scratch_a.as_mut_vec());
        self.limbs.copy_within(offset..offset + meta.len(), 0);
        self.meta = meta;
    }

    /// Replaces the value with the normalized magnitude `x`.
    fn set_limbs(&mut self, negative: bool, x: &[Limb]) -> Result<()> {
        self.ensure_capacity(x.len())?;
        self.limbs[..x.len()].copy_from_slice(x);
        self.meta = Meta::new(negative, x.len());
        Ok(())
    }

    fn set_scalar(&mut self, negative: bool, value: u64) -> Result<()> {
        let (v, len) = scalar_limbs(value);
        self.set_limbs(negative, &v[..len])
    }

    fn from_scalar(negative: bool, value: u64) -> Self {
        let mut acc = Self::new();
        let (v, len) = scalar_limbs(value);
        acc.limbs[..2].copy_from_slice(&v);
        acc.meta = Meta::new(negative, len);
        acc
    }

    /// Copies `value` into the accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the active array cannot grow to
    /// hold `value`.
    pub fn set<N: BigNumber + ?Sized>(&mut self, value: &N) -> Result<()> {
        self.set_limbs(value.is_negative(), value.magnitude())
    }

    /// Sets the accumulator to `value`.
    ///
    /// # Errors
    ///
    /// Never in practice: a scalar always fits the inline capacity.
    pub fn set_u64(&mut self, value: u64) -> Result<()> {
        self.set_scalar(false, value)
    }

    /// Sets the accumulator to `value`.
    ///
    /// # Errors
    ///
    /// Never in practice: a scalar always fits the inline capacity.
    pub fn set_i64(&mut self, value: i64) -> Result<()> {
        self.set_scalar(value < 0, value.unsigned_abs())
    }

    /// Sets the accumulator to zero, keeping its storage.
    pub fn set_zero(&mut self) {
        self.meta = Meta::ZERO;
    }

    fn add_signed(&mut self, y_neg: bool, y: &[Limb]) -> Result<()> {
        let len = self.len();
        let x_neg = self.meta.is_negative();
        if x_neg == y_neg {
            self.ensure_capacity_preserving(add_len(&self.limbs[..len], y))?;
            let len = add_assign(&mut self.limbs, len, y)?;
            self.meta = Meta::new(x_neg, len);
            return Ok(());
        }

        if cmp(&self.limbs[..len], y) == Ordering::Less {
            self.ensure_capacity_preserving(y.len())?;
            let len = rsub_assign(&mut self.limbs, len, y)?;
            self.meta = Meta::new(y_neg, len);
        } else {
            let len = sub_assign(&mut self.limbs, len, y)?;
            self.meta = Meta::new(x_neg, len);
        }
        Ok(())
    }

    /// Adds `y` to the accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the sum exceeds the supported size.
    pub fn add<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        self.add_signed(y.is_negative(), y.magnitude())
    }

    /// Subtracts `y` from the accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the difference exceeds the supported
    /// size.
    pub fn sub<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        self.add_signed(!y.is_negative(), y.magnitude())
    }

    fn add_scalar(&mut self, value_neg: bool, value: u64) -> Result<()> {
        let len = self.len();
        let x_neg = self.meta.is_negative();
        if len == 0 || x_neg == value_neg {
            let required = add_u64_len(&self.limbs[..len], value);
            self.ensure_capacity_preserving(required)?;
            let negative = if len == 0 { value_neg } else { x_neg };
            let len = add_u64_assign(&mut self.limbs, len, value)?;
            self.meta = Meta::new(negative, len);
        } else if cmp_u64(&self.limbs[..len], value) == Ordering::Less {
            // |x| < value, so |x| fits in 64 bits.
            let x = u64_at_bit(&self.limbs[..len], 0);
            self.set_scalar(value_neg, value - x)?;
        } else {
            let len = sub_u64_assign(&mut self.limbs, len, value)?;
            self.meta = Meta::new(x_neg, len);
        }
        Ok(())
    }

    /// Adds `value` to the accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the sum exceeds the supported size.
    pub fn add_u64(&mut self, value: u64) -> Result<()> {
        self.add_scalar(false, value)
    }

    /// Subtracts `value` from the accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the difference exceeds the supported
    /// size.
    pub fn sub_u64(&mut self, value: u64) -> Result<()> {
        self.add_scalar(true, value)
    }

    /// Multiplies the accumulator by `y`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the product exceeds the supported size.
    pub fn mul<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        let len = self.len();
        let y_mag = y.magnitude();
        let required = mul_len(&self.limbs[..len], y_mag);
        if required == 0 {
            self.set_zero();
            return Ok(());
        }

        let capacity = self.swap_capacity(required)?;
        let z = self.scratch_a.take_with_capacity(required, capacity);
        let z_len = set_mul(z, &self.limbs[..len], y_mag)?;
        let meta = Meta::new(self.meta.is_negative() ^ y.is_negative(), z_len);
        self.swap_scratch(meta);
        Ok(())
    }

    /// Squares the accumulator.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the square exceeds the supported size.
    pub fn square(&mut self) -> Result<()> {
        let len = self.len();
        let required = square_len(&self.limbs[..len]);
        if required == 0 {
            return Ok(());
        }

        let capacity = self.swap_capacity(required)?;
        let z = self.scratch_a.take_with_capacity(required, capacity);
        let z_len = set_square(z, &self.limbs[..len])?;
        self.swap_scratch(Meta::new(false, z_len));
        Ok(())
    }

    /// Multiplies the accumulator by `value` in place.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the product exceeds the supported size.
    pub fn mul_u64(&mut self, value: u64) -> Result<()> {
        let len = self.len();
        let required = mul_u64_len(&self.limbs[..len], value);
        self.ensure_capacity_preserving(required)?;
        let len = mul_u64_assign(&mut self.limbs, len, value)?;
        self.meta = self.meta.with_len(len);
        Ok(())
    }

    /// Multiplies the accumulator by `2^n`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the result exceeds the supported size.
    pub fn shl(&mut self, n: u32) -> Result<()> {
        let len = self.len();
        self.ensure_capacity_preserving(shl_len(&self.limbs[..len], n))?;
        let len = shl_assign(&mut self.limbs, len, n)?;
        self.meta = self.meta.with_len(len);
        Ok(())
    }

    /// Divides the accumulator by `2^n`, rounding toward negative infinity.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if rounding a negative value needs a
    /// limb the active array cannot grow to.
    pub fn shr(&mut self, n: u32) -> Result<()> {
        let len = self.len();
        let negative = self.meta.is_negative();
        let round_down = negative && any_low_bits_set(&self.limbs[..len], n);
        let len = shr_assign(&mut self.limbs, len, n)?;
        self.meta = Meta::new(negative, len);
        if round_down {
            self.add_scalar(true, 1)?;
        }
        Ok(())
    }

    /// Sets bit `i` of the magnitude.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the bit lies beyond the supported
    /// size.
    pub fn set_bit(&mut self, i: u32) -> Result<()> {
        let limb = (i / LIMB_BITS) as usize;
        let len = self.len();
        if limb >= len {
            self.ensure_capacity_preserving(limb + 1)?;
            self.limbs[len..=limb].fill(0);
        }
        self.limbs[limb] |= 1 << (i % LIMB_BITS);
        self.meta = Meta::new(self.meta.is_negative(), len.max(limb + 1));
        Ok(())
    }

    /// Divides the magnitude by `y`, keeping either the quotient or the
    /// remainder, and optionally writes the signed remainder into `rem`.
    ///
    /// The quotient carries the sign `q_neg`; the remainder the sign of the
    /// dividend.
    fn divide(
        &mut self,
        y: &[Limb],
        q_neg: bool,
        rem: Option<&mut MutableBigInt>,
        keep_quotient: bool,
    ) -> Result<()> {
        let len = self.len();
        let x_neg = self.meta.is_negative();
        let path = div_path(&self.limbs[..len], y)?;

        match path {
            DivPath::Limb(d) if keep_quotient => {
                let (q_len, r) = div_limb_assign(&mut self.limbs, len, d)?;
                self.meta = Meta::new(q_neg, q_len);
                if let Some(rem) = rem {
                    rem.set_scalar(x_neg, r.into())?;
                }
            }
            DivPath::Limb(d) => {
                let r = rem_limb(&self.limbs[..len], d)?;
                self.set_scalar(x_neg, r.into())?;
            }
            DivPath::Trivial(false) => {
                if let Some(rem) = rem {
                    rem.set_limbs(x_neg, &self.limbs[..len])?;
                }
                if keep_quotient {
                    self.set_zero();
                }
            }
            DivPath::Trivial(true) => {
                if let Some(rem) = rem {
                    rem.set_limbs(x_neg, &self.limbs[..len])?;
                    let r_len = sub_assign(&mut rem.limbs, len, y)?;
                    rem.meta = Meta::new(x_neg, r_len);
                }
                if keep_quotient {
                    self.set_scalar(q_neg, 1)?;
                } else {
                    let r_len = sub_assign(&mut self.limbs, len, y)?;
                    self.meta = Meta::new(x_neg, r_len);
                }
            }
            DivPath::PowerOfTwo(k) => {
                if let Some(rem) = rem {
                    rem.set_limbs(x_neg, &self.limbs[..len])?;
                    let r_len = low_bits_assign(&mut rem.limbs, len, k)?;
                    rem.meta = Meta::new(x_neg, r_len);
                }
                if keep_quotient {
                    let q_len = shr_assign(&mut self.limbs, len, k)?;
                    self.meta = Meta::new(q_neg, q_len);
                } else {
                    let r_len = low_bits_assign(&mut self.limbs, len, k)?;
                    self.meta = Meta::new(x_neg, r_len);
                }
            }
            DivPath::TwoLimbs | DivPath::General => {
                let n = y.len();
                let capacity = self.swap_capacity(len + 1)?;
                let u = self.scratch_a.take_with_capacity(len + 1, capacity);
                let x = &self.limbs[..len];
                let (q_len, r_len) = if path == DivPath::TwoLimbs {
                    knuth_div_rem_2(u, x, y)
                } else {
                    let v = self.scratch_b.take(n)?;
                    knuth_div_rem(u, v, x, y)
                };
                if let Some(rem) = rem {
                    rem.set_limbs(x_neg, &u[..r_len])?;
                }
                if keep_quotient {
                    self.swap_scratch_forward(n, Meta::new(q_neg, q_len));
                } else {
                    self.swap_scratch(Meta::new(x_neg, r_len));
                }
            }
        }
        Ok(())
    }

    /// Replaces the accumulator with the truncated quotient `self / y`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `y` is zero.
    pub fn div<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        let q_neg = self.meta.is_negative() ^ y.is_negative();
        self.divide(y.magnitude(), q_neg, None, true)
    }

    /// Replaces the accumulator with the truncated remainder `self % y`,
    /// which takes the sign of `self`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `y` is zero.
    pub fn rem<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        self.divide(y.magnitude(), false, None, false)
    }

    /// Replaces the accumulator with the truncated quotient `self / y` and
    /// writes the remainder into `rem`.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `y` is zero.
    pub fn div_rem<N: BigNumber + ?Sized>(
        &mut self,
        y: &N,
        rem: &mut MutableBigInt,
    ) -> Result<()> {
        let q_neg = self.meta.is_negative() ^ y.is_negative();
        self.divide(y.magnitude(), q_neg, Some(rem), true)
    }

    /// Replaces the accumulator with its least non-negative residue modulo
    /// `m`, in `[0, m)`.
    ///
    /// # Errors
    ///
    /// [`Error::NegativeModulus`] if `m` is negative,
    /// [`Error::DivisionByZero`] if `m` is zero.
    pub fn modulo<N: BigNumber + ?Sized>(&mut self, m: &N) -> Result<()> {
        if m.is_negative() {
            return Err(Error::NegativeModulus);
        }
        self.rem(m)?;
        if self.meta.is_negative() {
            self.add(m)?;
        }
        Ok(())
    }

    /// Replaces the accumulator with the truncated quotient `self / value`
    /// and returns the absolute value of the remainder.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] if `value` is zero.
    pub fn div_rem_u64(&mut self, value: u64) -> Result<u64> {
        let len = self.len();
        let (q_len, rem) = div_u64_assign(&mut self.limbs, len, value)?;
        self.meta = self.meta.with_len(q_len);
        Ok(rem)
    }

    fn logic<N: BigNumber + ?Sized>(
        &mut self,
        y: &N,
        op: LogicOp,
    ) -> Result<()> {
        let len = self.len();
        let (negative, z) = signed_logic(
            op,
            self.meta.is_negative(),
            &self.limbs[..len],
            y.is_negative(),
            y.magnitude(),
        )?;
        self.set_limbs(negative, &z)
    }

    /// Two's-complement bitwise and with `y`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the result exceeds the supported size.
    pub fn and<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        if self.meta.is_negative() || y.is_negative() {
            return self.logic(y, LogicOp::And);
        }
        let len = and_assign(&mut self.limbs, self.meta.len(), y.magnitude())?;
        self.meta = Meta::new(false, len);
        Ok(())
    }

    /// Two's-complement bitwise or with `y`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the result exceeds the supported size.
    pub fn or<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        if self.meta.is_negative() || y.is_negative() {
            return self.logic(y, LogicOp::Or);
        }
        let len = self.len();
        let required = or_len(&self.limbs[..len], y.magnitude());
        self.ensure_capacity_preserving(required)?;
        let len = or_assign(&mut self.limbs, len, y.magnitude())?;
        self.meta = Meta::new(false, len);
        Ok(())
    }

    /// Two's-complement bitwise exclusive or with `y`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if the result exceeds the supported size.
    pub fn xor<N: BigNumber + ?Sized>(&mut self, y: &N) -> Result<()> {
        if self.meta.is_negative() || y.is_negative() {
            return self.logic(y, LogicOp::Xor);
        }
        let len = self.len();
        let required = or_len(&self.limbs[..len], y.magnitude());
        self.ensure_capacity_preserving(required)?;
        let len = xor_assign(&mut self.limbs, len, y.magnitude())?;
        self.meta = Meta::new(false, len);
        Ok(())
    }

    /// Flips the sign. Zero stays non-negative.
    pub fn negate(&mut self) {
        self.meta = self.meta.negate();
    }

    /// Clears the sign.
    pub fn abs(&mut self) {
        self.meta = self.meta.abs();
    }

    /// Copies the current value into an exactly-sized [`BigInt`].
    #[must_use]
    pub fn to_big_int(&self) -> BigInt {
        BigInt::from_vec(self.meta.is_negative(), self.magnitude().to_vec())
    }
}

impl BigNumber for MutableBigInt {
    #[inline]
    fn meta(&self) -> Meta {
        self.meta
    }

    #[inline]
    fn magnitude(&self) -> &[Limb] {
        &self.limbs[..self.meta.len()]
    }
}

impl Default for MutableBigInt {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MutableBigInt {
    fn eq(&self, other: &Self) -> bool {
        self.meta == other.meta && self.magnitude() == other.magnitude()
    }
}

impl Eq for MutableBigInt {}

impl Zeroize for MutableBigInt {
    fn zeroize(&mut self) {
        self.limbs.as_mut_slice().zeroize();
        self.scratch_a.zeroize();
        self.scratch_b.zeroize();
        self.meta = Meta::ZERO;
    }
}

impl From<&BigInt> for MutableBigInt {
    fn from(value: &BigInt) -> Self {
        let x = value.magnitude();
        let mut limbs = vec![0; alloc_len(x.len()).max(INLINE_LIMBS)];
        limbs[..x.len()].copy_from_slice(x);
        Self { meta: value.meta(), limbs, ..Self::new() }
    }
}

impl From<u64> for MutableBigInt {
    fn from(value: u64) -> Self {
        Self::from_scalar(false, value)
    }
}

impl From<i64> for MutableBigInt {
    fn from(value: i64) -> Self {
        Self::from_scalar(value < 0, value.unsigned_abs())
    }
}

impl UpperHex for MutableBigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_hex(self, f, true)
    }
}

impl LowerHex for MutableBigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_hex(self, f, false)
    }
}

impl Display for MutableBigInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        fmt_hex(self, f, true)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        arithmetic::{KARATSUBA_THRESHOLD, MAX_BIT_LEN},
        test_helpers::{limbs, limbs_in},
    };

    fn signed(max_len: usize) -> impl Strategy<Value = BigInt> {
        (any::<bool>(), limbs(max_len))
            .prop_map(|(negative, x)| BigInt::from_le_limbs(negative, &x))
    }

    fn nonzero(max_len: usize) -> impl Strategy<Value = BigInt> {
        (any::<bool>(), limbs_in(1, max_len))
            .prop_map(|(negative, x)| BigInt::from_le_limbs(negative, &x))
    }

    #[test]
    fn starts_inline() {
        let acc = MutableBigInt::new();
        assert_eq!(acc.capacity(), INLINE_LIMBS);
        assert!(BigNumber::is_zero(&acc));
        assert_eq!(acc.capacity_hint_bits(), 0);
    }

    #[test]
    fn first_growth_is_exact_then_adds_half() {
        let mut acc = MutableBigInt::from(1u64);
        acc.shl(32 * 7).unwrap();
        assert_eq!(acc.capacity(), 8);
        acc.shl(32).unwrap();
        assert_eq!(acc.capacity(), 16);
        assert_eq!(acc.bit_len(), 32 * 8 + 1);
    }

    #[test]
    fn grows_exactly_once_under_a_hint() {
        let mut acc = MutableBigInt::with_capacity_hint_bits(1024).unwrap();
        acc.set_u64(1).unwrap();
        let mut capacities = Vec::new();
        while acc.bit_len() < 1000 {
            acc.mul_u64(3).unwrap();
            capacities.push(acc.capacity());
        }
        capacities.dedup();
        assert_eq!(capacities, [INLINE_LIMBS, 32]);
    }

    #[test]
    fn swapped_results_honor_the_hint() {
        let mut acc = MutableBigInt::with_capacity_hint_bits(4096).unwrap();
        acc.set_u64(3).unwrap();
        let mut capacities = Vec::new();
        while acc.bit_len() < 2000 {
            acc.square().unwrap();
            capacities.push(acc.capacity());
        }
        let divisor = BigInt::from_le_limbs(false, &[1, 2, 3]);
        acc.mul(&divisor).unwrap();
        capacities.push(acc.capacity());
        acc.div(&divisor).unwrap();
        capacities.push(acc.capacity());
        capacities.dedup();
        assert_eq!(capacities, [INLINE_LIMBS, 128]);
    }

    #[test]
    fn hint_is_bounded() {
        assert_eq!(
            MutableBigInt::with_capacity_hint_bits(MAX_BIT_LEN + 1)
                .unwrap_err(),
            Error::InvalidAllocation { bits: MAX_BIT_LEN + 1 }
        );
    }

    #[test]
    fn set_bit_extends_with_zeros() {
        let mut acc = MutableBigInt::from(-1i64);
        acc.set_bit(100).unwrap();
        assert_eq!(acc.magnitude(), &[1, 0, 0, 1 << 4]);
        assert!(acc.is_negative());
        acc.set_bit(1).unwrap();
        assert_eq!(acc.magnitude(), &[3, 0, 0, 1 << 4]);
    }

    #[test]
    fn scalar_add_crosses_zero() {
        let mut acc = MutableBigInt::from(5i64);
        acc.sub_u64(7).unwrap();
        assert_eq!(acc.to_big_int(), BigInt::from(-2i32));
        acc.add_u64(2).unwrap();
        assert!(BigNumber::is_zero(&acc));
        assert!(!acc.is_negative());
        acc.sub_u64(u64::MAX).unwrap();
        acc.sub_u64(1).unwrap();
        assert_eq!(acc.to_big_int(), -(BigInt::from(1u8) << 64));
    }

    #[test]
    fn division_by_zero_leaves_the_value() {
        let mut acc = MutableBigInt::from(9u64);
        assert_eq!(acc.div(&BigInt::zero()), Err(Error::DivisionByZero));
        assert_eq!(acc.div_rem_u64(0), Err(Error::DivisionByZero));
        assert_eq!(acc.to_big_int(), BigInt::from(9u8));
        assert_eq!(
            acc.modulo(&BigInt::from(-2i8)),
            Err(Error::NegativeModulus)
        );
    }

    #[test]
    fn two_to_the_64_by_three() {
        let mut acc = MutableBigInt::from(1u64);
        acc.shl(64).unwrap();
        assert_eq!(acc.div_rem_u64(3).unwrap(), 1);
        assert_eq!(
            acc.to_big_int(),
            BigInt::from(6_148_914_691_236_517_205u64)
        );
    }

    #[test]
    fn zeroize_keeps_capacity() {
        let mut acc = MutableBigInt::from(&(BigInt::from(3u8) << 300));
        acc.square().unwrap();
        let capacity = acc.capacity();
        acc.zeroize();
        assert!(BigNumber::is_zero(&acc));
        assert_eq!(acc.capacity(), capacity);
        assert!(acc.limbs.iter().all(|&limb| limb == 0));
    }

    #[test]
    fn debug_omits_scratch() {
        let acc = MutableBigInt::from(5u64);
        let debug = format!("{acc:?}");
        assert!(debug.starts_with("MutableBigInt"));
        assert!(!debug.contains("scratch"));
        assert_eq!(format!("{acc}"), "5");
        assert_eq!(format!("{:#x}", MutableBigInt::from(-255i64)), "-0xff");
    }

    #[test]
    fn check_against_immutable() {
        proptest!(|(x in signed(6), y in signed(6), n in 0u32..100, v: u64)| {
            let mut acc = MutableBigInt::from(&x);
            acc.add(&y).unwrap();
            prop_assert_eq!(acc.to_big_int(), &x + &y);
            acc.sub(&y).unwrap();
            prop_assert_eq!(acc.to_big_int(), x.clone());

            acc.mul(&y).unwrap();
            prop_assert_eq!(acc.to_big_int(), &x * &y);
            acc.set(&x).unwrap();
            acc.square().unwrap();
            prop_assert_eq!(acc.to_big_int(), &x * &x);

            acc.set(&x).unwrap();
            acc.mul_u64(v).unwrap();
            prop_assert_eq!(acc.to_big_int(), &x * BigInt::from(v));
            acc.add_u64(v).unwrap();
            acc.sub_u64(v).unwrap();
            prop_assert_eq!(acc.to_big_int(), &x * BigInt::from(v));

            acc.set(&x).unwrap();
            acc.shl(n).unwrap();
            prop_assert_eq!(acc.to_big_int(), &x << n);
            acc.shr(n + 3).unwrap();
            prop_assert_eq!(acc.to_big_int(), &x >> 3);

            for (op, expected) in [
                (LogicOp::And, &x & &y),
                (LogicOp::Or, &x | &y),
                (LogicOp::Xor, &x ^ &y),
            ] {
                acc.set(&x).unwrap();
                match op {
                    LogicOp::And => acc.and(&y).unwrap(),
                    LogicOp::Or => acc.or(&y).unwrap(),
                    LogicOp::Xor => acc.xor(&y).unwrap(),
                }
                prop_assert_eq!(acc.to_big_int(), expected);
            }
        });
    }

    #[test]
    fn check_division_against_immutable() {
        proptest!(|(x in signed(12), y in nonzero(6))| {
            let (q, r) = x.checked_div_rem(&y).unwrap();

            let mut acc = MutableBigInt::from(&x);
            acc.div(&y).unwrap();
            prop_assert_eq!(acc.to_big_int(), q.clone());

            let mut acc = MutableBigInt::from(&x);
            acc.rem(&y).unwrap();
            prop_assert_eq!(acc.to_big_int(), r.clone());

            let mut acc = MutableBigInt::from(&x);
            let mut rem = MutableBigInt::new();
            acc.div_rem(&y, &mut rem).unwrap();
            prop_assert_eq!(acc.to_big_int(), q);
            prop_assert_eq!(rem.to_big_int(), r);

            let m = y.abs();
            let mut acc = MutableBigInt::from(&x);
            acc.modulo(&m).unwrap();
            prop_assert_eq!(acc.to_big_int(), x.modulo(&m).unwrap());
        });
    }

    #[test]
    fn check_division_by_scalar() {
        proptest!(|(x in signed(8), v in 1u64..)| {
            let (q, r) = x.checked_div_rem(&BigInt::from(v)).unwrap();
            let mut acc = MutableBigInt::from(&x);
            let rem = acc.div_rem_u64(v).unwrap();
            prop_assert_eq!(acc.to_big_int(), q);
            prop_assert_eq!(BigInt::from(rem), r.abs());
        });
    }

    #[test]
    fn buffers_are_reused_across_divisions() {
        proptest!(ProptestConfig::with_cases(32), |(
            x in limbs_in(KARATSUBA_THRESHOLD, 2 * KARATSUBA_THRESHOLD),
            y in limbs_in(3, KARATSUBA_THRESHOLD)
        )| {
            let x = BigInt::from_le_limbs(false, &x);
            let y = BigInt::from_le_limbs(false, &y);
            let mut acc = MutableBigInt::new();
            for _ in 0..3 {
                acc.set(&x).unwrap();
                acc.mul(&y).unwrap();
                acc.div(&y).unwrap();
                prop_assert_eq!(acc.to_big_int(), x.clone());
            }
        });
    }
}
