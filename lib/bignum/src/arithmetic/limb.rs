//! Single-limb arithmetic helpers with explicit carries.

/// One 32-bit digit of a magnitude.
pub type Limb = u32;

/// A double-width limb, wide enough for any limb product plus two carries.
pub type WideLimb = u64;

/// Number of bits in a [`Limb`].
pub const LIMB_BITS: u32 = Limb::BITS;

/// Multiply two [`Limb`]'s and return widened result.
#[inline(always)]
#[must_use]
pub const fn widening_mul(a: Limb, b: Limb) -> WideLimb {
    a as WideLimb * b as WideLimb
}

/// Calculate `a + b * c`, returning the lower 32 bits of the result and the
/// upper 32 bits as carry.
#[inline(always)]
#[must_use]
pub const fn mac(a: Limb, b: Limb, c: Limb) -> (Limb, Limb) {
    let tmp = a as WideLimb + widening_mul(b, c);
    (tmp as Limb, (tmp >> LIMB_BITS) as Limb)
}

/// Calculate `a + (b * c) + carry`, returning the least significant digit
/// and the most significant digit as the new carry.
///
/// Cannot overflow: `(2^32 - 1) + (2^32 - 1)^2 + (2^32 - 1) < 2^64`.
#[inline(always)]
#[must_use]
pub const fn carrying_mac(
    a: Limb,
    b: Limb,
    c: Limb,
    carry: Limb,
) -> (Limb, Limb) {
    let tmp = a as WideLimb + widening_mul(b, c) + carry as WideLimb;
    (tmp as Limb, (tmp >> LIMB_BITS) as Limb)
}

/// Calculate `b * c + carry`, returning the low digit and the high digit.
#[inline(always)]
#[must_use]
pub const fn carrying_mul(b: Limb, c: Limb, carry: Limb) -> (Limb, Limb) {
    let tmp = widening_mul(b, c) + carry as WideLimb;
    (tmp as Limb, (tmp >> LIMB_BITS) as Limb)
}

/// Calculate `a + b + carry` and return the result and carry.
#[inline(always)]
#[must_use]
pub const fn adc(a: Limb, b: Limb, carry: Limb) -> (Limb, Limb) {
    let tmp = a as WideLimb + b as WideLimb + carry as WideLimb;
    (tmp as Limb, (tmp >> LIMB_BITS) as Limb)
}

/// Calculate `a - b - borrow` and return the result and borrow.
///
/// The 33rd bit of the intermediate sum carries the borrow.
#[inline(always)]
#[must_use]
pub const fn sbb(a: Limb, b: Limb, borrow: Limb) -> (Limb, Limb) {
    let tmp = (1 << LIMB_BITS) + a as WideLimb - b as WideLimb
        - borrow as WideLimb;
    let borrow = if tmp >> LIMB_BITS == 0 { 1 } else { 0 };
    (tmp as Limb, borrow)
}

/// Join a high and a low limb into a [`WideLimb`].
#[inline(always)]
#[must_use]
pub const fn join(hi: Limb, lo: Limb) -> WideLimb {
    (hi as WideLimb) << LIMB_BITS | lo as WideLimb
}

/// Split a [`WideLimb`] into its `(lo, hi)` limbs.
#[inline(always)]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn split(value: WideLimb) -> (Limb, Limb) {
    (value as Limb, (value >> LIMB_BITS) as Limb)
}
