//! Sign and length metadata packed into one word.

use core::fmt::{Debug, Formatter, Result as FmtResult};

use zeroize::Zeroize;

use crate::{
    arithmetic::{normalized_len, Limb, MAX_LIMBS},
    error::{Error, Result},
};

const SIGN_BIT: u32 = 1 << 31;
const LEN_MASK: u32 = SIGN_BIT - 1;

/// Sign bit (bit 31) and normalized limb count (bits 0..31) of a value.
///
/// There is no negative zero: a zero length always carries the non-negative
/// sign.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Zeroize)]
pub struct Meta(u32);

impl Meta {
    /// Metadata of the value zero.
    pub const ZERO: Meta = Meta(0);

    /// Packs a sign and a normalized length.
    ///
    /// # Panics
    ///
    /// If `len` exceeds [`MAX_LIMBS`].
    #[must_use]
    pub const fn new(negative: bool, len: usize) -> Self {
        assert!(len <= MAX_LIMBS, "length exceeds the supported limb count");
        Self::pack(negative, len)
    }

    /// Packs a sign and a normalized length.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `len` exceeds [`MAX_LIMBS`].
    pub const fn try_new(negative: bool, len: usize) -> Result<Self> {
        if len > MAX_LIMBS {
            return Err(Error::InvalidArgument { what: "len" });
        }
        Ok(Self::pack(negative, len))
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn pack(negative: bool, len: usize) -> Self {
        let sign = if negative && len != 0 { SIGN_BIT } else { 0 };
        Meta(sign | len as u32)
    }

    /// Builds metadata for `limbs`, ignoring its high zero limbs.
    ///
    /// # Panics
    ///
    /// If the normalized length exceeds [`MAX_LIMBS`].
    #[must_use]
    pub fn from_limbs(negative: bool, limbs: &[Limb]) -> Self {
        Self::new(negative, normalized_len(limbs))
    }

    /// `1` if negative, `0` otherwise.
    #[inline]
    #[must_use]
    pub const fn sign_bit(self) -> u32 {
        self.0 >> 31
    }

    /// Checks whether the value is negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 & SIGN_BIT != 0
    }

    /// `-1` if negative, `0` otherwise.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn sign_mask(self) -> i32 {
        (self.0 as i32) >> 31
    }

    /// `-1`, `0` or `1` following the sign of the value.
    #[inline]
    #[must_use]
    pub const fn signum(self) -> i32 {
        if self.is_negative() {
            -1
        } else if self.is_zero() {
            0
        } else {
            1
        }
    }

    /// Normalized length in limbs.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(self) -> usize {
        (self.0 & LEN_MASK) as usize
    }

    /// Checks whether the value is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Same length, non-negative sign.
    #[inline]
    #[must_use]
    pub const fn abs(self) -> Self {
        Meta(self.0 & LEN_MASK)
    }

    /// Same length, opposite sign. Zero stays non-negative.
    #[inline]
    #[must_use]
    pub const fn negate(self) -> Self {
        if self.is_zero() {
            self
        } else {
            Meta(self.0 ^ SIGN_BIT)
        }
    }

    /// Same sign, new length.
    ///
    /// # Panics
    ///
    /// If `len` exceeds [`MAX_LIMBS`].
    #[inline]
    #[must_use]
    pub const fn with_len(self, len: usize) -> Self {
        Self::new(self.is_negative(), len)
    }
}

impl Debug for Meta {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Meta")
            .field("negative", &self.is_negative())
            .field("len", &self.len())
            .finish()
    }
}
