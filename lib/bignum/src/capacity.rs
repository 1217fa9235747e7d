//! Growth policy for reusable limb storage.

use alloc::{vec, vec::Vec};

use zeroize::Zeroize;

use crate::{
    arithmetic::{alloc_len, checked_limbs_for_bits, Limb, LIMB_BITS, MAX_LIMBS},
    error::{Error, Result},
};

/// Number of limbs a fresh accumulator starts with.
pub const INLINE_LIMBS: usize = 4;

/// Decides how much storage to allocate when a buffer must grow.
///
/// - A requirement within the hint is served by the hint exactly, so an
///   accumulator told its working size up front grows at most once.
/// - The first growth otherwise allocates exactly what is required.
/// - Later growths add 50% headroom.
///
/// Every size is rounded up to the allocation quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapacityPlanner {
    hint: usize,
    grown: bool,
}

impl CapacityPlanner {
    /// A planner with no hint that has not grown yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { hint: 0, grown: false }
    }

    /// Records a capacity hint of `bits` bits.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAllocation`] if `bits` exceeds the supported bit
    /// length.
    pub fn set_hint_bits(&mut self, bits: u64) -> Result<()> {
        self.hint = checked_limbs_for_bits(bits)?;
        Ok(())
    }

    /// The capacity hint in limbs.
    #[must_use]
    pub const fn hint(&self) -> usize {
        self.hint
    }

    /// The capacity hint in bits.
    #[must_use]
    pub const fn hint_bits(&self) -> u64 {
        self.hint as u64 * LIMB_BITS as u64
    }

    /// Capacity, in limbs, to allocate for a buffer that must hold
    /// `required` limbs.
    pub fn next_capacity(&mut self, required: usize) -> usize {
        let capacity = if required <= self.hint {
            self.hint
        } else if !self.grown {
            required
        } else {
            required + required / 2
        };
        self.grown = true;
        alloc_len(capacity.min(MAX_LIMBS).max(required))
    }
}

/// A zeroed-on-use working buffer that grows like an unhinted
/// [`CapacityPlanner`] buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScratchBuffer {
    limbs: Vec<Limb>,
    planner: CapacityPlanner,
}

impl ScratchBuffer {
    /// Returns `len` zeroed limbs, growing the buffer if needed.
    pub(crate) fn take(&mut self, len: usize) -> Result<&mut [Limb]> {
        if len > MAX_LIMBS {
            return Err(Error::InvalidAllocation {
                bits: len as u64 * u64::from(LIMB_BITS),
            });
        }
        if len > self.limbs.len() {
            let capacity = self.planner.next_capacity(len);
            tracing::trace!(
                required = len,
                capacity,
                policy = "scratch",
                "grow"
            );
            self.limbs = vec![0; capacity];
        }
        let limbs = &mut self.limbs[..len];
        limbs.fill(0);
        Ok(limbs)
    }

    /// Returns `len` zeroed limbs from a backing store of at least
    /// `capacity` limbs, replacing it when it is smaller.
    pub(crate) fn take_with_capacity(
        &mut self,
        len: usize,
        capacity: usize,
    ) -> &mut [Limb] {
        debug_assert!(len <= capacity);
        if capacity > self.limbs.len() {
            tracing::trace!(
                required = len,
                capacity,
                policy = "scratch",
                "grow"
            );
            self.limbs = vec![0; capacity];
        }
        let limbs = &mut self.limbs[..len];
        limbs.fill(0);
        limbs
    }

    /// The whole backing storage, regardless of the last `take`.
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<Limb> {
        &mut self.limbs
    }

    #[cfg(all(test, feature = "std"))]
    pub(crate) fn capacity(&self) -> usize {
        self.limbs.len()
    }
}

impl Zeroize for ScratchBuffer {
    fn zeroize(&mut self) {
        self.limbs.as_mut_slice().zeroize();
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::arithmetic::MAX_BIT_LEN;

    #[test]
    fn first_growth_is_exact_then_adds_half() {
        let mut planner = CapacityPlanner::new();
        assert_eq!(planner.next_capacity(8), 8);
        assert_eq!(planner.next_capacity(8), 12);
        assert_eq!(planner.next_capacity(13), 20);
        assert_eq!(planner.next_capacity(5), 8);
    }

    #[test]
    fn hint_wins_when_it_covers_the_requirement() {
        let mut planner = CapacityPlanner::new();
        planner.set_hint_bits(1024).unwrap();
        assert_eq!(planner.hint(), 32);
        assert_eq!(planner.hint_bits(), 1024);
        assert_eq!(planner.next_capacity(9), 32);
        assert_eq!(planner.next_capacity(32), 32);
        assert_eq!(planner.next_capacity(40), 60);
    }

    #[test]
    fn hint_is_bounded() {
        let mut planner = CapacityPlanner::new();
        assert!(planner.set_hint_bits(MAX_BIT_LEN).is_ok());
        assert_eq!(
            planner.set_hint_bits(MAX_BIT_LEN + 1),
            Err(Error::InvalidAllocation { bits: MAX_BIT_LEN + 1 })
        );
    }

    #[test]
    fn scratch_is_zeroed_on_every_take() {
        let mut scratch = ScratchBuffer::default();
        scratch.take(3).unwrap().copy_from_slice(&[1, 2, 3]);
        assert_eq!(scratch.capacity(), 4);
        assert_eq!(scratch.take(2).unwrap(), &[0, 0]);
        assert_eq!(scratch.take(6).unwrap().len(), 6);
        assert_eq!(scratch.capacity(), 12);
    }

    #[test]
    fn sized_take_replaces_only_smaller_storage() {
        let mut scratch = ScratchBuffer::default();
        scratch.take_with_capacity(3, 32).copy_from_slice(&[1, 2, 3]);
        assert_eq!(scratch.capacity(), 32);
        assert_eq!(scratch.take_with_capacity(2, 8), &[0, 0]);
        assert_eq!(scratch.capacity(), 32);
        assert_eq!(scratch.take_with_capacity(40, 60).len(), 40);
        assert_eq!(scratch.capacity(), 60);
    }
}
