//! Arithmetic error type.

/// Result type.
///
/// A result with the bignum [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Arithmetic errors.
///
/// None of these are retried or recovered from inside the crate: an operation
/// that fails is abandoned, and its destination holds an unspecified value
/// that must not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A length, offset or index argument is out of bounds.
    #[error("invalid argument: {what}")]
    InvalidArgument {
        /// Which argument was rejected.
        what: &'static str,
    },
    /// An in-place destination is too small for the result.
    #[error("destination holds {available} limbs, {required} required")]
    Overflow {
        /// Minimum number of limbs the destination must hold.
        required: usize,
        /// Number of limbs the destination holds.
        available: usize,
    },
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// The minuend is smaller than the subtrahend.
    #[error("subtraction underflow")]
    Underflow,
    /// A least non-negative residue was requested for a negative modulus.
    #[error("modulus is negative")]
    NegativeModulus,
    /// An allocation was requested beyond the supported bit length.
    #[error("cannot allocate {bits} bits")]
    InvalidAllocation {
        /// Requested size in bits.
        bits: u64,
    },
}

/// Returns [`Error::Overflow`] unless a destination of `available` limbs
/// holds `required` limbs.
#[inline]
pub(crate) fn ensure_fits(required: usize, available: usize) -> Result<()> {
    if required > available {
        Err(Error::Overflow { required, available })
    } else {
        Ok(())
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn overflow_reports_sizes() {
        let err = ensure_fits(3, 2).unwrap_err();
        assert_eq!(err, Error::Overflow { required: 3, available: 2 });
        assert_eq!(err.to_string(), "destination holds 2 limbs, 3 required");
        assert!(ensure_fits(2, 2).is_ok());
    }
}
