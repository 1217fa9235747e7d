/*!
Arbitrary-precision integer arithmetic over 32-bit limbs.

> Note that `bignum` is still `0.*.*`, so breaking changes
> [may occur at any time](https://semver.org/#spec-item-4). If you must depend
> on `bignum`, we recommend pinning to a specific version, i.e., `=0.y.z`.

## Layers

- [`arithmetic`] is the magnitude ALU: unsigned operations over
  little-endian limb slices. Every operation comes as an allocating `new_*`
  function and as in-place `set_*` / `*_assign` functions that write into
  caller-owned storage and report [`Error::Overflow`] instead of growing it.
- [`Meta`] packs a sign bit and a normalized length into one scalar.
- [`BigInt`] is an immutable sign-magnitude integer, sized exactly to its
  value.
- [`MutableBigInt`] is an accumulator that reuses its limb storage across
  operations, growing it according to a [`CapacityPlanner`].

Both value types implement [`BigNumber`], which is the only view the ALU and
the outer serialization layers need.

```
use openzeppelin_bignum::{BigInt, BigNumber, MutableBigInt};

let mut acc = MutableBigInt::with_capacity_hint_bits(256).unwrap();
acc.set_u64(1).unwrap();
for i in 1..=20u64 {
    acc.mul_u64(i).unwrap();
}
let factorial = acc.to_big_int();
assert_eq!(factorial.bit_len(), 62);
assert_eq!(factorial, BigInt::from(2_432_902_008_176_640_000u64));
```
*/

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;
extern crate core;

pub mod accumulator;
pub mod arithmetic;
pub mod bigint;
pub mod capacity;
pub mod error;
mod logic;
pub mod meta;
pub mod number;

#[cfg(all(test, feature = "std"))]
pub(crate) mod test_helpers;

pub use accumulator::MutableBigInt;
pub use arithmetic::limb::{Limb, WideLimb};
pub use bigint::BigInt;
pub use capacity::CapacityPlanner;
pub use error::{Error, Result};
pub use meta::Meta;
pub use number::BigNumber;
