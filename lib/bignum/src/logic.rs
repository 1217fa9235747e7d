//! Two's-complement bitwise logic on sign-magnitude values.
//!
//! A negative value `-a` has the infinite two's-complement encoding
//! `!(a - 1)`. Writing `A' = |a| - 1`, every mixed-sign combination reduces
//! to an unsigned operation on magnitudes, optionally followed by a final
//! increment when the result is negative:
//!
//! | op  | `+x, +y` | `+x, -y`             | `-x, -y`             |
//! |-----|----------|----------------------|----------------------|
//! | and | `x & y`  | `x & !Y'`            | `-((X' \| Y') + 1)`  |
//! | or  | `x \| y` | `-((Y' & !x) + 1)`   | `-((X' & Y') + 1)`   |
//! | xor | `x ^ y`  | `-((x ^ Y') + 1)`    | `X' ^ Y'`            |

use alloc::vec::Vec;

use crate::{
    arithmetic::{
        new_add_u64, new_and, new_and_not, new_or, new_sub_u64, new_xor,
        normalized_len, Limb,
    },
    error::Result,
};

/// A bitwise operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicOp {
    And,
    Or,
    Xor,
}

fn trim(mut x: Vec<Limb>) -> Vec<Limb> {
    x.truncate(normalized_len(&x));
    x
}

/// `|a| - 1` for a non-zero magnitude.
fn decrement(x: &[Limb]) -> Result<Vec<Limb>> {
    new_sub_u64(x, 1).map(trim)
}

fn negative(x: &[Limb]) -> Result<(bool, Vec<Limb>)> {
    Ok((true, trim(new_add_u64(x, 1)?)))
}

/// Computes `op` on the two's-complement encodings of two signed values,
/// returning the sign and normalized magnitude of the result.
pub(crate) fn signed_logic(
    op: LogicOp,
    x_neg: bool,
    x: &[Limb],
    y_neg: bool,
    y: &[Limb],
) -> Result<(bool, Vec<Limb>)> {
    // Order the operands so that a lone negative one comes second.
    let (x, y) = if x_neg && !y_neg { (y, x) } else { (x, y) };
    match (x_neg || y_neg, x_neg && y_neg) {
        (false, _) => {
            let z = match op {
                LogicOp::And => new_and(x, y)?,
                LogicOp::Or => new_or(x, y)?,
                LogicOp::Xor => new_xor(x, y)?,
            };
            Ok((false, trim(z)))
        }
        (true, false) => {
            let y = decrement(y)?;
            match op {
                LogicOp::And => Ok((false, trim(new_and_not(x, &y)?))),
                LogicOp::Or => negative(&trim(new_and_not(&y, x)?)),
                LogicOp::Xor => negative(&trim(new_xor(x, &y)?)),
            }
        }
        (true, true) => {
            let x = decrement(x)?;
            let y = decrement(y)?;
            match op {
                LogicOp::And => negative(&trim(new_or(&x, &y)?)),
                LogicOp::Or => negative(&trim(new_and(&x, &y)?)),
                LogicOp::Xor => Ok((false, trim(new_xor(&x, &y)?))),
            }
        }
    }
}
