//! Arithmetic over the integers extended with `+∞` and `−∞`.
//!
//! Edge values are `i32`s where [`i32::MAX`] stands for `+∞` and [`i32::MIN`] for `−∞`; every
//! other value is finite.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::ArithmeticRangeError;

/// The value of an absent constraint.
pub const POS_INFINITY: i32 = i32::MAX;
/// The value of a constraint which can never be satisfied.
pub const NEG_INFINITY: i32 = i32::MIN;

pub(crate) fn is_finite(value: i32) -> bool {
    value != POS_INFINITY && value != NEG_INFINITY
}

/// Adds two extended integers.
///
/// Infinite operands saturate the result. Adding `+∞` to `−∞`, or a finite sum which does not fit
/// in the finite range, is an [`ArithmeticRangeError`].
pub(crate) fn sum_with_overflow_check(lhs: i32, rhs: i32) -> Result<i32, ArithmeticRangeError> {
    match (lhs, rhs) {
        (POS_INFINITY, NEG_INFINITY) | (NEG_INFINITY, POS_INFINITY) => {
            Err(ArithmeticRangeError::SumOverflow { lhs, rhs })
        }
        (POS_INFINITY, _) | (_, POS_INFINITY) => Ok(POS_INFINITY),
        (NEG_INFINITY, _) | (_, NEG_INFINITY) => Ok(NEG_INFINITY),
        _ => lhs
            .checked_add(rhs)
            .filter(|&sum| is_finite(sum))
            .ok_or(ArithmeticRangeError::SumOverflow { lhs, rhs }),
    }
}

/// Wraps an extended integer so it is displayed with `∞` symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExtendedInt(pub(crate) i32);

impl Display for ExtendedInt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            POS_INFINITY => write!(f, "∞"),
            NEG_INFINITY => write!(f, "-∞"),
            value => write!(f, "{value}"),
        }
    }
}
