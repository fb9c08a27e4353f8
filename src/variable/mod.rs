//! Design-variable typing.
//!
//! Every component of a candidate vector `x` is typed by a [`VariableRange`]:
//!
//! - **Real**: continuous value in `[lo, hi]`
//! - **Integer**: whole number in `[lo, hi]`
//! - **Set**: exactly one member of a finite, ordered set of distinct values
//!
//! Ranges are validated at construction ([`RangeError`](crate::error::RangeError))
//! and candidate values at evaluation time
//! ([`DomainError`](crate::error::DomainError)).

mod literal;
mod range;

pub use literal::RangeLiteral;
pub use range::{RangeKind, VariableRange, INTEGER_TOLERANCE};
