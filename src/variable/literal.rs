//! Range literals as written in problem definitions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unvalidated range literal.
///
/// Converts into a [`VariableRange`](super::VariableRange) with `TryFrom`,
/// which applies all construction checks. With the `serde` feature enabled
/// a literal is written as `{"type": "range", "values": [lo, hi]}`,
/// `{"type": "irange", "values": [lo, hi]}` or
/// `{"type": "set", "values": [v1, ..., vn]}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "type", content = "values", rename_all = "lowercase")
)]
pub enum RangeLiteral {
    /// Continuous `[lo, hi]`.
    Range([f64; 2]),
    /// Integer `[lo, hi]`.
    Irange([i64; 2]),
    /// Discrete `{v1, ..., vn}`.
    Set(Vec<f64>),
}

impl RangeLiteral {
    /// The literal keyword: `"range"`, `"irange"` or `"set"`.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Range(_) => "range",
            Self::Irange(_) => "irange",
            Self::Set(_) => "set",
        }
    }
}
