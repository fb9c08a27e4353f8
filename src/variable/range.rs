//! Design-variable domains.

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::literal::RangeLiteral;
use crate::error::{DomainError, RangeError};

/// Default tolerance on the fractional residue of integer variables.
pub const INTEGER_TOLERANCE: f64 = 1e-9;

/// The kind of a [`VariableRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    /// Continuous values in `[lo, hi]`.
    Real,
    /// Whole numbers in `[lo, hi]`.
    Integer,
    /// One member of a finite ordered set.
    Set,
}

#[derive(Debug, Clone, PartialEq)]
enum Domain {
    Real { lo: f64, hi: f64 },
    Integer { lo: i64, hi: i64 },
    Set(Vec<f64>),
}

/// Typed, validated domain of one design variable.
///
/// Instances can only be obtained through the checked constructors
/// ([`real`](Self::real), [`integer`](Self::integer), [`set`](Self::set))
/// or a [`RangeLiteral`], and are immutable afterwards.
///
/// # Examples
///
/// ```
/// use u_evoprob::variable::VariableRange;
///
/// let r = VariableRange::real(-5.0, 5.0).unwrap();
/// assert!(r.validate(5.0));
/// assert!(!r.validate(5.000_001));
///
/// let i = VariableRange::integer(0, 3).unwrap();
/// assert!(i.validate(2.0));
/// assert!(!i.validate(2.5));
///
/// let s = VariableRange::set([0.1, 0.2, 0.4]).unwrap();
/// assert!(s.validate(0.2));
/// assert!(!s.validate(0.3));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RangeLiteral", into = "RangeLiteral")
)]
pub struct VariableRange {
    domain: Domain,
}

impl VariableRange {
    /// Creates a continuous range. Requires finite `lo < hi`.
    pub fn real(lo: f64, hi: f64) -> Result<Self, RangeError> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(RangeError::NonFiniteBounds { lo, hi });
        }
        if lo >= hi {
            return Err(RangeError::InvalidBounds { lo, hi });
        }
        Ok(Self {
            domain: Domain::Real { lo, hi },
        })
    }

    /// Creates an integer range. Requires `lo <= hi`; `lo == hi` fixes the variable.
    pub fn integer(lo: i64, hi: i64) -> Result<Self, RangeError> {
        if lo > hi {
            return Err(RangeError::InvalidBounds {
                lo: lo as f64,
                hi: hi as f64,
            });
        }
        Ok(Self {
            domain: Domain::Integer { lo, hi },
        })
    }

    /// Creates a discrete set range from distinct, finite members.
    ///
    /// Member order is preserved.
    pub fn set(values: impl Into<Vec<f64>>) -> Result<Self, RangeError> {
        let values = values.into();
        if values.is_empty() {
            return Err(RangeError::EmptySet);
        }
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(RangeError::NonFiniteMember { value: v });
            }
            if values[..i].contains(&v) {
                return Err(RangeError::DuplicateMember { value: v });
            }
        }
        Ok(Self {
            domain: Domain::Set(values),
        })
    }

    /// Returns the kind of this range.
    pub fn kind(&self) -> RangeKind {
        match self.domain {
            Domain::Real { .. } => RangeKind::Real,
            Domain::Integer { .. } => RangeKind::Integer,
            Domain::Set(_) => RangeKind::Set,
        }
    }

    /// Smallest admissible value.
    pub fn lower(&self) -> f64 {
        match &self.domain {
            Domain::Real { lo, .. } => *lo,
            Domain::Integer { lo, .. } => *lo as f64,
            Domain::Set(values) => values.iter().copied().fold(f64::INFINITY, f64::min),
        }
    }

    /// Largest admissible value.
    pub fn upper(&self) -> f64 {
        match &self.domain {
            Domain::Real { hi, .. } => *hi,
            Domain::Integer { hi, .. } => *hi as f64,
            Domain::Set(values) => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Integer bounds, for [`RangeKind::Integer`] only.
    pub fn integer_bounds(&self) -> Option<(i64, i64)> {
        match self.domain {
            Domain::Integer { lo, hi } => Some((lo, hi)),
            _ => None,
        }
    }

    /// Set members in declaration order, for [`RangeKind::Set`] only.
    pub fn members(&self) -> Option<&[f64]> {
        match &self.domain {
            Domain::Set(values) => Some(values),
            _ => None,
        }
    }

    /// Whether `value` lies in this domain, using [`INTEGER_TOLERANCE`].
    pub fn validate(&self, value: f64) -> bool {
        self.check(value).is_ok()
    }

    /// Checks `value` against this domain, using [`INTEGER_TOLERANCE`].
    pub fn check(&self, value: f64) -> Result<(), DomainError> {
        self.check_with_tolerance(value, INTEGER_TOLERANCE)
    }

    /// Checks `value` against this domain.
    ///
    /// `tolerance` bounds the fractional residue accepted for integer
    /// variables. Bounds themselves are always checked exactly, and set
    /// membership is exact equality.
    pub fn check_with_tolerance(&self, value: f64, tolerance: f64) -> Result<(), DomainError> {
        if !value.is_finite() {
            return Err(DomainError::NonFinite { value });
        }
        match &self.domain {
            Domain::Real { lo, hi } => {
                if value < *lo || value > *hi {
                    return Err(DomainError::OutOfBounds {
                        value,
                        lo: *lo,
                        hi: *hi,
                    });
                }
            }
            Domain::Integer { lo, hi } => {
                let (lo, hi) = (*lo as f64, *hi as f64);
                if value < lo || value > hi {
                    return Err(DomainError::OutOfBounds { value, lo, hi });
                }
                if (value - value.round()).abs() > tolerance {
                    return Err(DomainError::NotIntegral { value });
                }
            }
            Domain::Set(values) => {
                if !values.contains(&value) {
                    return Err(DomainError::NotMember { value });
                }
            }
        }
        Ok(())
    }

    /// Draws a uniformly random in-domain value.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match &self.domain {
            Domain::Real { lo, hi } => {
                let t: f64 = rng.random();
                let width = hi - lo;
                let value = if width.is_finite() {
                    lo + t * width
                } else {
                    lo * (1.0 - t) + hi * t
                };
                value.clamp(*lo, *hi)
            }
            Domain::Integer { lo, hi } => rng.random_range(*lo..=*hi) as f64,
            Domain::Set(values) => values[rng.random_range(0..values.len())],
        }
    }
}

impl TryFrom<RangeLiteral> for VariableRange {
    type Error = RangeError;

    fn try_from(literal: RangeLiteral) -> Result<Self, Self::Error> {
        match literal {
            RangeLiteral::Range([lo, hi]) => Self::real(lo, hi),
            RangeLiteral::Irange([lo, hi]) => Self::integer(lo, hi),
            RangeLiteral::Set(values) => Self::set(values),
        }
    }
}

impl From<VariableRange> for RangeLiteral {
    fn from(range: VariableRange) -> Self {
        match range.domain {
            Domain::Real { lo, hi } => RangeLiteral::Range([lo, hi]),
            Domain::Integer { lo, hi } => RangeLiteral::Irange([lo, hi]),
            Domain::Set(values) => RangeLiteral::Set(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_real_bounds_inclusive() {
        let r = VariableRange::real(-5.0, 5.0).unwrap();
        assert_eq!(r.kind(), RangeKind::Real);
        assert!(r.validate(-5.0));
        assert!(r.validate(0.0));
        assert!(r.validate(5.0));
        assert!(!r.validate(-5.0 - 1e-9));
        assert!(!r.validate(5.0 + 1e-9));
    }

    #[test]
    fn test_real_rejects_bad_bounds() {
        assert_eq!(
            VariableRange::real(1.0, 1.0),
            Err(RangeError::InvalidBounds { lo: 1.0, hi: 1.0 })
        );
        assert!(VariableRange::real(2.0, 1.0).is_err());
        assert!(matches!(
            VariableRange::real(f64::NEG_INFINITY, 0.0),
            Err(RangeError::NonFiniteBounds { .. })
        ));
        assert!(VariableRange::real(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let r = VariableRange::integer(0, 10).unwrap();
        assert!(r.validate(3.0));
        assert!(r.validate(3.0 + 1e-12));
        assert_eq!(r.check(3.5), Err(DomainError::NotIntegral { value: 3.5 }));
        assert!(matches!(
            r.check(11.0),
            Err(DomainError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_integer_fixed_and_inverted() {
        let fixed = VariableRange::integer(4, 4).unwrap();
        assert!(fixed.validate(4.0));
        assert!(!fixed.validate(5.0));
        assert_eq!(fixed.integer_bounds(), Some((4, 4)));

        assert!(VariableRange::integer(5, 4).is_err());
    }

    #[test]
    fn test_custom_integer_tolerance() {
        let r = VariableRange::integer(0, 10).unwrap();
        assert!(r.check_with_tolerance(2.001, 0.01).is_ok());
        assert!(r.check_with_tolerance(2.001, 1e-6).is_err());
    }

    #[test]
    fn test_set_membership_is_exact() {
        let s = VariableRange::set(vec![0.1, 0.25, 0.5]).unwrap();
        assert_eq!(s.kind(), RangeKind::Set);
        assert!(s.validate(0.25));
        assert!(!s.validate(0.25 + 1e-15));
        assert_eq!(s.members(), Some(&[0.1, 0.25, 0.5][..]));
        assert_eq!(s.lower(), 0.1);
        assert_eq!(s.upper(), 0.5);
    }

    #[test]
    fn test_set_construction_errors() {
        assert_eq!(VariableRange::set(Vec::new()), Err(RangeError::EmptySet));
        assert_eq!(
            VariableRange::set([1.0, 2.0, 1.0]),
            Err(RangeError::DuplicateMember { value: 1.0 })
        );
        assert!(matches!(
            VariableRange::set([1.0, f64::NAN]),
            Err(RangeError::NonFiniteMember { .. })
        ));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let r = VariableRange::real(0.0, 1.0).unwrap();
        assert!(matches!(
            r.check(f64::NAN),
            Err(DomainError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_literal_conversion() {
        let r = VariableRange::try_from(RangeLiteral::Irange([1, 3])).unwrap();
        assert_eq!(r.kind(), RangeKind::Integer);
        assert_eq!(RangeLiteral::from(r), RangeLiteral::Irange([1, 3]));

        assert!(VariableRange::try_from(RangeLiteral::Range([3.0, 1.0])).is_err());
        assert!(VariableRange::try_from(RangeLiteral::Set(vec![])).is_err());
    }

    #[test]
    fn test_sample_stays_in_domain() {
        let mut rng = StdRng::seed_from_u64(42);
        let ranges = [
            VariableRange::real(-1.0, 1.0).unwrap(),
            VariableRange::integer(-3, 3).unwrap(),
            VariableRange::set([2.0, 4.0, 8.0]).unwrap(),
        ];
        for r in &ranges {
            for _ in 0..200 {
                let v = r.sample(&mut rng);
                assert!(r.validate(v), "{v} sampled outside {r:?}");
            }
        }
    }

    #[test]
    fn test_sample_extreme_real_width() {
        let mut rng = StdRng::seed_from_u64(1);
        let wide = VariableRange::real(-f64::MAX, f64::MAX).unwrap();
        let half = VariableRange::real(0.0, f64::MAX).unwrap();
        for _ in 0..200 {
            let v = wide.sample(&mut rng);
            assert!(wide.validate(v), "{v} sampled outside {wide:?}");
            let v = half.sample(&mut rng);
            assert!(half.validate(v), "{v} sampled outside {half:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_real_endpoints(lo in -1e6f64..1e6, width in 1e-3f64..1e6) {
            let hi = lo + width;
            let r = VariableRange::real(lo, hi).unwrap();
            prop_assert!(r.validate(lo));
            prop_assert!(r.validate(hi));
            prop_assert!(!r.validate(lo - width * 1e-3));
            prop_assert!(!r.validate(hi + width * 1e-3));
        }

        #[test]
        fn prop_integer_endpoints(lo in -10_000i64..10_000, width in 0i64..10_000) {
            let hi = lo + width;
            let r = VariableRange::integer(lo, hi).unwrap();
            prop_assert!(r.validate(lo as f64));
            prop_assert!(r.validate(hi as f64));
            prop_assert!(!r.validate(lo as f64 - 1.0));
            prop_assert!(!r.validate(hi as f64 + 1.0));
        }

        #[test]
        fn prop_set_membership(
            members in proptest::collection::hash_set(-1000i32..1000, 1..20),
            candidate in -1000i32..1000,
        ) {
            let values: Vec<f64> = members.iter().map(|&m| f64::from(m)).collect();
            let r = VariableRange::set(values.clone()).unwrap();
            prop_assert_eq!(r.validate(f64::from(candidate)), members.contains(&candidate));

            let mut dup = values;
            dup.push(dup[0]);
            prop_assert!(VariableRange::set(dup).is_err());
        }
    }
}
