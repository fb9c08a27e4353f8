//! Error taxonomy.
//!
//! Construction-time errors ([`RangeError`], [`SchemaError`]) abort schema
//! building. Evaluation-time errors ([`DomainError`], [`DispatchError`],
//! [`RepairError`]) are surfaced per candidate; the driver decides whether a
//! failed candidate is fatal or merely penalized.

use std::error::Error as StdError;

use thiserror::Error;

use crate::schema::ResponseIndex;

/// Boxed error returned by user-supplied hooks.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Malformed variable-range construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("invalid bounds: lower bound {lo} must be below upper bound {hi}")]
    InvalidBounds { lo: f64, hi: f64 },

    #[error("invalid bounds: {lo} and {hi} must both be finite")]
    NonFiniteBounds { lo: f64, hi: f64 },

    #[error("set range must contain at least one member")]
    EmptySet,

    #[error("set range contains duplicate member {value}")]
    DuplicateMember { value: f64 },

    #[error("set range contains non-finite member {value}")]
    NonFiniteMember { value: f64 },
}

/// Structural mismatch detected while building a [`ProblemSchema`](crate::schema::ProblemSchema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid dimensions: nx={nx}, nf={nf}, ng={ng} (nx must be at least 1)")]
    InvalidDimensions { nx: usize, nf: usize, ng: usize },

    #[error("range count mismatch: expected {expected}, got {actual}")]
    RangeCountMismatch { expected: usize, actual: usize },

    #[error("mask length/values invalid: expected length {expected}, got {actual}")]
    MaskLength { expected: usize, actual: usize },

    #[error("mask length/values invalid: entry {index} is {value}, expected 0 or 1")]
    MaskValue { index: usize, value: u8 },

    #[error("missing analysis function for unmasked response {response}")]
    MissingAnalysisFn { response: ResponseIndex },

    #[error("too many {kind} analysis functions: {declared} declared, {supplied} supplied")]
    ExcessAnalysisFns {
        kind: &'static str,
        declared: usize,
        supplied: usize,
    },
}

/// A candidate value violates its declared range or type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("value {value} is not finite")]
    NonFinite { value: f64 },

    #[error("value {value} lies outside [{lo}, {hi}]")]
    OutOfBounds { value: f64, lo: f64, hi: f64 },

    #[error("value {value} is not integral")]
    NotIntegral { value: f64 },

    #[error("value {value} is not a member of the declared set")]
    NotMember { value: f64 },
}

/// Failure while obtaining the responses of one candidate.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("candidate length mismatch: expected {expected}, got {actual}")]
    CandidateLength { expected: usize, actual: usize },

    #[error("out-of-domain value at x[{index}]")]
    Domain {
        index: usize,
        #[source]
        source: DomainError,
    },

    #[error("analysis output length mismatch: {output} expected {expected}, got {actual}")]
    OutputLength {
        output: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("missing analysis function for unmasked response {response}")]
    MissingAnalysisFn { response: ResponseIndex },

    #[error("analysis function failed")]
    Analysis(#[source] BoxError),

    #[error("analysis function for response {response} failed")]
    Response {
        response: ResponseIndex,
        #[source]
        source: BoxError,
    },

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("evaluation exceeded time limit of {limit_ms} ms")]
    TimedOut { limit_ms: u64 },
}

/// Failure while repairing a candidate before evaluation.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("repaired candidate length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("repair function failed")]
    Failed(#[source] BoxError),

    #[error("repair cancelled")]
    Cancelled,

    #[error("repair exceeded time limit of {limit_ms} ms")]
    TimedOut { limit_ms: u64 },
}

/// Failure of the full pre-repair then dispatch pipeline for one candidate.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Repair(#[from] RepairError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_messages_carry_taxonomy_prefix() {
        let e = SchemaError::RangeCountMismatch {
            expected: 2,
            actual: 3,
        };
        assert!(e.to_string().starts_with("range count mismatch"));

        let e = SchemaError::MaskValue { index: 1, value: 2 };
        assert!(e.to_string().starts_with("mask length/values invalid"));

        let e = SchemaError::MissingAnalysisFn {
            response: ResponseIndex::Constraint(1),
        };
        assert_eq!(
            e.to_string(),
            "missing analysis function for unmasked response g[1]"
        );
    }

    #[test]
    fn test_domain_error_is_source_of_dispatch_error() {
        let e = DispatchError::Domain {
            index: 0,
            source: DomainError::NotIntegral { value: 0.5 },
        };
        assert_eq!(e.to_string(), "out-of-domain value at x[0]");
        let source = e.source().expect("domain source");
        assert_eq!(source.to_string(), "value 0.5 is not integral");
    }

    #[test]
    fn test_eval_error_is_transparent() {
        let e: EvalError = RepairError::LengthMismatch {
            expected: 2,
            actual: 1,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "repaired candidate length mismatch: expected 2, got 1"
        );
    }
}
