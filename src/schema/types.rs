//! Hook signatures and analysis modes.
//!
//! All hooks receive the candidate vector and the per-call
//! [`EvaluationState`]; they must treat the state's userdata as read-only.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::eval::EvaluationState;
use crate::plot::PlotContext;

/// Composite analysis: all objectives and constraints from one call.
pub type CompositeFn =
    Box<dyn Fn(&[f64], &EvaluationState<'_>) -> Result<AnalysisOutput, BoxError> + Send + Sync>;

/// Single-response analysis: one scalar objective or constraint.
pub type ResponseFn =
    Box<dyn Fn(&[f64], &EvaluationState<'_>) -> Result<f64, BoxError> + Send + Sync>;

/// Pre-evaluation repair: maps a candidate to a corrected one of the same length.
pub type RepairFn =
    Box<dyn Fn(&[f64], &EvaluationState<'_>) -> Result<Vec<f64>, BoxError> + Send + Sync>;

/// Visualization hook.
pub type PlotFn = Box<
    dyn Fn(&[f64], &EvaluationState<'_>, &mut PlotContext) -> Result<(), BoxError> + Send + Sync,
>;

/// Position of one response: objectives first, then constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseIndex {
    /// Objective `f[i]`.
    Objective(usize),
    /// Constraint `g[j]`.
    Constraint(usize),
}

impl ResponseIndex {
    /// Maps a flat mask index to a response, given `nf` objectives.
    pub fn from_flat(index: usize, nf: usize) -> Self {
        if index < nf {
            Self::Objective(index)
        } else {
            Self::Constraint(index - nf)
        }
    }

    /// Flat mask index of this response, given `nf` objectives.
    pub fn flat(self, nf: usize) -> usize {
        match self {
            Self::Objective(i) => i,
            Self::Constraint(j) => nf + j,
        }
    }
}

impl fmt::Display for ResponseIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Objective(i) => write!(f, "f[{i}]"),
            Self::Constraint(j) => write!(f, "g[{j}]"),
        }
    }
}

/// Output of a composite analysis function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisOutput {
    /// Objective values, length `nf`.
    pub f: Vec<f64>,
    /// Constraint values, length `ng`.
    pub g: Vec<f64>,
    /// Optional post-evaluation repaired candidate, length `nx`.
    pub x_repaired: Option<Vec<f64>>,
}

impl AnalysisOutput {
    /// Creates an output without a repaired candidate.
    pub fn new(f: Vec<f64>, g: Vec<f64>) -> Self {
        Self {
            f,
            g,
            x_repaired: None,
        }
    }

    /// Attaches a repaired candidate that replaces `x` in the final result.
    pub fn with_repaired(mut self, x: Vec<f64>) -> Self {
        self.x_repaired = Some(x);
        self
    }
}

/// Per-response analysis callables.
///
/// Slots are positional: objective slot `i` serves `f[i]`, constraint slot
/// `j` serves `g[j]`. Slots for responses marked as externally supplied in
/// the evaluation mask may stay empty. Slots are stored sparsely, so an
/// out-of-range index is only reported when the schema is built.
#[derive(Default)]
pub struct SingleSet {
    objectives: BTreeMap<usize, ResponseFn>,
    constraints: BTreeMap<usize, ResponseFn>,
}

impl SingleSet {
    /// Creates an empty set with no callables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the callable for objective `f[index]`.
    pub fn with_objective<F>(mut self, index: usize, f: F) -> Self
    where
        F: Fn(&[f64], &EvaluationState<'_>) -> Result<f64, BoxError> + Send + Sync + 'static,
    {
        self.objectives.insert(index, Box::new(f));
        self
    }

    /// Installs the callable for constraint `g[index]`.
    pub fn with_constraint<F>(mut self, index: usize, f: F) -> Self
    where
        F: Fn(&[f64], &EvaluationState<'_>) -> Result<f64, BoxError> + Send + Sync + 'static,
    {
        self.constraints.insert(index, Box::new(f));
        self
    }

    /// Callable serving `response`, if any.
    pub fn get(&self, response: ResponseIndex) -> Option<&ResponseFn> {
        match response {
            ResponseIndex::Objective(i) => self.objectives.get(&i),
            ResponseIndex::Constraint(j) => self.constraints.get(&j),
        }
    }

    /// Number of objective slots up to the highest filled one.
    pub fn objective_slots(&self) -> usize {
        slot_count(&self.objectives)
    }

    /// Number of constraint slots up to the highest filled one.
    pub fn constraint_slots(&self) -> usize {
        slot_count(&self.constraints)
    }
}

fn slot_count(slots: &BTreeMap<usize, ResponseFn>) -> usize {
    slots
        .last_key_value()
        .map_or(0, |(&index, _)| index.saturating_add(1))
}

impl fmt::Debug for SingleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = |slots: &BTreeMap<usize, ResponseFn>| -> Vec<usize> {
            slots.keys().copied().collect()
        };
        f.debug_struct("SingleSet")
            .field("objectives", &filled(&self.objectives))
            .field("constraints", &filled(&self.constraints))
            .finish()
    }
}

/// How responses are computed.
pub enum AnalysisSpec {
    /// One callable producing `(f, g[, x'])`.
    Composite(CompositeFn),
    /// One callable per response, invoked only for unmasked responses.
    SingleSet(SingleSet),
}

impl AnalysisSpec {
    /// Wraps a composite analysis function.
    pub fn composite<F>(f: F) -> Self
    where
        F: Fn(&[f64], &EvaluationState<'_>) -> Result<AnalysisOutput, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Self::Composite(Box::new(f))
    }
}

impl From<SingleSet> for AnalysisSpec {
    fn from(set: SingleSet) -> Self {
        Self::SingleSet(set)
    }
}

impl fmt::Debug for AnalysisSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite(_) => f.write_str("Composite(..)"),
            Self::SingleSet(set) => f.debug_tuple("SingleSet").field(set).finish(),
        }
    }
}

/// Opaque, read-only problem data shared with every hook.
///
/// The core never inspects the payload; hooks recover it with
/// [`downcast_ref`](Self::downcast_ref). Cloning shares the same payload.
#[derive(Clone, Default)]
pub struct UserData(Option<Arc<dyn Any + Send + Sync>>);

impl UserData {
    /// Wraps `value` as shared userdata.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Userdata with no payload.
    pub fn none() -> Self {
        Self(None)
    }

    /// Whether a payload is present.
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Borrows the payload as `T`, if present and of that type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|v| v.downcast_ref::<T>())
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("UserData(..)"),
            None => f.write_str("UserData(None)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_index_flat_mapping() {
        assert_eq!(ResponseIndex::from_flat(0, 1), ResponseIndex::Objective(0));
        assert_eq!(ResponseIndex::from_flat(2, 1), ResponseIndex::Constraint(1));
        assert_eq!(ResponseIndex::Constraint(1).flat(1), 2);
        assert_eq!(ResponseIndex::Objective(3).to_string(), "f[3]");
    }

    #[test]
    fn test_single_set_slots() {
        let set = SingleSet::new().with_constraint(1, |x, _| Ok(x[0]));
        assert_eq!(set.objective_slots(), 0);
        assert_eq!(set.constraint_slots(), 2);
        assert!(set.get(ResponseIndex::Constraint(0)).is_none());
        assert!(set.get(ResponseIndex::Constraint(1)).is_some());
        assert!(set.get(ResponseIndex::Objective(0)).is_none());
        assert_eq!(
            format!("{set:?}"),
            "SingleSet { objectives: [], constraints: [1] }"
        );
    }

    #[test]
    fn test_single_set_huge_index_is_sparse() {
        let set = SingleSet::new()
            .with_objective(usize::MAX, |x, _| Ok(x[0]))
            .with_constraint(1 << 40, |x, _| Ok(x[0]));
        assert_eq!(set.objective_slots(), usize::MAX);
        assert_eq!(set.constraint_slots(), (1 << 40) + 1);
        assert!(set.get(ResponseIndex::Objective(usize::MAX)).is_some());
        assert!(set.get(ResponseIndex::Objective(0)).is_none());
    }

    #[test]
    fn test_userdata_downcast() {
        let data = UserData::new(vec![1.0_f64, 2.0]);
        assert!(data.is_some());
        assert_eq!(data.downcast_ref::<Vec<f64>>(), Some(&vec![1.0, 2.0]));
        assert!(data.downcast_ref::<String>().is_none());

        let shared = data.clone();
        assert!(std::ptr::eq(
            data.downcast_ref::<Vec<f64>>().unwrap(),
            shared.downcast_ref::<Vec<f64>>().unwrap()
        ));

        assert!(UserData::none().downcast_ref::<Vec<f64>>().is_none());
    }

    #[test]
    fn test_analysis_output_builder() {
        let out = AnalysisOutput::new(vec![1.0], vec![]).with_repaired(vec![0.0, 1.0]);
        assert_eq!(out.x_repaired, Some(vec![0.0, 1.0]));
    }
}
