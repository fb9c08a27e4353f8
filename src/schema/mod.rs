//! Problem definition.
//!
//! A [`ProblemSchema`] aggregates everything a driver needs to evaluate
//! candidates: dimensions (`nx`, `nf`, `ng`), one [`VariableRange`] per
//! design variable, the [`AnalysisSpec`], an optional evaluation mask,
//! opaque [`UserData`], and optional repair and plot hooks.
//!
//! # Analysis modes
//!
//! - [`AnalysisSpec::Composite`]: one callable returns all objectives and
//!   constraints, optionally with a repaired candidate.
//! - [`AnalysisSpec::SingleSet`]: one callable per response. Responses whose
//!   mask bit is `1` are supplied by a surrogate and need no callable.
//!
//! The schema is validated once by [`ProblemSchemaBuilder::build`] and is
//! immutable afterwards.
//!
//! [`VariableRange`]: crate::variable::VariableRange

mod problem;
mod types;

pub use problem::{ProblemSchema, ProblemSchemaBuilder};
pub use types::{
    AnalysisOutput, AnalysisSpec, CompositeFn, PlotFn, RepairFn, ResponseFn, ResponseIndex,
    SingleSet, UserData,
};
