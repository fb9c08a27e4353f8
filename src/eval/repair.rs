//! Pre-evaluation repair.
//!
//! Repair runs at two points of one evaluation:
//!
//! 1. **Before analysis** via the schema's repair function, shaping the
//!    candidate toward feasibility. Analysis outputs are computed from this
//!    pre-repaired candidate.
//! 2. **After analysis** via the optional repaired candidate returned by a
//!    composite analysis, which becomes the stored `x_final` without being
//!    re-evaluated.
//!
//! Only the first is a separate step; the second is carried by
//! [`AnalysisOutput::x_repaired`](crate::schema::AnalysisOutput::x_repaired).

use log::debug;

use super::guard::CallGuard;
use super::state::EvaluationState;
use crate::error::RepairError;
use crate::schema::ProblemSchema;

/// Applies the schema's pre-evaluation repair function.
pub struct RepairPipeline;

impl RepairPipeline {
    /// Returns the repaired candidate, or a copy of `x` if no repair is configured.
    pub fn apply(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
    ) -> Result<Vec<f64>, RepairError> {
        Self::apply_guarded(schema, x, state, &CallGuard::unbounded())
    }

    pub(crate) fn apply_guarded(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
        guard: &CallGuard<'_>,
    ) -> Result<Vec<f64>, RepairError> {
        guard.check()?;
        let Some(repair) = schema.repair_fn() else {
            return Ok(x.to_vec());
        };

        let repaired = repair(x, state).map_err(RepairError::Failed)?;
        if repaired.len() != schema.nx() {
            return Err(RepairError::LengthMismatch {
                expected: schema.nx(),
                actual: repaired.len(),
            });
        }
        guard.check()?;

        debug!(
            "repaired candidate gen={} pop={}",
            state.gen_id(),
            state.pop_id()
        );
        Ok(repaired)
    }
}
