//! Analysis dispatch.
//!
//! [`AnalysisDispatcher`] turns one candidate into objective and constraint
//! values, switching on the schema's [`AnalysisSpec`] and honoring the
//! evaluation mask. It holds no state, so one schema can be dispatched
//! concurrently from many threads.

use log::{debug, trace};

use super::config::EvalConfig;
use super::guard::CallGuard;
use super::result::EvaluationResult;
use super::state::EvaluationState;
use crate::error::DispatchError;
use crate::schema::{AnalysisSpec, CompositeFn, ProblemSchema, ResponseIndex, SingleSet};

/// Computes the responses of one candidate.
///
/// # Usage
///
/// ```
/// use u_evoprob::eval::AnalysisDispatcher;
/// use u_evoprob::schema::{AnalysisOutput, AnalysisSpec, ProblemSchema};
/// use u_evoprob::variable::VariableRange;
///
/// let ranges = vec![VariableRange::real(-5.0, 5.0).unwrap(); 2];
/// let analysis = AnalysisSpec::composite(|x, _| {
///     Ok(AnalysisOutput::new(vec![x[0] * x[0] + x[1] * x[1]], vec![]))
/// });
/// let schema = ProblemSchema::builder(2, 1, 0, ranges, analysis).build().unwrap();
///
/// let state = schema.state(0, 0);
/// let result = AnalysisDispatcher::evaluate(&schema, &[3.0, 4.0], &state).unwrap();
/// assert_eq!(result.f, vec![Some(25.0)]);
/// assert!(result.g.is_empty());
/// assert_eq!(result.x_final, vec![3.0, 4.0]);
/// ```
pub struct AnalysisDispatcher;

impl AnalysisDispatcher {
    /// Evaluates `x` with the default configuration.
    pub fn evaluate(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
    ) -> Result<EvaluationResult, DispatchError> {
        Self::evaluate_with_config(schema, x, state, &EvalConfig::default())
    }

    /// Evaluates `x`, using the tolerance and time limit from `config`.
    pub fn evaluate_with_config(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
        config: &EvalConfig,
    ) -> Result<EvaluationResult, DispatchError> {
        let guard = CallGuard::new(None, config.time_limit_ms);
        Self::evaluate_guarded(schema, x, state, config.integer_tolerance, &guard)
    }

    /// Checks the candidate's length and every component against its range.
    ///
    /// Values are never clamped.
    pub fn check_candidate(
        schema: &ProblemSchema,
        x: &[f64],
        tolerance: f64,
    ) -> Result<(), DispatchError> {
        if x.len() != schema.nx() {
            return Err(DispatchError::CandidateLength {
                expected: schema.nx(),
                actual: x.len(),
            });
        }
        for (index, (&value, range)) in x.iter().zip(schema.ranges()).enumerate() {
            range
                .check_with_tolerance(value, tolerance)
                .map_err(|source| DispatchError::Domain { index, source })?;
        }
        Ok(())
    }

    pub(crate) fn evaluate_guarded(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
        tolerance: f64,
        guard: &CallGuard<'_>,
    ) -> Result<EvaluationResult, DispatchError> {
        Self::check_candidate(schema, x, tolerance)?;
        debug!(
            "dispatching candidate gen={} pop={}",
            state.gen_id(),
            state.pop_id()
        );

        match schema.analysis() {
            AnalysisSpec::Composite(analysis) => {
                dispatch_composite(schema, analysis, x, state, guard)
            }
            AnalysisSpec::SingleSet(set) => dispatch_single_set(schema, set, x, state, guard),
        }
    }
}

fn dispatch_composite(
    schema: &ProblemSchema,
    analysis: &CompositeFn,
    x: &[f64],
    state: &EvaluationState<'_>,
    guard: &CallGuard<'_>,
) -> Result<EvaluationResult, DispatchError> {
    guard.check()?;
    let output = analysis(x, state).map_err(DispatchError::Analysis)?;
    guard.check()?;

    check_len("objectives", schema.nf(), output.f.len())?;
    check_len("constraints", schema.ng(), output.g.len())?;
    if let Some(repaired) = &output.x_repaired {
        check_len("repaired candidate", schema.nx(), repaired.len())?;
    }

    Ok(EvaluationResult {
        f: output.f.into_iter().map(Some).collect(),
        g: output.g.into_iter().map(Some).collect(),
        x_final: output.x_repaired.unwrap_or_else(|| x.to_vec()),
    })
}

fn dispatch_single_set(
    schema: &ProblemSchema,
    set: &SingleSet,
    x: &[f64],
    state: &EvaluationState<'_>,
    guard: &CallGuard<'_>,
) -> Result<EvaluationResult, DispatchError> {
    let nf = schema.nf();
    let mut responses = Vec::with_capacity(schema.n_responses());

    for (flat, &masked) in schema.eval_mask().iter().enumerate() {
        let response = ResponseIndex::from_flat(flat, nf);
        if masked {
            trace!("response {response} left for external supply");
            responses.push(None);
            continue;
        }
        guard.check()?;
        let analysis = set
            .get(response)
            .ok_or(DispatchError::MissingAnalysisFn { response })?;
        let value =
            analysis(x, state).map_err(|source| DispatchError::Response { response, source })?;
        responses.push(Some(value));
    }
    guard.check()?;

    let g = responses.split_off(nf);
    Ok(EvaluationResult {
        f: responses,
        g,
        x_final: x.to_vec(),
    })
}

fn check_len(output: &'static str, expected: usize, actual: usize) -> Result<(), DispatchError> {
    if expected != actual {
        return Err(DispatchError::OutputLength {
            output,
            expected,
            actual,
        });
    }
    Ok(())
}
