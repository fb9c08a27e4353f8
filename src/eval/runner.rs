//! Full per-candidate pipeline and batch evaluation.
//!
//! [`Evaluator`] runs pre-repair → dispatch for one candidate, or for a
//! whole generation at once.

use std::sync::atomic::AtomicBool;

use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::EvalConfig;
use super::dispatcher::AnalysisDispatcher;
use super::guard::CallGuard;
use super::repair::RepairPipeline;
use super::result::EvaluationResult;
use super::state::EvaluationState;
use crate::error::EvalError;
use crate::schema::ProblemSchema;

/// Evaluates candidates against a [`ProblemSchema`].
///
/// The order within one candidate is strict: pre-repair, then domain
/// validation of the repaired candidate, then analysis. Outputs are
/// computed from the pre-repaired candidate; a repaired candidate returned
/// by a composite analysis replaces it in
/// [`EvaluationResult::x_final`].
///
/// Configuration is used as given; call [`EvalConfig::validate`] first
/// for a descriptive error.
///
/// # Usage
///
/// ```
/// use u_evoprob::eval::{EvalConfig, Evaluator};
/// use u_evoprob::schema::{AnalysisOutput, AnalysisSpec, ProblemSchema};
/// use u_evoprob::variable::VariableRange;
///
/// let ranges = vec![VariableRange::integer(0, 10).unwrap(); 2];
/// let analysis = AnalysisSpec::composite(|x, _| {
///     Ok(AnalysisOutput::new(vec![x[0] + x[1]], vec![x[0] - x[1]]))
/// });
/// let schema = ProblemSchema::builder(2, 1, 1, ranges, analysis)
///     .with_repair(|x, _| Ok(x.iter().map(|v| v.round()).collect()))
///     .build()
///     .unwrap();
///
/// let config = EvalConfig::default();
/// let state = schema.state(0, 0);
/// let result = Evaluator::evaluate(&schema, &[3.2, 1.9], &state, &config).unwrap();
/// assert_eq!(result.f, vec![Some(5.0)]);
/// assert_eq!(result.x_final, vec![3.0, 2.0]);
/// ```
pub struct Evaluator;

impl Evaluator {
    /// Runs the pipeline for one candidate.
    pub fn evaluate(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
        config: &EvalConfig,
    ) -> Result<EvaluationResult, EvalError> {
        Self::evaluate_with_cancel(schema, x, state, config, None)
    }

    /// Runs the pipeline for one candidate with an optional cancellation flag.
    ///
    /// The flag and the configured time limit are checked between steps; a
    /// tripped check fails the candidate with a `Cancelled`/`TimedOut`
    /// error of the phase it occurred in.
    pub fn evaluate_with_cancel(
        schema: &ProblemSchema,
        x: &[f64],
        state: &EvaluationState<'_>,
        config: &EvalConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<EvaluationResult, EvalError> {
        let guard = CallGuard::new(cancel, config.time_limit_ms);
        let x_pre = RepairPipeline::apply_guarded(schema, x, state, &guard)?;
        let result = AnalysisDispatcher::evaluate_guarded(
            schema,
            &x_pre,
            state,
            config.integer_tolerance,
            &guard,
        )?;
        Ok(result)
    }

    /// Evaluates one generation. Candidate `i` gets `pop_id = i`.
    ///
    /// Returns one result per candidate, in input order. A failed candidate
    /// does not affect the others.
    pub fn evaluate_population(
        schema: &ProblemSchema,
        candidates: &[Vec<f64>],
        gen_id: usize,
        config: &EvalConfig,
    ) -> Vec<Result<EvaluationResult, EvalError>> {
        Self::evaluate_population_with_cancel(schema, candidates, gen_id, config, None)
    }

    /// Evaluates one generation with an optional cancellation flag.
    ///
    /// Candidates still pending when the flag is set fail with a
    /// cancellation error.
    pub fn evaluate_population_with_cancel(
        schema: &ProblemSchema,
        candidates: &[Vec<f64>],
        gen_id: usize,
        config: &EvalConfig,
        cancel: Option<&AtomicBool>,
    ) -> Vec<Result<EvaluationResult, EvalError>> {
        let eval_one = |(pop_id, x): (usize, &Vec<f64>)| {
            let state = schema.state(gen_id, pop_id);
            Self::evaluate_with_cancel(schema, x, &state, config, cancel)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = if config.parallel {
            candidates.par_iter().enumerate().map(eval_one).collect()
        } else {
            candidates.iter().enumerate().map(eval_one).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = candidates.iter().enumerate().map(eval_one).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        debug!(
            "evaluated generation {gen_id}: {} candidates, {failed} failed",
            results.len()
        );
        results
    }
}
