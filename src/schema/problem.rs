//! Problem schema construction and validation.

use std::any::Any;
use std::fmt;

use log::debug;
use rand::Rng;

use super::types::{AnalysisSpec, PlotFn, RepairFn, ResponseIndex, SingleSet, UserData};
use crate::error::{BoxError, SchemaError};
use crate::eval::EvaluationState;
use crate::plot::{PlotContext, PlotHook};
use crate::variable::VariableRange;

/// Immutable description of an optimization problem.
///
/// Built once with [`ProblemSchema::builder`] and shared (read-only) by every
/// evaluation for the rest of a run. The schema is `Send + Sync`, so one
/// instance can serve concurrent evaluations.
///
/// # Examples
///
/// ```
/// use u_evoprob::schema::{AnalysisOutput, AnalysisSpec, ProblemSchema};
/// use u_evoprob::variable::VariableRange;
///
/// let ranges = vec![VariableRange::real(-5.0, 5.0).unwrap(); 2];
/// let analysis = AnalysisSpec::composite(|x, _| {
///     Ok(AnalysisOutput::new(vec![x[0] * x[0] + x[1] * x[1]], vec![]))
/// });
/// let schema = ProblemSchema::builder(2, 1, 0, ranges, analysis)
///     .build()
///     .unwrap();
/// assert_eq!(schema.nx(), 2);
/// assert!(!schema.has_repair());
/// ```
pub struct ProblemSchema {
    nx: usize,
    nf: usize,
    ng: usize,
    ranges: Vec<VariableRange>,
    analysis: AnalysisSpec,
    eval_mask: Vec<bool>,
    userdata: UserData,
    repair: Option<RepairFn>,
    plot: Option<PlotFn>,
}

impl ProblemSchema {
    /// Starts building a schema from its required parts.
    pub fn builder(
        nx: usize,
        nf: usize,
        ng: usize,
        ranges: Vec<VariableRange>,
        analysis: impl Into<AnalysisSpec>,
    ) -> ProblemSchemaBuilder {
        ProblemSchemaBuilder {
            nx,
            nf,
            ng,
            ranges,
            analysis: analysis.into(),
            eval_mask: None,
            userdata: UserData::none(),
            repair: None,
            plot: None,
        }
    }

    /// Number of design variables.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of objectives.
    pub fn nf(&self) -> usize {
        self.nf
    }

    /// Number of constraints.
    pub fn ng(&self) -> usize {
        self.ng
    }

    /// Total number of responses (`nf + ng`).
    pub fn n_responses(&self) -> usize {
        self.nf + self.ng
    }

    /// Variable ranges, one per design variable.
    pub fn ranges(&self) -> &[VariableRange] {
        &self.ranges
    }

    /// How responses are computed.
    pub fn analysis(&self) -> &AnalysisSpec {
        &self.analysis
    }

    /// Resolved evaluation mask, length `nf + ng`; `true` = externally supplied.
    pub fn eval_mask(&self) -> &[bool] {
        &self.eval_mask
    }

    /// Whether `response` is supplied externally rather than computed.
    pub fn is_masked(&self, response: ResponseIndex) -> bool {
        self.eval_mask
            .get(response.flat(self.nf))
            .copied()
            .unwrap_or(false)
    }

    /// Number of externally supplied responses.
    pub fn masked_count(&self) -> usize {
        self.eval_mask.iter().filter(|&&m| m).count()
    }

    /// Opaque user payload shared read-only with every hook.
    pub fn userdata(&self) -> &UserData {
        &self.userdata
    }

    /// Pre-repair hook, if installed.
    pub fn repair_fn(&self) -> Option<&RepairFn> {
        self.repair.as_ref()
    }

    /// Whether a pre-repair hook is installed.
    pub fn has_repair(&self) -> bool {
        self.repair.is_some()
    }

    /// Plot hook, if installed.
    pub fn plot_fn(&self) -> Option<&PlotFn> {
        self.plot.as_ref()
    }

    /// Whether a plot hook is installed.
    pub fn has_plot(&self) -> bool {
        self.plot.is_some()
    }

    /// Creates the per-call state for candidate `pop_id` of generation `gen_id`.
    ///
    /// The state's userdata aliases this schema's.
    pub fn state(&self, gen_id: usize, pop_id: usize) -> EvaluationState<'_> {
        EvaluationState::new(gen_id, pop_id, &self.userdata)
    }

    /// Draws a random in-domain candidate, one value per range.
    pub fn sample_candidate<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.ranges.iter().map(|r| r.sample(rng)).collect()
    }

    /// Runs the plot hook if one is configured.
    ///
    /// Hook failures are logged and swallowed.
    pub fn plot(&self, x: &[f64], state: &EvaluationState<'_>, context: &mut PlotContext) {
        if let Some(plot) = &self.plot {
            PlotHook::invoke(plot, x, state, context);
        }
    }
}

impl fmt::Debug for ProblemSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemSchema")
            .field("nx", &self.nx)
            .field("nf", &self.nf)
            .field("ng", &self.ng)
            .field("ranges", &self.ranges)
            .field("analysis", &self.analysis)
            .field("eval_mask", &self.eval_mask)
            .field("userdata", &self.userdata)
            .field("repair", &self.repair.is_some())
            .field("plot", &self.plot.is_some())
            .finish()
    }
}

/// Builder for [`ProblemSchema`]; optional parts are independent of each other.
pub struct ProblemSchemaBuilder {
    nx: usize,
    nf: usize,
    ng: usize,
    ranges: Vec<VariableRange>,
    analysis: AnalysisSpec,
    eval_mask: Option<Vec<u8>>,
    userdata: UserData,
    repair: Option<RepairFn>,
    plot: Option<PlotFn>,
}

impl ProblemSchemaBuilder {
    /// Sets the evaluation mask: one `0`/`1` entry per objective, then per constraint.
    pub fn with_eval_mask(mut self, mask: impl Into<Vec<u8>>) -> Self {
        self.eval_mask = Some(mask.into());
        self
    }

    /// Attaches opaque userdata shared with every hook.
    pub fn with_userdata<T: Any + Send + Sync>(mut self, data: T) -> Self {
        self.userdata = UserData::new(data);
        self
    }

    /// Attaches already-shared userdata.
    pub fn with_shared_userdata(mut self, data: UserData) -> Self {
        self.userdata = data;
        self
    }

    /// Installs a pre-evaluation repair function.
    pub fn with_repair<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64], &EvaluationState<'_>) -> Result<Vec<f64>, BoxError> + Send + Sync + 'static,
    {
        self.repair = Some(Box::new(f));
        self
    }

    /// Installs a plot function.
    pub fn with_plot<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64], &EvaluationState<'_>, &mut PlotContext) -> Result<(), BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.plot = Some(Box::new(f));
        self
    }

    /// Validates and freezes the schema.
    ///
    /// Checks, in order: dimensions, range count, mask length and values,
    /// then (single-set analysis only) that every unmasked response has a
    /// callable and that no callable is left over.
    pub fn build(self) -> Result<ProblemSchema, SchemaError> {
        let Self {
            nx,
            nf,
            ng,
            ranges,
            analysis,
            eval_mask,
            userdata,
            repair,
            plot,
        } = self;

        if nx == 0 {
            return Err(SchemaError::InvalidDimensions { nx, nf, ng });
        }
        if ranges.len() != nx {
            return Err(SchemaError::RangeCountMismatch {
                expected: nx,
                actual: ranges.len(),
            });
        }

        let eval_mask = resolve_mask(eval_mask, nf + ng)?;

        if let AnalysisSpec::SingleSet(set) = &analysis {
            check_single_set(set, &eval_mask, nf, ng)?;
        }

        debug!(
            "built problem schema: nx={nx}, nf={nf}, ng={ng}, analysis={analysis:?}, masked={}",
            eval_mask.iter().filter(|&&m| m).count()
        );

        Ok(ProblemSchema {
            nx,
            nf,
            ng,
            ranges,
            analysis,
            eval_mask,
            userdata,
            repair,
            plot,
        })
    }
}

fn resolve_mask(mask: Option<Vec<u8>>, n: usize) -> Result<Vec<bool>, SchemaError> {
    let Some(mask) = mask else {
        return Ok(vec![false; n]);
    };
    if mask.len() != n {
        return Err(SchemaError::MaskLength {
            expected: n,
            actual: mask.len(),
        });
    }
    mask.iter()
        .enumerate()
        .map(|(index, &value)| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SchemaError::MaskValue { index, value }),
        })
        .collect()
}

fn check_single_set(
    set: &SingleSet,
    mask: &[bool],
    nf: usize,
    ng: usize,
) -> Result<(), SchemaError> {
    for (flat, &masked) in mask.iter().enumerate() {
        let response = ResponseIndex::from_flat(flat, nf);
        if !masked && set.get(response).is_none() {
            return Err(SchemaError::MissingAnalysisFn { response });
        }
    }
    if set.objective_slots() > nf {
        return Err(SchemaError::ExcessAnalysisFns {
            kind: "objective",
            declared: nf,
            supplied: set.objective_slots(),
        });
    }
    if set.constraint_slots() > ng {
        return Err(SchemaError::ExcessAnalysisFns {
            kind: "constraint",
            declared: ng,
            supplied: set.constraint_slots(),
        });
    }
    Ok(())
}
