//! Evaluation results and the surrogate seam.

use super::state::EvaluationState;
use crate::error::{BoxError, DispatchError};
use crate::schema::ResponseIndex;

/// Predicts responses that the evaluation mask marks as externally supplied.
///
/// Model fitting and prediction live outside this crate; implementors wrap
/// whatever surrogate the driver trains.
pub trait ResponseSurrogate: Send + Sync {
    /// Predicts `response` at candidate `x`.
    fn predict(
        &self,
        response: ResponseIndex,
        x: &[f64],
        state: &EvaluationState<'_>,
    ) -> Result<f64, BoxError>;
}

/// Responses of one candidate.
///
/// `None` marks a slot left for the surrogate (masked response in
/// single-set mode). Produced per call and owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    /// Objectives, length `nf`.
    pub f: Vec<Option<f64>>,
    /// Constraints, length `ng`.
    pub g: Vec<Option<f64>>,
    /// Final candidate, possibly repaired by the analysis.
    pub x_final: Vec<f64>,
}

impl EvaluationResult {
    /// Value of `response`, if computed or filled.
    pub fn response(&self, response: ResponseIndex) -> Option<f64> {
        match response {
            ResponseIndex::Objective(i) => self.f.get(i).copied().flatten(),
            ResponseIndex::Constraint(j) => self.g.get(j).copied().flatten(),
        }
    }

    /// Stores `value` for `response`. Returns `false` if the slot does not exist.
    pub fn set_response(&mut self, response: ResponseIndex, value: f64) -> bool {
        let slot = match response {
            ResponseIndex::Objective(i) => self.f.get_mut(i),
            ResponseIndex::Constraint(j) => self.g.get_mut(j),
        };
        match slot {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Responses still waiting for an external value, objectives first.
    pub fn missing(&self) -> Vec<ResponseIndex> {
        let f = self
            .f
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| ResponseIndex::Objective(i));
        let g = self
            .g
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(j, _)| ResponseIndex::Constraint(j));
        f.chain(g).collect()
    }

    /// Whether every response has a value.
    pub fn is_complete(&self) -> bool {
        self.f.iter().chain(&self.g).all(Option::is_some)
    }

    /// Dense objectives, once all are present.
    pub fn objectives(&self) -> Option<Vec<f64>> {
        self.f.iter().copied().collect()
    }

    /// Dense constraints, once all are present.
    pub fn constraints(&self) -> Option<Vec<f64>> {
        self.g.iter().copied().collect()
    }

    /// All constraints present and `>= 0`.
    pub fn is_feasible(&self) -> bool {
        self.g.iter().all(|g| matches!(g, Some(v) if *v >= 0.0))
    }

    /// Fills every missing slot from `surrogate`, evaluated at `x_final`.
    ///
    /// Returns the number of slots filled. Predictions are committed only if
    /// all of them succeed; on error the result is left unchanged.
    pub fn fill_external<S: ResponseSurrogate + ?Sized>(
        &mut self,
        surrogate: &S,
        state: &EvaluationState<'_>,
    ) -> Result<usize, DispatchError> {
        let predicted = self
            .missing()
            .into_iter()
            .map(|response| {
                surrogate
                    .predict(response, &self.x_final, state)
                    .map(|value| (response, value))
                    .map_err(|source| DispatchError::Response { response, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for &(response, value) in &predicted {
            self.set_response(response, value);
        }
        Ok(predicted.len())
    }
}
