//! Visualization hook.
//!
//! The driver decides when to plot (typically once per generation with the
//! best candidate). Plot failures never abort a run: both returned errors
//! and panics are caught here, logged, and counted on the [`PlotContext`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::warn;

use crate::error::BoxError;
use crate::eval::EvaluationState;

/// Explicit rendering context passed to every plot call.
///
/// Replaces any process-wide "current figure": each driver owns its
/// context and hands it to the hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlotContext {
    /// Target figure.
    pub figure_id: u32,
    /// Optional figure title.
    pub title: Option<String>,
    /// Number of plot calls that failed so far.
    pub failures: usize,
}

impl PlotContext {
    /// Creates a context targeting `figure_id`.
    pub fn new(figure_id: u32) -> Self {
        Self {
            figure_id,
            ..Self::default()
        }
    }

    /// Sets the figure title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Invokes plot functions without letting them fail the caller.
pub struct PlotHook;

impl PlotHook {
    /// Calls `plot`; any error or panic is logged and counted, never propagated.
    pub fn invoke<F>(plot: &F, x: &[f64], state: &EvaluationState<'_>, context: &mut PlotContext)
    where
        F: Fn(&[f64], &EvaluationState<'_>, &mut PlotContext) -> Result<(), BoxError> + ?Sized,
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| plot(x, state, context)));
        let reason = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };
        context.failures += 1;
        warn!(
            "plot hook failed on figure {} (gen={}, pop={}): {reason}",
            context.figure_id,
            state.gen_id(),
            state.pop_id()
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
