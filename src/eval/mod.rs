//! Candidate evaluation.
//!
//! The per-candidate flow is:
//!
//! ```text
//! EvaluationState → RepairPipeline (pre) → AnalysisDispatcher → EvaluationResult
//! ```
//!
//! # Key Types
//!
//! - [`EvaluationState`]: per-call context (generation, population slot, userdata)
//! - [`AnalysisDispatcher`]: computes responses, honoring the evaluation mask
//! - [`RepairPipeline`]: optional pre-evaluation repair
//! - [`Evaluator`]: full pipeline for one candidate or a whole generation
//! - [`EvaluationResult`]: responses plus the final (possibly repaired) candidate
//! - [`ResponseSurrogate`]: seam for filling externally supplied responses
//! - [`EvalConfig`]: tolerance, time limit, parallelism

mod config;
mod dispatcher;
mod guard;
mod repair;
mod result;
mod runner;
mod state;

pub use config::EvalConfig;
pub use dispatcher::AnalysisDispatcher;
pub use repair::RepairPipeline;
pub use result::{EvaluationResult, ResponseSurrogate};
pub use runner::Evaluator;
pub use state::EvaluationState;
