//! Problem definition contract for evolutionary optimization.
//!
//! Defines how a driver (GA, NSGA-II, surrogate-assisted search, ...) talks
//! to a user problem:
//!
//! - **Variables**: typed, validated design-variable domains
//!   ([`variable::VariableRange`]: real, integer, discrete set).
//! - **Schema**: dimensions, ranges, analysis mode, evaluation mask,
//!   userdata, repair and plot hooks ([`schema::ProblemSchema`]).
//! - **Evaluation**: per-candidate state, analysis dispatch with surrogate
//!   masking, pre/post repair ordering, batch evaluation ([`eval`]).
//! - **Plotting**: a non-fatal visualization hook with an explicit
//!   rendering context ([`plot`]).
//!
//! # Architecture
//!
//! The search loop, surrogate fitting and rendering are collaborators: this
//! crate only decides how one candidate is typed, validated, repaired and
//! evaluated. Evaluation is stateless per call, so candidates of one
//! generation can be evaluated in parallel against the same schema.
//!
//! # Example
//!
//! ```
//! use u_evoprob::eval::{EvalConfig, Evaluator};
//! use u_evoprob::schema::{ProblemSchema, SingleSet};
//! use u_evoprob::variable::VariableRange;
//!
//! // One objective from a surrogate, one constraint evaluated for real.
//! let analysis = SingleSet::new().with_constraint(0, |x, _| Ok(1.0 - x[0] - x[1]));
//! let ranges = vec![
//!     VariableRange::real(0.0, 1.0).unwrap(),
//!     VariableRange::integer(0, 3).unwrap(),
//! ];
//! let schema = ProblemSchema::builder(2, 1, 1, ranges, analysis)
//!     .with_eval_mask(vec![1, 0])
//!     .build()
//!     .unwrap();
//!
//! let state = schema.state(0, 0);
//! let config = EvalConfig::default();
//! let result = Evaluator::evaluate(&schema, &[0.25, 0.0], &state, &config).unwrap();
//! assert_eq!(result.f, vec![None]);
//! assert_eq!(result.g, vec![Some(0.75)]);
//! ```

pub mod error;
pub mod eval;
pub mod plot;
pub mod schema;
pub mod variable;
