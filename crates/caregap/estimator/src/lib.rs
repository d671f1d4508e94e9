//! Closure-probability estimation for care gaps
//!
//! The workflow engine only ever talks to a [`ResilientEstimator`]. It wraps
//! whichever [`ClosureEstimator`] [`select_estimator`] picked at
//! construction, bounds each call by a timeout, and substitutes the
//! [`HeuristicEstimator`] whenever the primary fails. Estimation therefore
//! never surfaces an error to the caller.

#![deny(unsafe_code)]

mod error;
mod estimate;
mod heuristic;
mod logistic;
mod monitor;
mod resilient;
mod select;

pub use error::*;
pub use estimate::*;
pub use heuristic::*;
pub use logistic::*;
pub use monitor::*;
pub use resilient::*;
pub use select::*;
