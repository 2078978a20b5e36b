mod error;
mod highs;
mod problem;
mod solution;

pub use error::SolveError;
pub use highs::Solver;
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective};
pub use solution::{Analysis, ConstraintViolation, ShadowPrice, Solution};
