use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("the problem is infeasible: no solution satisfies all constraints")]
    Infeasible,
    #[error("the problem is unbounded: it has no finite optimal solution")]
    Unbounded,
    #[error("objective has {found} coefficients but the problem has {expected} variables")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("constraint {constraint} references unknown variable {index}")]
    UnknownVariable { constraint: String, index: usize },
    #[error("solver backend failed: {0}")]
    Backend(String),
}
