//! HiGHS-backed solver via `good_lp`.

use std::time::Instant;

use good_lp::solvers::highs::highs;
use good_lp::{
    DualValues, Expression, ResolutionError, Solution as _, SolutionWithDual, SolverModel, Variable,
    constraint, variable, variables,
};
use tracing::debug;

use crate::error::SolveError;
use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{Analysis, ShadowPrice, Solution};

/// Slack allowed when a problem without variables is checked directly
const EMPTY_PROBLEM_TOLERANCE: f64 = 1e-9;

/// Continuous LP solver with dual extraction
#[derive(Debug, Default)]
pub struct Solver {
    /// Let HiGHS print its log to the console
    verbose: bool,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Solve the LP problem. All variables are continuous and non-negative.
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        self.check_dimensions(problem)?;

        let n = problem.num_variables();
        if n == 0 {
            return self.solve_empty(problem);
        }

        let minimize = problem.objective.minimize;
        let mut vars = variables!();
        let columns: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0))).collect();

        let objective: Expression = columns
            .iter()
            .zip(problem.objective.coefficients.iter())
            .map(|(&v, &c)| c * v)
            .sum();

        let unsolved = if minimize {
            vars.minimise(objective)
        } else {
            vars.maximise(objective)
        };
        let mut model = unsolved.using(highs);
        model.set_verbose(self.verbose);

        let mut rows = Vec::with_capacity(problem.num_constraints());
        for c in &problem.constraints {
            let lhs: Expression = c.terms.iter().map(|&(col, coef)| coef * columns[col]).sum();
            let rhs = c.rhs;
            let reference = match c.op {
                ConstraintOp::Le => model.add_constraint(constraint!(lhs <= rhs)),
                ConstraintOp::Ge => model.add_constraint(constraint!(lhs >= rhs)),
                ConstraintOp::Eq => model.add_constraint(constraint!(lhs == rhs)),
            };
            rows.push(reference);
        }

        debug!(
            variables = n,
            constraints = problem.num_constraints(),
            "solving LP with HiGHS"
        );
        let started = Instant::now();
        let mut solved = match model.solve() {
            Ok(solved) => solved,
            Err(ResolutionError::Infeasible) => return Err(SolveError::Infeasible),
            Err(ResolutionError::Unbounded) => return Err(SolveError::Unbounded),
            Err(e) => return Err(SolveError::Backend(e.to_string())),
        };
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "HiGHS finished");

        let values: Vec<f64> = columns.iter().map(|&v| solved.value(v)).collect();
        let objective_value = problem.evaluate(&values);

        let duals = solved.compute_dual();
        let shadow_prices = problem
            .constraints
            .iter()
            .zip(rows)
            .enumerate()
            .map(|(row, (c, reference))| {
                let value = orient_dual(duals.dual(reference), c.op, minimize);
                ShadowPrice {
                    constraint: c.name.clone(),
                    row,
                    value,
                }
            })
            .collect();

        Ok(Solution {
            values,
            objective_value,
            analysis: Analysis { shadow_prices },
        })
    }

    fn check_dimensions(&self, problem: &LpProblem) -> Result<(), SolveError> {
        let n = problem.num_variables();
        let found = problem.objective.coefficients.len();
        if found != n {
            return Err(SolveError::DimensionMismatch { expected: n, found });
        }
        for c in &problem.constraints {
            if let Some(&(index, _)) = c.terms.iter().find(|&&(col, _)| col >= n) {
                return Err(SolveError::UnknownVariable {
                    constraint: c.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }

    /// Without variables every left-hand side is zero; the problem is either
    /// trivially optimal or infeasible.
    fn solve_empty(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        let solution = Solution {
            values: Vec::new(),
            objective_value: 0.0,
            analysis: Analysis {
                shadow_prices: problem
                    .constraints
                    .iter()
                    .enumerate()
                    .map(|(row, c)| ShadowPrice {
                        constraint: c.name.clone(),
                        row,
                        value: 0.0,
                    })
                    .collect(),
            },
        };
        if solution.violations(problem, EMPTY_PROBLEM_TOLERANCE).is_empty() {
            Ok(solution)
        } else {
            Err(SolveError::Infeasible)
        }
    }
}

/// Express a backend dual as d(objective)/d(rhs).
///
/// Backends disagree on the sign of row duals. For a minimization a `<=` row can
/// only lower the objective when relaxed and a `>=` row can only raise it, so the
/// sign follows from the row sense; maximization mirrors this.
fn orient_dual(raw: f64, op: ConstraintOp, minimize: bool) -> f64 {
    match (op, minimize) {
        (ConstraintOp::Le, true) | (ConstraintOp::Ge, false) => -raw.abs(),
        (ConstraintOp::Ge, true) | (ConstraintOp::Le, false) => raw.abs(),
        (ConstraintOp::Eq, _) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpProblem;

    #[test]
    fn test_simple_maximization() {
        // Maximize: 3x + 2y
        // Subject to:
        //   x + y <= 4
        //   x <= 3
        //   y <= 3
        //   x, y >= 0
        // Optimal: x=3, y=1, obj=11
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![3.0, 2.0], false);
        problem.add_constraint("sum", vec![(0, 1.0), (1, 1.0)], ConstraintOp::Le, 4.0);
        problem.add_constraint("x_max", vec![(0, 1.0)], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![(1, 1.0)], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 11.0).abs() < 1e-6, "obj = {} (expected 11)", solution.objective_value);

        // One more unit of "sum" buys one more y: +2
        let sum_price = solution.shadow_price(0).unwrap();
        assert!((sum_price - 2.0).abs() < 1e-6, "sum shadow price = {}", sum_price);
    }

    #[test]
    fn test_minimization_with_ge() {
        // Minimize: 2x + 3y
        // Subject to:
        //   x + y >= 4
        //   x <= 3
        //   y <= 3
        // Optimal: x=3, y=1, obj=9
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.set_objective(vec![2.0, 3.0], true);
        problem.add_constraint("sum", vec![(0, 1.0), (1, 1.0)], ConstraintOp::Ge, 4.0);
        problem.add_constraint("x_max", vec![(0, 1.0)], ConstraintOp::Le, 3.0);
        problem.add_constraint("y_max", vec![(1, 1.0)], ConstraintOp::Le, 3.0);

        let solution = Solver::new().solve(&problem).unwrap();

        assert!((solution.values[0] - 3.0).abs() < 1e-6, "x = {} (expected 3)", solution.values[0]);
        assert!((solution.values[1] - 1.0).abs() < 1e-6, "y = {} (expected 1)", solution.values[1]);
        assert!((solution.objective_value - 9.0).abs() < 1e-6, "obj = {} (expected 9)", solution.objective_value);

        // Demand one more unit: it has to come from y at 3
        assert!((solution.shadow_price(0).unwrap() - 3.0).abs() < 1e-6);
        // One more unit of cheap x replaces one y: 2 - 3 = -1
        assert!((solution.shadow_price(1).unwrap() + 1.0).abs() < 1e-6);
        // y_max is slack
        assert!(solution.shadow_price(2).unwrap().abs() < 1e-6);
        assert_eq!(solution.analysis.shadow_prices[1].constraint, "x_max");
        assert_eq!(solution.analysis.shadow_prices[1].row, 1);
    }

    #[test]
    fn test_infeasible() {
        // x >= 5
        // x <= 3
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![(0, 1.0)], ConstraintOp::Ge, 5.0);
        problem.add_constraint("upper", vec![(0, 1.0)], ConstraintOp::Le, 3.0);

        let result = Solver::new().solve(&problem);

        assert_eq!(result.unwrap_err(), SolveError::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], false);
        problem.add_constraint("lower", vec![(0, 1.0)], ConstraintOp::Ge, 1.0);

        let result = Solver::new().solve(&problem);

        // HiGHS presolve can stop at "unbounded or infeasible", which good_lp
        // reports as Infeasible. Either way no solution comes back.
        assert!(
            matches!(result, Err(SolveError::Unbounded) | Err(SolveError::Infeasible)),
            "{:?}",
            result
        );
    }

    #[test]
    fn test_verbose_solve() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0], true);
        problem.add_constraint("lower", vec![(0, 1.0)], ConstraintOp::Ge, 2.0);

        let solution = Solver::new().with_verbose(true).solve(&problem).unwrap();

        assert!((solution.values[0] - 2.0).abs() < 1e-6);
        assert!((solution.shadow_price(0).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_checks() {
        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.set_objective(vec![1.0, 2.0], true);
        assert_eq!(
            Solver::new().solve(&problem).unwrap_err(),
            SolveError::DimensionMismatch { expected: 1, found: 2 }
        );

        let mut problem = LpProblem::new(vec!["x".to_string()]);
        problem.add_constraint("bad", vec![(3, 1.0)], ConstraintOp::Le, 1.0);
        assert!(matches!(
            Solver::new().solve(&problem),
            Err(SolveError::UnknownVariable { index: 3, .. })
        ));
    }

    #[test]
    fn test_empty_problem() {
        let mut problem = LpProblem::new(vec![]);
        problem.add_constraint("trivial", vec![], ConstraintOp::Ge, 0.0);
        let solution = Solver::new().solve(&problem).unwrap();
        assert!(solution.values.is_empty());
        assert_eq!(solution.objective_value, 0.0);

        problem.add_constraint("impossible", vec![], ConstraintOp::Ge, 1.0);
        assert_eq!(Solver::new().solve(&problem).unwrap_err(), SolveError::Infeasible);
    }

    #[test]
    fn test_orient_dual() {
        assert_eq!(orient_dual(2.0, ConstraintOp::Le, true), -2.0);
        assert_eq!(orient_dual(-2.0, ConstraintOp::Ge, true), 2.0);
        assert_eq!(orient_dual(-2.0, ConstraintOp::Le, false), 2.0);
        assert_eq!(orient_dual(-2.0, ConstraintOp::Eq, true), -2.0);
    }
}
