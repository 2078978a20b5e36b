use std::cmp::Ordering;

use crate::problem::{ConstraintOp, LpProblem};

/// The optimal solution of an LP problem
#[derive(Debug, Clone)]
pub struct Solution {
    /// Optimal values for each variable
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Dual information
    pub analysis: Analysis,
}

/// Sensitivity information for the optimal solution
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Shadow prices (dual values), one per constraint in row order.
    /// The value is the change in objective per unit increase of the RHS.
    pub shadow_prices: Vec<ShadowPrice>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Row index in `LpProblem::constraints`
    pub row: usize,
    /// Shadow price value
    pub value: f64,
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

impl Solution {
    /// Shadow price of the constraint at `row`.
    pub fn shadow_price(&self, row: usize) -> Option<f64> {
        self.analysis.shadow_prices.get(row).map(|sp| sp.value)
    }

    /// Constraints of `problem` that these values miss by more than `tolerance`,
    /// worst first.
    pub fn violations(&self, problem: &LpProblem, tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = problem
            .constraints
            .iter()
            .filter_map(|c| {
                let actual = c.lhs(&self.values);
                let shortfall = match c.op {
                    ConstraintOp::Le => actual - c.rhs,
                    ConstraintOp::Ge => c.rhs - actual,
                    ConstraintOp::Eq => (actual - c.rhs).abs(),
                };
                if shortfall <= tolerance {
                    return None;
                }
                let description = match c.op {
                    ConstraintOp::Le => format!("{} exceeds maximum of {:.2} by {:.2}", c.name, c.rhs, shortfall),
                    ConstraintOp::Ge => format!("{} is below minimum of {:.2} by {:.2}", c.name, c.rhs, shortfall),
                    ConstraintOp::Eq => format!("{} requires exactly {:.2} but got {:.2}", c.name, c.rhs, actual),
                };
                Some(ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual,
                    violation_amount: shortfall,
                    description,
                })
            })
            .collect();

        violations.sort_by(|a, b| {
            b.violation_amount
                .partial_cmp(&a.violation_amount)
                .unwrap_or(Ordering::Equal)
        });

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_problem() -> LpProblem {
        let mut problem = LpProblem::new(vec!["x".to_string(), "y".to_string()]);
        problem.add_constraint("cap", vec![(0, 1.0), (1, 1.0)], ConstraintOp::Le, 4.0);
        problem.add_constraint("floor", vec![(0, 1.0)], ConstraintOp::Ge, 2.0);
        problem.add_constraint("fix", vec![(1, 1.0)], ConstraintOp::Eq, 1.0);
        problem
    }

    fn solution_with(values: Vec<f64>) -> Solution {
        Solution {
            values,
            objective_value: 0.0,
            analysis: Analysis::default(),
        }
    }

    #[test]
    fn test_no_violations_for_feasible_point() {
        let problem = two_var_problem();
        let solution = solution_with(vec![3.0, 1.0]);
        assert!(solution.violations(&problem, 1e-9).is_empty());
    }

    #[test]
    fn test_violations_sorted_worst_first() {
        let problem = two_var_problem();
        // cap: 6 > 4 by 2, floor satisfied, fix: 5 vs 1 off by 4
        let solution = solution_with(vec![1.0, 5.0]);
        let violations = solution.violations(&problem, 1e-9);

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].constraint, "fix");
        assert!((violations[0].violation_amount - 4.0).abs() < 1e-12);
        assert_eq!(violations[1].constraint, "cap");
        assert_eq!(violations[2].constraint, "floor");
        assert!(violations[2].description.contains("below minimum"));
    }

    #[test]
    fn test_tolerance_absorbs_noise() {
        let problem = two_var_problem();
        let solution = solution_with(vec![3.0 + 1e-10, 1.0 - 1e-10]);
        assert!(solution.violations(&problem, 1e-6).is_empty());
    }

    #[test]
    fn test_shadow_price_by_row() {
        let mut solution = solution_with(vec![3.0, 1.0]);
        solution.analysis.shadow_prices = vec![
            ShadowPrice { constraint: "cap".to_string(), row: 0, value: -2.5 },
            ShadowPrice { constraint: "floor".to_string(), row: 1, value: 0.0 },
        ];
        assert_eq!(solution.shadow_price(0), Some(-2.5));
        assert_eq!(solution.shadow_price(1), Some(0.0));
        assert_eq!(solution.shadow_price(2), None);
    }
}
