use std::path::Path;

use fcplan_solver::{SolveError, Solver};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::OptimizerConfig;
use crate::network::Network;
use crate::plan::Plan;
use crate::report::{ReportError, write_report};
use crate::transport::{ModelError, TransportModel};
use crate::workbook::{WorkbookError, read_network};

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Read `input`, solve the transportation LP and write the report to `output`.
///
/// Nothing is written unless the solve succeeds.
pub fn optimize(input: &Path, output: &Path, config: &OptimizerConfig) -> Result<Plan, OptimizeError> {
    let network = read_network(input)?;
    info!(
        input = %input.display(),
        fcs = network.fcs.len(),
        regions = network.regions.len(),
        items = network.items.len(),
        "input loaded"
    );

    let plan = plan_network(&network, config)?;

    write_report(&plan, output)?;
    info!(output = %output.display(), "results written");
    Ok(plan)
}

/// Build and solve the model of an in-memory network.
pub fn plan_network(network: &Network, config: &OptimizerConfig) -> Result<Plan, OptimizeError> {
    let model = TransportModel::build(network)?;
    info!(
        variables = model.lp_problem.num_variables(),
        constraints = model.lp_problem.num_constraints(),
        "model built"
    );

    let solution = Solver::new()
        .with_verbose(config.solver_output)
        .solve(&model.lp_problem)?;
    info!(objective = solution.objective_value, "solved");

    for violation in solution.violations(&model.lp_problem, config.verify_tolerance) {
        warn!(
            constraint = %violation.constraint,
            amount = violation.violation_amount,
            "{}",
            violation.description
        );
    }

    Ok(Plan::extract(network, &model, &solution, config))
}
