use fcplan_solver::{ConstraintOp, LpProblem};
use thiserror::Error;

use crate::network::{Label, Network};

/// Transportation cost per unit of shipping weight per unit of distance.
pub const COST_PER_WEIGHT_DISTANCE: f64 = 1.38;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("no distance from FC {fc} to region {region}")]
    MissingDistance { fc: Label, region: Label },
    #[error("no demand for item {item} in region {region}")]
    MissingDemand { item: Label, region: Label },
}

/// The transportation LP of a network.
///
/// Variable x[i,j,k] ships item k from FC i to region j and sits at column
/// `(i * regions + j) * items + k`. Capacity rows come first, one per FC in
/// input order, followed by the demand rows ordered item-major.
#[derive(Debug, Clone)]
pub struct TransportModel {
    pub lp_problem: LpProblem,
    /// Row of each FC's capacity constraint, indexed like `Network::fcs`
    pub capacity_rows: Vec<usize>,
    n_regions: usize,
    n_items: usize,
}

impl TransportModel {
    pub fn build(network: &Network) -> Result<Self, ModelError> {
        let n_regions = network.regions.len();
        let n_items = network.items.len();

        let mut variables = Vec::with_capacity(network.num_shipment_variables());
        let mut costs = Vec::with_capacity(network.num_shipment_variables());
        for fc in &network.fcs {
            for region in &network.regions {
                let distance = network.distances.get(&region.id, &fc.name).ok_or_else(|| {
                    ModelError::MissingDistance {
                        fc: fc.name.clone(),
                        region: region.id.clone(),
                    }
                })?;
                for item in &network.items {
                    variables.push(format!("x[{},{},{}]", fc.name, region.id, item.id));
                    costs.push(COST_PER_WEIGHT_DISTANCE * item.shipping_weight * distance);
                }
            }
        }

        let mut lp = LpProblem::new(variables);
        lp.set_objective(costs, true);

        let mut model = Self {
            lp_problem: lp,
            capacity_rows: Vec::with_capacity(network.fcs.len()),
            n_regions,
            n_items,
        };

        for (i, fc) in network.fcs.iter().enumerate() {
            let mut terms = Vec::with_capacity(n_regions * n_items);
            for j in 0..n_regions {
                for (k, item) in network.items.iter().enumerate() {
                    terms.push((model.column(i, j, k), item.storage_size));
                }
            }
            let row = model.lp_problem.add_constraint(
                format!("capacity[{}]", fc.name),
                terms,
                ConstraintOp::Le,
                fc.capacity,
            );
            model.capacity_rows.push(row);
        }

        for (k, item) in network.items.iter().enumerate() {
            for (j, region) in network.regions.iter().enumerate() {
                let required = network.demand.get(&item.id, &region.id).ok_or_else(|| {
                    ModelError::MissingDemand {
                        item: item.id.clone(),
                        region: region.id.clone(),
                    }
                })?;
                let terms = (0..network.fcs.len()).map(|i| (model.column(i, j, k), 1.0)).collect();
                model.lp_problem.add_constraint(
                    format!("demand[{},{}]", item.id, region.id),
                    terms,
                    ConstraintOp::Ge,
                    required,
                );
            }
        }

        Ok(model)
    }

    /// Column of x[fc, region, item] by position in the network tables.
    pub fn column(&self, fc: usize, region: usize, item: usize) -> usize {
        (fc * self.n_regions + region) * self.n_items + item
    }
}
