use std::cmp::Ordering;

use fcplan_solver::Solution;

use crate::config::OptimizerConfig;
use crate::network::{Label, Network};
use crate::transport::TransportModel;

/// A positive quantity of one item sent from an FC to a region
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub fc: Label,
    pub region: Label,
    pub item: Label,
    pub quantity: f64,
}

/// Shadow price of an FC's capacity constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityPrice {
    pub fc: Label,
    pub shadow_price: f64,
}

/// Result of one planning run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Minimum total transportation cost
    pub objective_value: f64,
    /// Shipments above the threshold, in (FC, region, item) order
    pub shipments: Vec<Shipment>,
    /// Most negative capacity shadow prices first
    pub capacity_shortlist: Vec<CapacityPrice>,
    pub total_shipped: f64,
    pub num_fcs: usize,
    pub num_regions: usize,
    pub num_items: usize,
    pub num_variables: usize,
    pub num_constraints: usize,
}

impl Plan {
    pub fn extract(
        network: &Network,
        model: &TransportModel,
        solution: &Solution,
        config: &OptimizerConfig,
    ) -> Self {
        let mut shipments = Vec::new();
        for (i, fc) in network.fcs.iter().enumerate() {
            for (j, region) in network.regions.iter().enumerate() {
                for (k, item) in network.items.iter().enumerate() {
                    let quantity = solution.values[model.column(i, j, k)];
                    if quantity > config.shipment_threshold {
                        shipments.push(Shipment {
                            fc: fc.name.clone(),
                            region: region.id.clone(),
                            item: item.id.clone(),
                            quantity,
                        });
                    }
                }
            }
        }

        let prices = network
            .fcs
            .iter()
            .zip(&model.capacity_rows)
            .map(|(fc, &row)| CapacityPrice {
                fc: fc.name.clone(),
                shadow_price: solution.shadow_price(row).unwrap_or(0.0),
            })
            .collect();

        Self {
            objective_value: solution.objective_value,
            total_shipped: shipments.iter().map(|s| s.quantity).sum(),
            shipments,
            capacity_shortlist: shortlist(prices, config.shortlist_len),
            num_fcs: network.fcs.len(),
            num_regions: network.regions.len(),
            num_items: network.items.len(),
            num_variables: model.lp_problem.num_variables(),
            num_constraints: model.lp_problem.num_constraints(),
        }
    }
}

/// Sort ascending by shadow price and keep the first `len`.
/// Ties keep FC input order.
pub fn shortlist(mut prices: Vec<CapacityPrice>, len: usize) -> Vec<CapacityPrice> {
    prices.sort_by(|a, b| {
        a.shadow_price
            .partial_cmp(&b.shadow_price)
            .unwrap_or(Ordering::Equal)
    });
    prices.truncate(len);
    prices
}
