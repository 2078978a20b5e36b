pub mod config;
pub mod network;
pub mod optimize;
pub mod plan;
pub mod report;
pub mod transport;
pub mod workbook;

pub use config::OptimizerConfig;
pub use network::{
    DemandMatrix, DistanceMatrix, FulfillmentCenter, Item, Label, LabeledMatrix, Network, Region,
};
pub use optimize::{OptimizeError, optimize, plan_network};
pub use plan::{CapacityPrice, Plan, Shipment, shortlist};
pub use report::{ReportError, write_report};
pub use transport::{COST_PER_WEIGHT_DISTANCE, ModelError, TransportModel};
pub use workbook::{WorkbookError, read_network, write_network};
