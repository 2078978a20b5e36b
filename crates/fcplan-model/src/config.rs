/// Knobs of a planning run. The cost factor is a constant, see
/// [`COST_PER_WEIGHT_DISTANCE`](crate::COST_PER_WEIGHT_DISTANCE).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerConfig {
    /// Number of capacity constraints reported as expansion candidates
    pub shortlist_len: usize,
    /// Shipments must be strictly greater than this to be reported
    pub shipment_threshold: f64,
    /// Slack allowed when re-checking the solution against the constraints
    pub verify_tolerance: f64,
    /// Let the LP backend print its log
    pub solver_output: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            shortlist_len: 5,
            shipment_threshold: 0.0,
            verify_tolerance: 1e-6,
            solver_output: false,
        }
    }
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shortlist_len(mut self, len: usize) -> Self {
        self.shortlist_len = len;
        self
    }

    pub fn with_shipment_threshold(mut self, threshold: f64) -> Self {
        self.shipment_threshold = threshold;
        self
    }

    pub fn with_verify_tolerance(mut self, tol: f64) -> Self {
        self.verify_tolerance = tol;
        self
    }

    pub fn with_solver_output(mut self, on: bool) -> Self {
        self.solver_output = on;
        self
    }
}
