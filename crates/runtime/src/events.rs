use strategy::{PositionTransition, Trade};

/// What a single poll changed, for logging and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub cycle: u64,
    pub signals_added: u64,
    pub price: f64,
    pub pnl_before: f64,
    pub pnl_after: f64,
    pub new_trade: Option<Trade>,
    pub position_transition: Option<PositionTransition>,
}

impl PollReport {
    pub fn pnl_delta(&self) -> f64 {
        self.pnl_after - self.pnl_before
    }
}
