use thiserror::Error;

/// Tunable constants of the simulated dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub seed_price: f64,
    pub series_length: usize,
    pub bar_interval_minutes: i64,
    pub initial_balance: f64,
    pub initial_pnl: f64,
    pub pnl_history_start: f64,
    pub initial_vwap: f64,
    pub initial_total_signals: u64,
    pub initial_total_trades: u64,
    pub pnl_window: usize,
    pub signal_capacity: usize,
    pub decision_capacity: usize,
    pub trade_capacity: usize,
    pub trade_probability: f64,
    pub open_probability: f64,
    pub close_probability: f64,
    pub confidence_threshold: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed_price: 3.55,
            series_length: 50,
            bar_interval_minutes: 30,
            initial_balance: 352.88,
            initial_pnl: -15_966.96,
            pnl_history_start: -2_000.0,
            initial_vwap: 3.5915,
            initial_total_signals: 131_129,
            initial_total_trades: 85,
            pnl_window: 20,
            signal_capacity: 10,
            decision_capacity: 5,
            trade_capacity: 10,
            trade_probability: 0.2,
            open_probability: 0.1,
            close_probability: 0.05,
            confidence_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimConfigError {
    #[error("{name} must be a finite probability between 0 and 1, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("series_length must be at least 1")]
    EmptySeries,
    #[error("seed_price must be finite and positive")]
    InvalidSeedPrice,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        check_probability("trade_probability", self.trade_probability)?;
        check_probability("open_probability", self.open_probability)?;
        check_probability("close_probability", self.close_probability)?;
        check_probability("confidence_threshold", self.confidence_threshold)?;

        if self.series_length == 0 {
            return Err(SimConfigError::EmptySeries);
        }
        if !self.seed_price.is_finite() || self.seed_price <= 0.0 {
            return Err(SimConfigError::InvalidSeedPrice);
        }

        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), SimConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimConfigError::InvalidProbability { name, value })
    }
}
