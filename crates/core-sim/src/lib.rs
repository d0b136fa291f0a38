mod bounded;
mod config;
mod rng;
mod series;

pub use bounded::{BoundedList, Eviction};
pub use config::{SimConfig, SimConfigError};
pub use rng::{pick, EntropySource, RandomSource, ScriptedSource, SeededSource};
pub use series::{generate_series, Bar, Series};

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
