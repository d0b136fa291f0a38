use core_sim::{RandomSource, SimConfig, SimConfigError};
use time::OffsetDateTime;

use crate::{
    events::PollReport,
    poller::poll_cycle,
    snapshot::{Snapshot, SnapshotError},
    store::StateStore,
};

pub type BoxedSource = Box<dyn RandomSource + Send>;

/// Owns the simulated state and the random source that drives it.
pub struct DashboardEngine {
    config: SimConfig,
    store: StateStore,
    rng: BoxedSource,
    cycle: u64,
}

impl DashboardEngine {
    pub fn new(
        config: SimConfig,
        mut rng: BoxedSource,
        now: OffsetDateTime,
    ) -> Result<Self, SimConfigError> {
        config.validate()?;
        let store = StateStore::seeded(&config, &mut rng, now);

        Ok(Self {
            config,
            store,
            rng,
            cycle: 0,
        })
    }

    pub fn poll(&mut self, now: OffsetDateTime) -> PollReport {
        self.cycle += 1;
        let report = poll_cycle(
            &mut self.store,
            &self.config,
            &mut self.rng,
            now,
            self.cycle,
        );

        tracing::debug!(
            cycle = report.cycle,
            price = report.price,
            pnl = report.pnl_after,
            pnl_delta = report.pnl_delta(),
            new_trade = report.new_trade.is_some(),
            position = self.store.position.side_label(),
            "poll cycle applied"
        );

        report
    }

    pub fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        Snapshot::build(&self.store)
    }

    /// Discards all simulated state and reseeds it as at start-up.
    pub fn reset(&mut self, now: OffsetDateTime) {
        self.store = StateStore::seeded(&self.config, &mut self.rng, now);
        self.cycle = 0;
        tracing::info!("dashboard state reset");
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[cfg(test)]
    pub(crate) fn for_test_seed(seed: u64) -> Self {
        let rng = Box::new(core_sim::SeededSource::new(seed));
        let now = time::macros::datetime!(2024-03-01 12:00 UTC);
        Self::new(SimConfig::default(), rng, now)
            .expect("default config is valid")
    }
}

impl std::fmt::Debug for DashboardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardEngine")
            .field("config", &self.config)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}
