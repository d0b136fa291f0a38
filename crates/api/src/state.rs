use std::sync::Arc;

use core_sim::{EntropySource, SimConfig};
use runtime::{BoxedSource, DashboardEngine, Snapshot, SnapshotError};
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::{
    gate::Gate,
    session::{SessionSigner, DEFAULT_SESSION_KEY},
};

/// Shared handler state. The engine sits behind one async mutex so a poll and
/// the snapshot built from it are never interleaved with another request.
#[derive(Clone, Debug)]
pub struct AppState {
    engine: Arc<Mutex<DashboardEngine>>,
    gate: Arc<Gate>,
    sessions: SessionSigner,
}

impl AppState {
    pub fn new(engine: DashboardEngine, gate: Gate, sessions: SessionSigner) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            gate: Arc::new(gate),
            sessions,
        }
    }

    /// Advances the simulation one cycle and returns the resulting view.
    pub async fn poll_snapshot(&self, now: OffsetDateTime) -> Result<Snapshot, SnapshotError> {
        let mut engine = self.engine.lock().await;
        engine.poll(now);
        engine.snapshot()
    }

    /// Current view without advancing the simulation.
    pub async fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        self.engine.lock().await.snapshot()
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn sessions(&self) -> &SessionSigner {
        &self.sessions
    }

    pub fn engine(&self) -> Arc<Mutex<DashboardEngine>> {
        Arc::clone(&self.engine)
    }

    #[cfg(test)]
    pub(crate) fn for_test() -> Self {
        let rng: BoxedSource = Box::new(core_sim::SeededSource::new(42));
        let now = time::macros::datetime!(2024-03-01 12:00 UTC);
        let engine = DashboardEngine::new(SimConfig::default(), rng, now)
            .expect("default config is valid");

        Self::new(engine, Gate::default(), default_signer())
    }
}

impl Default for AppState {
    fn default() -> Self {
        let rng: BoxedSource = Box::new(EntropySource::new());
        let engine = DashboardEngine::new(SimConfig::default(), rng, OffsetDateTime::now_utc())
            .expect("default config is valid");

        Self::new(engine, Gate::default(), default_signer())
    }
}

fn default_signer() -> SessionSigner {
    SessionSigner::new(DEFAULT_SESSION_KEY)
        .expect("default session key is valid")
}
