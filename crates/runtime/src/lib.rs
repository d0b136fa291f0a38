pub mod engine;
pub mod events;
pub mod format;
pub mod poller;
pub mod snapshot;
pub mod store;

pub use engine::{BoxedSource, DashboardEngine};
pub use events::PollReport;
pub use snapshot::{Snapshot, SnapshotError};
pub use store::StateStore;

pub fn module_ready() -> bool {
    true
}
