mod config;
mod continuous_state;
mod interpolator;
mod snapshot;

pub use config::ReplicationConfig;
pub use continuous_state::{AvatarChannels, ContinuousChannels, ContinuousState};
pub use interpolator::Interpolator;
pub use snapshot::{Snapshot, SnapshotReceiver, SnapshotSender};
