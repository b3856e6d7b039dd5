/// Contains config properties which will be used by the snapshot replicator
#[derive(Clone, Debug)]
pub struct ReplicationConfig {
    /// Owners queue a snapshot for each owned entity every this many ticks.
    /// Zero is treated as one.
    pub snapshot_interval: u32,
    /// Rate per second at which presented positions approach their target
    pub position_rate: f32,
    /// Rate per second at which presented rotations approach their target
    pub rotation_rate: f32,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            snapshot_interval: 1,
            position_rate: 15.0,
            rotation_rate: 15.0,
        }
    }
}

impl ReplicationConfig {
    pub fn should_send(&self, tick: u32) -> bool {
        tick % self.snapshot_interval.max(1) == 0
    }
}
