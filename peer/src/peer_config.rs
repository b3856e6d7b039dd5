use std::default::Default;

use catacomb_shared::{LocomotionConfig, ReplicationConfig, Tick};

/// Contains Config properties which will be used by a Peer
#[derive(Clone)]
pub struct PeerConfig {
    /// Length of one fixed simulation tick, in seconds
    pub tick_interval: f32,
    /// Ticks an ownership request may stay unanswered before it is dropped
    pub ownership_request_timeout: Tick,
    /// Used to configure snapshot cadence & remote smoothing
    pub replication: ReplicationConfig,
    /// Tunables for the locally owned avatar
    pub locomotion: LocomotionConfig,
    /// Seconds a killed avatar stays hidden before it respawns
    pub respawn_delay: f32,
    /// Seed for randomized obstacle start delays. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            tick_interval: 1.0 / 60.0,
            ownership_request_timeout: 120,
            replication: ReplicationConfig::default(),
            locomotion: LocomotionConfig::default(),
            respawn_delay: 3.0,
            rng_seed: None,
        }
    }
}
