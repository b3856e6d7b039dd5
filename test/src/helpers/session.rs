use catacomb_peer::{Peer, PeerConfig, SceneDefinition, SessionSignal, SessionSignalEvent};

use crate::local_hub::LocalHub;

/// Connect a new peer with a deterministic config.
pub fn join(hub: &LocalHub, scene: SceneDefinition) -> Peer {
    let config = PeerConfig {
        rng_seed: Some(7),
        ..Default::default()
    };
    join_with(hub, scene, config)
}

pub fn join_with(hub: &LocalHub, scene: SceneDefinition, config: PeerConfig) -> Peer {
    let endpoint = hub.connect();
    Peer::new(config, scene, endpoint.sender, endpoint.receiver)
}

/// Tick every peer once, in order.
pub fn tick_all(peers: &mut [Peer]) {
    for peer in peers.iter_mut() {
        peer.tick();
    }
}

pub fn tick_all_n(peers: &mut [Peer], ticks: usize) {
    for _ in 0..ticks {
        tick_all(peers);
    }
}

/// Tick every peer `ticks` times and return the session signals each one
/// observed, indexed like `peers`. Other events are discarded.
pub fn tick_collecting_signals(peers: &mut [Peer], ticks: usize) -> Vec<Vec<SessionSignal>> {
    let mut signals = vec![Vec::new(); peers.len()];
    for _ in 0..ticks {
        tick_all(peers);
        for (peer, seen) in peers.iter_mut().zip(signals.iter_mut()) {
            let mut events = peer.take_events();
            seen.extend(events.read::<SessionSignalEvent>());
        }
    }
    signals
}
