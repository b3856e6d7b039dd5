use std::collections::BTreeSet;

use crate::types::PeerId;

/// Connected peers as seen by the local peer, including itself.
///
/// The session coordinator is always the lowest connected id, so every peer
/// that has observed the same joins and departures elects the same one.
#[derive(Clone, Debug)]
pub struct SessionRoster {
    local: PeerId,
    connected: BTreeSet<PeerId>,
}

impl SessionRoster {
    pub fn new(local: PeerId) -> Self {
        let mut connected = BTreeSet::new();
        connected.insert(local);
        Self { local, connected }
    }

    pub fn local(&self) -> PeerId {
        self.local
    }

    /// Returns true if the peer was not yet known.
    pub fn insert(&mut self, peer: PeerId) -> bool {
        self.connected.insert(peer)
    }

    /// Returns true if the peer was connected. The local peer cannot be removed.
    pub fn remove(&mut self, peer: PeerId) -> bool {
        if peer == self.local {
            return false;
        }
        self.connected.remove(&peer)
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.connected.contains(&peer)
    }

    pub fn coordinator(&self) -> PeerId {
        // the local peer is always present, so the set is never empty
        self.connected.iter().next().copied().unwrap_or(self.local)
    }

    pub fn is_coordinator(&self) -> bool {
        self.coordinator() == self.local
    }

    pub fn peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.connected.iter().copied()
    }

    pub fn remote_peers(&self) -> impl Iterator<Item = PeerId> + '_ {
        let local = self.local;
        self.connected.iter().copied().filter(move |peer| *peer != local)
    }

    pub fn len(&self) -> usize {
        self.connected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connected.is_empty()
    }
}
