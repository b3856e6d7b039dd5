//! In-memory relay connecting every peer of a test session without network
//! I/O. Reliable traffic is delivered in send order; buffered traffic is
//! also retained and replayed to later joiners. Unreliable traffic can be
//! dropped or reordered with a seeded RNG.

use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use log::{debug, warn};

use catacomb_shared::{
    BufferedEventLog, Delivery, NetEntity, PacketReceiver, PacketSender, PeerId, PeerMessage,
    Target, TransportError, TransportEvent,
};

/// Impairments applied to `Delivery::Unreliable` packets only
#[derive(Clone, Copy, Debug)]
pub struct LinkConditions {
    /// Chance each packet is dropped, 0.0 to 1.0
    pub loss: f32,
    /// Chance each surviving packet is held back and delivered after the
    /// next packet for the same recipient
    pub reorder: f32,
}

impl LinkConditions {
    pub fn perfect() -> Self {
        Self {
            loss: 0.0,
            reorder: 0.0,
        }
    }

    pub fn lossy(loss: f32, reorder: f32) -> Self {
        Self { loss, reorder }
    }
}

impl Default for LinkConditions {
    fn default() -> Self {
        Self::perfect()
    }
}

struct HubState {
    next_peer: u16,
    connected: BTreeSet<PeerId>,
    inboxes: HashMap<PeerId, VecDeque<TransportEvent>>,
    held_back: Vec<(PeerId, TransportEvent)>,
    buffered: BufferedEventLog,
    conditions: LinkConditions,
    rng: fastrand::Rng,
}

impl HubState {
    fn deliver(&mut self, to: PeerId, event: TransportEvent) {
        if let Some(inbox) = self.inboxes.get_mut(&to) {
            inbox.push_back(event);
        }
    }

    fn deliver_unreliable(&mut self, to: PeerId, event: TransportEvent) {
        if self.rng.f32() < self.conditions.loss {
            return;
        }
        if self.rng.f32() < self.conditions.reorder {
            self.held_back.push((to, event));
            return;
        }

        self.deliver(to, event);
        let (released, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.held_back)
            .into_iter()
            .partition(|(recipient, _)| *recipient == to);
        self.held_back = kept;
        for (_, late) in released {
            self.deliver(to, late);
        }
    }

    /// Retain or purge a buffered payload. Despawns remove everything known
    /// about the entity; only scene entities keep the despawn itself. Payloads
    /// with a slot replace the ones they supersede.
    fn buffer(&mut self, origin: PeerId, payload: &[u8]) {
        let message = match PeerMessage::from_bytes(payload) {
            Ok(message) => message,
            Err(error) => {
                warn!("relay cannot buffer payload from {}: {}", origin, error);
                return;
            }
        };
        let entity = message.entity();
        if let PeerMessage::Despawn { .. } = message {
            self.buffered.purge(&entity);
            if !entity.is_scene() {
                return;
            }
        }
        match message.buffer_slot() {
            Some(slot) => {
                self.buffered
                    .push_in_slot(entity, origin, slot, payload.to_vec());
            }
            None => self.buffered.push(entity, origin, payload.to_vec()),
        }
    }
}

/// Handle to a shared relay. Clones refer to the same relay.
#[derive(Clone)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

/// Transport halves handed to one connected peer
pub struct HubEndpoint {
    pub peer: PeerId,
    pub sender: Box<dyn PacketSender>,
    pub receiver: Box<dyn PacketReceiver>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::with_conditions(LinkConditions::perfect(), 0)
    }

    pub fn with_conditions(conditions: LinkConditions, seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                next_peer: 0,
                connected: BTreeSet::new(),
                inboxes: HashMap::new(),
                held_back: Vec::new(),
                buffered: BufferedEventLog::new(),
                conditions,
                rng: fastrand::Rng::with_seed(seed),
            })),
        }
    }

    /// Attach a new peer. It first learns about everyone already connected,
    /// then receives the buffered log in order.
    ///
    /// # Panics
    ///
    /// Panics if the relay lock was poisoned by a panicking test thread.
    pub fn connect(&self) -> HubEndpoint {
        let mut state = self.lock().expect("relay lock poisoned");
        let peer = PeerId::new(state.next_peer);
        state.next_peer += 1;

        let existing: Vec<PeerId> = state.connected.iter().copied().collect();
        let mut inbox = VecDeque::new();
        for other in existing {
            inbox.push_back(TransportEvent::PeerJoined(other));
            state.deliver(other, TransportEvent::PeerJoined(peer));
        }
        for (origin, payload) in state.buffered.replay() {
            inbox.push_back(TransportEvent::Packet {
                from: origin,
                payload: payload.to_vec(),
            });
        }
        debug!("{} joins, replaying {} buffered payloads", peer, state.buffered.len());

        state.inboxes.insert(peer, inbox);
        state.connected.insert(peer);

        HubEndpoint {
            peer,
            sender: Box::new(LocalSender {
                peer,
                state: self.state.clone(),
            }),
            receiver: Box::new(LocalReceiver {
                peer,
                state: self.state.clone(),
            }),
        }
    }

    /// Detach a peer. Undelivered traffic to it is discarded and every
    /// remaining peer is told it left.
    pub fn disconnect(&self, peer: PeerId) {
        let Ok(mut state) = self.lock() else {
            return;
        };
        if !state.connected.remove(&peer) {
            return;
        }
        state.inboxes.remove(&peer);
        state.held_back.retain(|(recipient, _)| *recipient != peer);
        let remaining: Vec<PeerId> = state.connected.iter().copied().collect();
        for other in remaining {
            state.deliver(other, TransportEvent::PeerLeft(peer));
        }
    }

    pub fn buffered_len(&self) -> usize {
        self.lock().map(|state| state.buffered.len()).unwrap_or(0)
    }

    /// Whether the buffered log holds anything about `entity`
    pub fn buffers_entity(&self, entity: &NetEntity) -> bool {
        let Ok(state) = self.lock() else {
            return false;
        };
        let found = state.buffered.replay().any(|(_, payload)| {
            PeerMessage::from_bytes(payload).is_ok_and(|message| message.entity() == *entity)
        });
        found
    }

    pub fn connected(&self) -> Vec<PeerId> {
        self.lock()
            .map(|state| state.connected.iter().copied().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HubState>, TransportError> {
        self.state.lock().map_err(|_| TransportError::Disconnected)
    }
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new()
    }
}

struct LocalSender {
    peer: PeerId,
    state: Arc<Mutex<HubState>>,
}

impl PacketSender for LocalSender {
    fn send(&self, target: Target, delivery: Delivery, payload: &[u8]) -> Result<(), TransportError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransportError::Disconnected)?;
        if !state.connected.contains(&self.peer) {
            return Err(TransportError::Disconnected);
        }

        let recipients: Vec<PeerId> = match target {
            Target::All => state
                .connected
                .iter()
                .copied()
                .filter(|peer| *peer != self.peer)
                .collect(),
            Target::Peer(peer) => {
                if !state.connected.contains(&peer) {
                    return Err(TransportError::UnknownPeer { peer });
                }
                vec![peer]
            }
        };

        if delivery == Delivery::ReliableBuffered && target == Target::All {
            state.buffer(self.peer, payload);
        }

        for recipient in recipients {
            let event = TransportEvent::Packet {
                from: self.peer,
                payload: payload.to_vec(),
            };
            if delivery.is_reliable() {
                state.deliver(recipient, event);
            } else {
                state.deliver_unreliable(recipient, event);
            }
        }
        Ok(())
    }

    fn local_peer(&self) -> PeerId {
        self.peer
    }
}

struct LocalReceiver {
    peer: PeerId,
    state: Arc<Mutex<HubState>>,
}

impl PacketReceiver for LocalReceiver {
    fn receive(&mut self) -> Result<Option<TransportEvent>, TransportError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| TransportError::Disconnected)?;
        match state.inboxes.get_mut(&self.peer) {
            Some(inbox) => Ok(inbox.pop_front()),
            None => Err(TransportError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use catacomb_shared::{
        Delivery, DiscreteEvent, NetEntity, OwnerChange, PeerId, PeerMessage, Target, Transition,
        TransportError, TransportEvent,
    };

    use super::LocalHub;

    #[test]
    fn late_joiner_hears_about_everyone_first() {
        let hub = LocalHub::new();
        let first = hub.connect();
        let door = NetEntity::scene(1);
        let payload = PeerMessage::Despawn { entity: door }.to_bytes();
        first
            .sender
            .send(Target::All, Delivery::ReliableBuffered, &payload)
            .unwrap();

        let mut second = hub.connect();
        assert_eq!(
            second.receiver.receive().unwrap(),
            Some(TransportEvent::PeerJoined(PeerId::new(0)))
        );
        assert_eq!(
            second.receiver.receive().unwrap(),
            Some(TransportEvent::Packet {
                from: PeerId::new(0),
                payload
            })
        );
        assert_eq!(second.receiver.receive().unwrap(), None);
    }

    #[test]
    fn spawned_entity_despawn_purges_everything() {
        let hub = LocalHub::new();
        let first = hub.connect();
        let avatar = NetEntity::spawned(first.peer, 0);
        let payload = PeerMessage::Despawn { entity: avatar }.to_bytes();
        first
            .sender
            .send(Target::All, Delivery::ReliableBuffered, &payload)
            .unwrap();
        assert_eq!(hub.buffered_len(), 0);
    }

    #[test]
    fn departed_peer_cannot_send() {
        let hub = LocalHub::new();
        let first = hub.connect();
        let _second = hub.connect();
        hub.disconnect(first.peer);
        assert_eq!(
            first.sender.send(Target::All, Delivery::Reliable, &[1]),
            Err(TransportError::Disconnected)
        );
    }

    #[test]
    fn superseded_payloads_are_not_retained() {
        let hub = LocalHub::new();
        let first = hub.connect();
        let obstacle = NetEntity::scene(3);
        for moving in [false, true, false] {
            let event =
                DiscreteEvent::new(obstacle, Transition::SetObstacleMoving(moving), first.peer);
            let payload = PeerMessage::Event(event).to_bytes();
            first
                .sender
                .send(Target::All, Delivery::ReliableBuffered, &payload)
                .unwrap();
        }
        for epoch in [1, 3, 2] {
            let change = OwnerChange {
                entity: obstacle,
                owner: first.peer,
                epoch,
            };
            let payload = PeerMessage::OwnerChanged(change).to_bytes();
            first
                .sender
                .send(Target::All, Delivery::ReliableBuffered, &payload)
                .unwrap();
        }
        assert_eq!(hub.buffered_len(), 2);

        let mut second = hub.connect();
        let mut replayed = Vec::new();
        while let Some(event) = second.receiver.receive().unwrap() {
            if let TransportEvent::Packet { payload, .. } = event {
                replayed.push(PeerMessage::from_bytes(&payload).unwrap());
            }
        }
        assert_eq!(
            replayed,
            vec![
                PeerMessage::Event(DiscreteEvent::new(
                    obstacle,
                    Transition::SetObstacleMoving(false),
                    PeerId::new(0)
                )),
                PeerMessage::OwnerChanged(OwnerChange {
                    entity: obstacle,
                    owner: PeerId::new(0),
                    epoch: 3
                }),
            ]
        );
    }
}
