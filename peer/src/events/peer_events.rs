use std::{mem, vec::IntoIter};

use log::warn;

use catacomb_shared::{Cue, EntityKind, NetEntity, PeerId, PresentationTag};

use crate::PeerError;

/// Lifecycle signals for lobby, menu & level-transition collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionSignal {
    StageCleared { puzzle: NetEntity },
    PuzzleSolved { puzzle: NetEntity },
    AllRequiredPeersPresent { elevator: NetEntity },
}

/// What presentation layers should now show for an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationState {
    Locomotion(PresentationTag),
    Mode(&'static str),
}

pub struct PeerEvents {
    peer_joins: Vec<PeerId>,
    peer_leaves: Vec<PeerId>,
    coordinator_changes: Vec<PeerId>,
    ownership_grants: Vec<NetEntity>,
    ownership_losses: Vec<NetEntity>,
    ownership_denials: Vec<(NetEntity, Option<PeerId>)>,
    ownership_expiries: Vec<NetEntity>,
    spawns: Vec<(NetEntity, EntityKind)>,
    despawns: Vec<NetEntity>,
    presentation_changes: Vec<(NetEntity, PresentationState)>,
    unavailable_interactions: Vec<(NetEntity, String)>,
    signals: Vec<SessionSignal>,
    cues: Vec<(NetEntity, Cue)>,
    errors: Vec<PeerError>,
    empty: bool,
}

impl PeerEvents {
    pub(crate) fn new() -> Self {
        Self {
            peer_joins: Vec::new(),
            peer_leaves: Vec::new(),
            coordinator_changes: Vec::new(),
            ownership_grants: Vec::new(),
            ownership_losses: Vec::new(),
            ownership_denials: Vec::new(),
            ownership_expiries: Vec::new(),
            spawns: Vec::new(),
            despawns: Vec::new(),
            presentation_changes: Vec::new(),
            unavailable_interactions: Vec::new(),
            signals: Vec::new(),
            cues: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: PeerEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: PeerEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_peer_join(&mut self, peer: PeerId) {
        self.peer_joins.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_peer_leave(&mut self, peer: PeerId) {
        self.peer_leaves.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_coordinator_change(&mut self, coordinator: PeerId) {
        self.coordinator_changes.push(coordinator);
        self.empty = false;
    }

    pub(crate) fn push_ownership_grant(&mut self, entity: NetEntity) {
        self.ownership_grants.push(entity);
        self.empty = false;
    }

    pub(crate) fn push_ownership_loss(&mut self, entity: NetEntity) {
        self.ownership_losses.push(entity);
        self.empty = false;
    }

    pub(crate) fn push_ownership_denial(&mut self, entity: NetEntity, owner: Option<PeerId>) {
        self.ownership_denials.push((entity, owner));
        self.empty = false;
    }

    pub(crate) fn push_ownership_expiry(&mut self, entity: NetEntity) {
        self.ownership_expiries.push(entity);
        self.empty = false;
    }

    pub(crate) fn push_spawn(&mut self, entity: NetEntity, kind: EntityKind) {
        self.spawns.push((entity, kind));
        self.empty = false;
    }

    pub(crate) fn push_despawn(&mut self, entity: NetEntity) {
        self.despawns.push(entity);
        self.empty = false;
    }

    pub(crate) fn push_presentation_change(&mut self, entity: NetEntity, state: PresentationState) {
        self.presentation_changes.push((entity, state));
        self.empty = false;
    }

    pub(crate) fn push_unavailable_interaction(&mut self, entity: NetEntity, text: String) {
        self.unavailable_interactions.push((entity, text));
        self.empty = false;
    }

    pub(crate) fn push_signal(&mut self, signal: SessionSignal) {
        self.signals.push(signal);
        self.empty = false;
    }

    pub(crate) fn push_cue(&mut self, entity: NetEntity, cue: Cue) {
        self.cues.push((entity, cue));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: PeerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

impl Default for PeerEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PeerEvents {
    fn drop(&mut self) {
        if !self.errors.is_empty() {
            warn!(
                "Dropped {} Peer Error Event(s)! Make sure to handle these through `events.read::<ErrorEvent>()`.",
                self.errors.len()
            );
        }
    }
}

// Event Trait
pub trait PeerEvent {
    type Iter;

    fn iter(events: &mut PeerEvents) -> Self::Iter;

    fn has(events: &PeerEvents) -> bool;
}

macro_rules! peer_event {
    ($(#[$meta:meta])* $name:ident, $field:ident, $item:ty) => {
        $(#[$meta])*
        pub struct $name;

        impl PeerEvent for $name {
            type Iter = IntoIter<$item>;

            fn iter(events: &mut PeerEvents) -> Self::Iter {
                let list = mem::take(&mut events.$field);
                IntoIterator::into_iter(list)
            }

            fn has(events: &PeerEvents) -> bool {
                !events.$field.is_empty()
            }
        }
    };
}

peer_event!(PeerJoinedEvent, peer_joins, PeerId);
peer_event!(PeerLeftEvent, peer_leaves, PeerId);
peer_event!(
    /// Yields the newly elected session coordinator
    CoordinatorChangedEvent,
    coordinator_changes,
    PeerId
);
peer_event!(OwnershipGrantedEvent, ownership_grants, NetEntity);
peer_event!(OwnershipLostEvent, ownership_losses, NetEntity);
peer_event!(
    /// Yields the entity and the owner that refused it
    OwnershipDeniedEvent,
    ownership_denials,
    (NetEntity, Option<PeerId>)
);
peer_event!(OwnershipExpiredEvent, ownership_expiries, NetEntity);
peer_event!(SpawnEntityEvent, spawns, (NetEntity, EntityKind));
peer_event!(DespawnEntityEvent, despawns, NetEntity);
peer_event!(
    PresentationChangedEvent,
    presentation_changes,
    (NetEntity, PresentationState)
);
peer_event!(
    /// Yields the entity interacted with and the text to show the player
    InteractionUnavailableEvent,
    unavailable_interactions,
    (NetEntity, String)
);
peer_event!(SessionSignalEvent, signals, SessionSignal);
peer_event!(CueEvent, cues, (NetEntity, Cue));
peer_event!(ErrorEvent, errors, PeerError);
