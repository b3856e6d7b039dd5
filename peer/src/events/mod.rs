mod peer_events;

pub use peer_events::{
    CoordinatorChangedEvent, CueEvent, DespawnEntityEvent, ErrorEvent,
    InteractionUnavailableEvent, OwnershipDeniedEvent, OwnershipExpiredEvent,
    OwnershipGrantedEvent, OwnershipLostEvent, PeerEvent, PeerEvents, PeerJoinedEvent,
    PeerLeftEvent, PresentationChangedEvent, PresentationState, SessionSignal,
    SessionSignalEvent, SpawnEntityEvent,
};
