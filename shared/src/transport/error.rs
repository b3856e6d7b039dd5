use thiserror::Error;

use crate::types::PeerId;

/// Errors a transport can report to its peer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The local endpoint is no longer attached to the session
    #[error("Transport is disconnected from the session")]
    Disconnected,

    /// A targeted send named a peer the transport does not know
    #[error("Cannot send to {peer}: peer is not connected")]
    UnknownPeer { peer: PeerId },
}
