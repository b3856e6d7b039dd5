mod error;

pub use error::TransportError;

use crate::types::PeerId;

/// Delivery classes every transport must provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Periodic state, may be lost or reordered
    Unreliable,
    /// One-shot, delivered once and in order to currently connected peers
    Reliable,
    /// As `Reliable`, and replayed in order to every peer that joins later
    ReliableBuffered,
}

impl Delivery {
    pub fn is_reliable(&self) -> bool {
        !matches!(self, Delivery::Unreliable)
    }
}

/// Recipients of a send. `All` never includes the sender itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    All,
    Peer(PeerId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    Packet { from: PeerId, payload: Vec<u8> },
    PeerJoined(PeerId),
    PeerLeft(PeerId),
}

/// Used to send packets to other peers in the session
pub trait PacketSender: Send + Sync {
    fn send(&self, target: Target, delivery: Delivery, payload: &[u8])
        -> Result<(), TransportError>;
    /// Identity the transport assigned to this endpoint
    fn local_peer(&self) -> PeerId;
}

/// Used to receive packets and membership changes
pub trait PacketReceiver: Send + Sync {
    /// Returns the next pending event, or `None` when drained
    fn receive(&mut self) -> Result<Option<TransportEvent>, TransportError>;
}
