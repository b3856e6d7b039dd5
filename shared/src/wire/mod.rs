mod encoded;
mod error;
mod peer_message;

pub use error::WireError;
pub use peer_message::{PeerMessage, SpawnRecord};
