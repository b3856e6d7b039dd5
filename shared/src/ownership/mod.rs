mod error;
mod owner_change;
mod registry;
mod roster;

pub use error::OwnershipError;
pub use owner_change::{OwnerChange, OwnershipDenial, RoutedRequest};
pub use registry::{
    OwnershipRecord, OwnershipRegistry, OwnershipStatus, PeerLeftOutcome, PendingRequest,
    RequestOutcome,
};
pub use roster::SessionRoster;
