use bitcode::{Decode, Encode};

use crate::{
    entity::net_entity::NetEntity,
    types::{OwnerEpoch, PeerId},
};

/// Announcement that `owner` holds `entity` from `epoch` onwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode)]
pub struct OwnerChange {
    pub entity: NetEntity,
    pub owner: PeerId,
    pub epoch: OwnerEpoch,
}

/// Reply to a requester whose ownership request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Encode, Decode)]
pub struct OwnershipDenial {
    pub entity: NetEntity,
    pub requester: PeerId,
    pub current_owner: Option<PeerId>,
}

/// An ownership request and the peer it must be sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutedRequest {
    pub entity: NetEntity,
    pub target: PeerId,
}
