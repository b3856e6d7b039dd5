use std::fmt;

use bitcode::{Decode, Encode};

pub type Tick = u32;
pub type Sequence = u16;
pub type OwnerEpoch = u32;

/// Identity of one connected participant, assigned by the transport.
///
/// Ids are handed out in increasing order over the life of a session, so the
/// lowest connected id is also the earliest peer still present.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct PeerId(u16);

impl PeerId {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn to_u16(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}
