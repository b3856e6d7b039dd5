use bitcode::{Decode, Encode};

use crate::{entity::net_entity::NetEntity, events::buffered_log::BufferSlot, types::PeerId};

/// Cosmetic feedback played on every peer. Cues never change state and are
/// never replayed to late joiners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Cue {
    LockedDoor,
    WrongRune,
    CorrectRune,
    LeverPulled,
    SymbolPlaced,
    /// An avatar entered a kill zone
    Died,
    /// An avatar reappeared at its respawn point
    Respawned,
    /// Show or hide an avatar's body while it waits to respawn
    BodyVisible(bool),
}

/// Every discrete change an entity can go through.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Transition {
    SetDoorOpen(bool),
    ArmLever(bool),
    ActivateLever,
    ResetLever,
    PlaceRune { item: NetEntity, rune: String },
    WithdrawRune,
    PickUp { holder: PeerId },
    Drop,
    PlaceInto { slot: NetEntity },
    SetObstacleMoving(bool),
    ClearStage,
    ResetStage,
    CountLever { lever: NetEntity },
    SolvePuzzle,
    Depart,
    ChooseLayout { layout: u32, sequence: Vec<String> },
    PlaceSymbol { item: NetEntity, symbol: String },
    /// Take `item` off the table. Only the most recently placed symbol can go.
    RetrieveSymbol { item: NetEntity },
    SolveTable,
    Cue(Cue),
}

impl Transition {
    /// Buffered transitions are retained by the relay and replayed, in order,
    /// to peers that join later.
    pub fn is_buffered(&self) -> bool {
        !matches!(self, Transition::Cue(_))
    }

    /// Transitions that set a field outright make earlier ones setting the
    /// same field redundant for late joiners.
    pub fn buffer_slot(&self) -> Option<BufferSlot> {
        match self {
            Transition::SetDoorOpen(_) => Some(BufferSlot::new("door open", 0)),
            Transition::SetObstacleMoving(_) => Some(BufferSlot::new("obstacle moving", 0)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transition::SetDoorOpen(_) => "SetDoorOpen",
            Transition::ArmLever(_) => "ArmLever",
            Transition::ActivateLever => "ActivateLever",
            Transition::ResetLever => "ResetLever",
            Transition::PlaceRune { .. } => "PlaceRune",
            Transition::WithdrawRune => "WithdrawRune",
            Transition::PickUp { .. } => "PickUp",
            Transition::Drop => "Drop",
            Transition::PlaceInto { .. } => "PlaceInto",
            Transition::SetObstacleMoving(_) => "SetObstacleMoving",
            Transition::ClearStage => "ClearStage",
            Transition::ResetStage => "ResetStage",
            Transition::CountLever { .. } => "CountLever",
            Transition::SolvePuzzle => "SolvePuzzle",
            Transition::Depart => "Depart",
            Transition::ChooseLayout { .. } => "ChooseLayout",
            Transition::PlaceSymbol { .. } => "PlaceSymbol",
            Transition::RetrieveSymbol { .. } => "RetrieveSymbol",
            Transition::SolveTable => "SolveTable",
            Transition::Cue(_) => "Cue",
        }
    }
}
