use bitcode::{Decode, Encode};

/// Every kind of replicated object a session knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum EntityKind {
    Door,
    Lever,
    RuneSlot,
    Item,
    Obstacle,
    Avatar,
    Puzzle,
    Elevator,
    SymbolTable,
}

/// What the session coordinator does with an entity whose owner has left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeavePolicy {
    /// Ownership falls to the coordinator and the entity lives on.
    Orphan,
    /// The coordinator despawns the entity.
    Despawn,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Door => "Door",
            EntityKind::Lever => "Lever",
            EntityKind::RuneSlot => "RuneSlot",
            EntityKind::Item => "Item",
            EntityKind::Obstacle => "Obstacle",
            EntityKind::Avatar => "Avatar",
            EntityKind::Puzzle => "Puzzle",
            EntityKind::Elevator => "Elevator",
            EntityKind::SymbolTable => "SymbolTable",
        }
    }

    pub fn leave_policy(&self) -> LeavePolicy {
        match self {
            EntityKind::Avatar => LeavePolicy::Despawn,
            _ => LeavePolicy::Orphan,
        }
    }

    /// Kinds whose continuous state moves at runtime and is therefore
    /// streamed by snapshot. The rest only change through discrete events.
    pub fn streams_snapshots(&self) -> bool {
        matches!(
            self,
            EntityKind::Avatar | EntityKind::Item | EntityKind::Obstacle
        )
    }
}
