use bitcode::{Decode, Encode};

use crate::{
    entity::{entity_kind::EntityKind, net_entity::NetEntity},
    events::{error::TransitionError, transition::Transition},
    ownership::SessionRoster,
    types::PeerId,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct DoorState {
    pub open: bool,
    /// Item tag that must be held to open the door
    pub required_key: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct LeverState {
    pub armed: bool,
    pub activated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct PlacedRune {
    pub item: NetEntity,
    pub rune: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct RuneSlotState {
    pub required_rune: String,
    pub placed: Option<PlacedRune>,
}

impl RuneSlotState {
    pub fn is_correct(&self) -> bool {
        self.placed
            .as_ref()
            .is_some_and(|placed| placed.rune == self.required_rune)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub enum ItemCustody {
    #[default]
    Free,
    Held(PeerId),
    Placed(NetEntity),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct ItemState {
    pub tag: String,
    pub custody: ItemCustody,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct ObstacleState {
    pub moving: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct PuzzleState {
    pub cleared: bool,
    pub solved: bool,
    /// Levers counted since the stage was cleared, sorted and unique
    pub counted_levers: Vec<NetEntity>,
}

impl PuzzleState {
    pub fn lever_count(&self) -> usize {
        self.counted_levers.len()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct ElevatorState {
    pub departed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct PlacedSymbol {
    pub item: NetEntity,
    pub symbol: String,
}

/// A table that takes symbols one after another. The layout, and with it
/// the expected order, is chosen once by the coordinator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct SymbolTableState {
    pub layout: Option<u32>,
    pub sequence: Vec<String>,
    pub placed: Vec<PlacedSymbol>,
    pub solved: bool,
}

impl SymbolTableState {
    pub fn is_full(&self) -> bool {
        self.layout.is_some() && self.placed.len() >= self.sequence.len()
    }

    /// Every position holds the expected symbol, in order.
    pub fn is_correct(&self) -> bool {
        self.is_full()
            && self
                .placed
                .iter()
                .zip(&self.sequence)
                .all(|(placed, expected)| placed.symbol == *expected)
    }
}

/// The replicated discrete state of one entity.
///
/// `apply` is the single deterministic transition function every peer runs.
/// It never mutates in place: `Ok(Some(next))` is the new state, `Ok(None)`
/// means the transition is already reflected (re-application is a no-op).
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum DiscreteState {
    Door(DoorState),
    Lever(LeverState),
    RuneSlot(RuneSlotState),
    Item(ItemState),
    Obstacle(ObstacleState),
    Avatar,
    Puzzle(PuzzleState),
    Elevator(ElevatorState),
    SymbolTable(SymbolTableState),
}

impl DiscreteState {
    pub fn kind(&self) -> EntityKind {
        match self {
            DiscreteState::Door(_) => EntityKind::Door,
            DiscreteState::Lever(_) => EntityKind::Lever,
            DiscreteState::RuneSlot(_) => EntityKind::RuneSlot,
            DiscreteState::Item(_) => EntityKind::Item,
            DiscreteState::Obstacle(_) => EntityKind::Obstacle,
            DiscreteState::Avatar => EntityKind::Avatar,
            DiscreteState::Puzzle(_) => EntityKind::Puzzle,
            DiscreteState::Elevator(_) => EntityKind::Elevator,
            DiscreteState::SymbolTable(_) => EntityKind::SymbolTable,
        }
    }

    /// Grant policy: whether the current owner may hand the entity over.
    /// An item in a connected peer's hand stays with that peer.
    pub fn is_transferable(&self, roster: &SessionRoster) -> bool {
        match self {
            DiscreteState::Item(ItemState {
                custody: ItemCustody::Held(holder),
                ..
            }) => !roster.contains(*holder),
            _ => true,
        }
    }

    pub fn apply(&self, transition: &Transition) -> Result<Option<DiscreteState>, TransitionError> {
        if let Transition::Cue(_) = transition {
            return Ok(None);
        }

        match self {
            DiscreteState::Door(door) => apply_door(door, transition),
            DiscreteState::Lever(lever) => apply_lever(lever, transition),
            DiscreteState::RuneSlot(slot) => apply_rune_slot(slot, transition),
            DiscreteState::Item(item) => apply_item(item, transition),
            DiscreteState::Obstacle(obstacle) => match transition {
                Transition::SetObstacleMoving(moving) if obstacle.moving == *moving => Ok(None),
                Transition::SetObstacleMoving(moving) => {
                    Ok(Some(DiscreteState::Obstacle(ObstacleState { moving: *moving })))
                }
                _ => Err(mismatch(transition, EntityKind::Obstacle)),
            },
            DiscreteState::Avatar => Err(mismatch(transition, EntityKind::Avatar)),
            DiscreteState::Puzzle(puzzle) => apply_puzzle(puzzle, transition),
            DiscreteState::Elevator(elevator) => match transition {
                Transition::Depart if elevator.departed => Ok(None),
                Transition::Depart => Ok(Some(DiscreteState::Elevator(ElevatorState {
                    departed: true,
                }))),
                _ => Err(mismatch(transition, EntityKind::Elevator)),
            },
            DiscreteState::SymbolTable(table) => apply_symbol_table(table, transition),
        }
    }

    /// A short label for the discrete mode, surfaced to presentation.
    pub fn mode(&self) -> &'static str {
        match self {
            DiscreteState::Door(door) if door.open => "open",
            DiscreteState::Door(_) => "closed",
            DiscreteState::Lever(lever) if lever.activated => "activated",
            DiscreteState::Lever(lever) if lever.armed => "armed",
            DiscreteState::Lever(_) => "inactive",
            DiscreteState::RuneSlot(slot) if slot.is_correct() => "correct",
            DiscreteState::RuneSlot(slot) if slot.placed.is_some() => "wrong",
            DiscreteState::RuneSlot(_) => "empty",
            DiscreteState::Item(item) => match item.custody {
                ItemCustody::Free => "free",
                ItemCustody::Held(_) => "held",
                ItemCustody::Placed(_) => "placed",
            },
            DiscreteState::Obstacle(obstacle) if obstacle.moving => "moving",
            DiscreteState::Obstacle(_) => "stopped",
            DiscreteState::Avatar => "avatar",
            DiscreteState::Puzzle(puzzle) if puzzle.solved => "solved",
            DiscreteState::Puzzle(puzzle) if puzzle.cleared => "cleared",
            DiscreteState::Puzzle(_) => "unsolved",
            DiscreteState::Elevator(elevator) if elevator.departed => "departed",
            DiscreteState::Elevator(_) => "waiting",
            DiscreteState::SymbolTable(table) if table.solved => "solved",
            DiscreteState::SymbolTable(table) if table.layout.is_none() => "unset",
            DiscreteState::SymbolTable(table) if table.is_full() => "full",
            DiscreteState::SymbolTable(_) => "filling",
        }
    }
}

fn mismatch(transition: &Transition, kind: EntityKind) -> TransitionError {
    TransitionError::KindMismatch {
        transition: transition.name(),
        kind: kind.name(),
    }
}

fn apply_door(
    door: &DoorState,
    transition: &Transition,
) -> Result<Option<DiscreteState>, TransitionError> {
    match transition {
        Transition::SetDoorOpen(open) if door.open == *open => Ok(None),
        Transition::SetDoorOpen(open) => Ok(Some(DiscreteState::Door(DoorState {
            open: *open,
            required_key: door.required_key.clone(),
        }))),
        _ => Err(mismatch(transition, EntityKind::Door)),
    }
}

fn apply_lever(
    lever: &LeverState,
    transition: &Transition,
) -> Result<Option<DiscreteState>, TransitionError> {
    let next = match transition {
        Transition::ArmLever(armed) => LeverState {
            armed: *armed,
            activated: lever.activated,
        },
        Transition::ActivateLever => {
            if lever.activated {
                return Ok(None);
            }
            if !lever.armed {
                return Err(TransitionError::Rejected {
                    transition: transition.name(),
                    reason: "lever is not armed",
                });
            }
            LeverState {
                armed: true,
                activated: true,
            }
        }
        Transition::ResetLever => LeverState::default(),
        _ => return Err(mismatch(transition, EntityKind::Lever)),
    };

    if next == *lever {
        Ok(None)
    } else {
        Ok(Some(DiscreteState::Lever(next)))
    }
}

fn apply_rune_slot(
    slot: &RuneSlotState,
    transition: &Transition,
) -> Result<Option<DiscreteState>, TransitionError> {
    match transition {
        Transition::PlaceRune { item, rune } => match &slot.placed {
            Some(placed) if placed.item == *item && placed.rune == *rune => Ok(None),
            Some(_) => Err(TransitionError::Rejected {
                transition: transition.name(),
                reason: "slot is occupied",
            }),
            None => Ok(Some(DiscreteState::RuneSlot(RuneSlotState {
                required_rune: slot.required_rune.clone(),
                placed: Some(PlacedRune {
                    item: *item,
                    rune: rune.clone(),
                }),
            }))),
        },
        Transition::WithdrawRune => match slot.placed {
            None => Ok(None),
            Some(_) => Ok(Some(DiscreteState::RuneSlot(RuneSlotState {
                required_rune: slot.required_rune.clone(),
                placed: None,
            }))),
        },
        _ => Err(mismatch(transition, EntityKind::RuneSlot)),
    }
}

fn apply_item(
    item: &ItemState,
    transition: &Transition,
) -> Result<Option<DiscreteState>, TransitionError> {
    let custody = match transition {
        Transition::PickUp { holder } => match item.custody {
            ItemCustody::Held(current) if current != *holder => {
                return Err(TransitionError::Rejected {
                    transition: transition.name(),
                    reason: "item is held by another peer",
                })
            }
            _ => ItemCustody::Held(*holder),
        },
        Transition::Drop => ItemCustody::Free,
        Transition::PlaceInto { slot } => ItemCustody::Placed(*slot),
        _ => return Err(mismatch(transition, EntityKind::Item)),
    };

    if custody == item.custody {
        return Ok(None);
    }
    Ok(Some(DiscreteState::Item(ItemState {
        tag: item.tag.clone(),
        custody,
    })))
}

fn apply_puzzle(
    puzzle: &PuzzleState,
    transition: &Transition,
) -> Result<Option<DiscreteState>, TransitionError> {
    let mut next = puzzle.clone();
    match transition {
        Transition::ClearStage => next.cleared = true,
        Transition::ResetStage => {
            next.cleared = false;
            next.counted_levers.clear();
        }
        Transition::CountLever { lever } => {
            if let Err(index) = next.counted_levers.binary_search(lever) {
                next.counted_levers.insert(index, *lever);
            }
        }
        Transition::SolvePuzzle => next.solved = true,
        _ => return Err(mismatch(transition, EntityKind::Puzzle)),
    }

    if next == *puzzle {
        Ok(None)
    } else {
        Ok(Some(DiscreteState::Puzzle(next)))
    }
}

fn apply_symbol_table(
    table: &SymbolTableState,
    transition: &Transition,
) -> Result<Option<DiscreteState>, TransitionError> {
    let rejected = |reason| TransitionError::Rejected {
        transition: transition.name(),
        reason,
    };
    let mut next = table.clone();
    match transition {
        Transition::ChooseLayout { layout, sequence } => match table.layout {
            Some(chosen) if chosen == *layout && table.sequence == *sequence => return Ok(None),
            Some(_) => return Err(rejected("layout is already chosen")),
            None => {
                next.layout = Some(*layout);
                next.sequence = sequence.clone();
            }
        },
        Transition::PlaceSymbol { item, symbol } => {
            if table.placed.iter().any(|placed| placed.item == *item) {
                return Ok(None);
            }
            if table.layout.is_none() {
                return Err(rejected("no layout is chosen"));
            }
            if table.solved || table.is_full() {
                return Err(rejected("table is full"));
            }
            next.placed.push(PlacedSymbol {
                item: *item,
                symbol: symbol.clone(),
            });
        }
        Transition::RetrieveSymbol { item } => {
            let Some(position) = table.placed.iter().position(|placed| placed.item == *item) else {
                return Ok(None);
            };
            if table.solved {
                return Err(rejected("table is solved"));
            }
            if position + 1 != table.placed.len() {
                return Err(rejected("only the last symbol can be retrieved"));
            }
            next.placed.pop();
        }
        Transition::SolveTable => next.solved = true,
        _ => return Err(mismatch(transition, EntityKind::SymbolTable)),
    }

    if next == *table {
        Ok(None)
    } else {
        Ok(Some(DiscreteState::SymbolTable(next)))
    }
}
