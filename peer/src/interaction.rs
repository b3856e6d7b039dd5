use catacomb_shared::{
    Cue, DiscreteState, DoorState, EntityError, EntityKind, ItemCustody, ItemState, LeverState,
    NetEntity, RuneSlotState, SymbolTableState, Transition, Vec3,
};

use crate::{intent::Intent, session::SessionContext, world::EntityStore};

const INVENTORY_FULL: &str = "Inventory Full";
const ITEM_UNAVAILABLE: &str = "Item Unavailable";
const DOOR_LOCKED: &str = "Door (Locked)";
const NEED_RUNE: &str = "Need a rune to place";
const SLOT_OCCUPIED: &str = "Slot occupied";
const LEVER_LOCKED: &str = "Complete the rune puzzle first";
const LEVER_ACTIVATED: &str = "Already activated";
const NEED_SYMBOL: &str = "Need a symbol to place";
const TABLE_FULL: &str = "Table Full";
const TABLE_UNSET: &str = "Place symbols here";
const TABLE_SOLVED: &str = "Puzzle Complete";

/// Something the local player tries to do to the world.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    PickUp { item: NetEntity },
    /// Put the held item down at `position`
    Drop { position: Vec3 },
    UseDoor { door: NetEntity },
    PlaceRune { slot: NetEntity },
    /// Take a wrongly placed rune back into the hand
    WithdrawRune { slot: NetEntity },
    PullLever { lever: NetEntity },
    /// Put the held item on a symbol table, after the symbols already there
    PlaceSymbol { table: NetEntity },
    /// Take the last placed symbol back into the hand
    RetrieveSymbol { table: NetEntity },
}

/// What an interaction turns into, judged from the local replica.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionPlan {
    Ready(Intent),
    Unavailable {
        entity: NetEntity,
        text: String,
        cue: Option<Cue>,
    },
    /// Nothing to do, for example dropping with empty hands
    Ignored,
}

impl InteractionPlan {
    fn unavailable(entity: NetEntity, text: impl Into<String>) -> Self {
        InteractionPlan::Unavailable {
            entity,
            text: text.into(),
            cue: None,
        }
    }
}

pub fn plan(
    interaction: &Interaction,
    store: &EntityStore,
    context: &SessionContext,
) -> Result<InteractionPlan, EntityError> {
    let local = context.local();
    let held = context.inventory().held();

    match interaction {
        Interaction::PickUp { item } => {
            let state = item_state(store, item)?;
            if context.inventory().is_full() {
                return Ok(InteractionPlan::unavailable(*item, INVENTORY_FULL));
            }
            if state.custody != ItemCustody::Free {
                return Ok(InteractionPlan::unavailable(*item, ITEM_UNAVAILABLE));
            }
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*item, Transition::PickUp { holder: local })
                    .unavailable_text(ITEM_UNAVAILABLE),
            ))
        }
        Interaction::Drop { position } => {
            let Some(item) = held else {
                return Ok(InteractionPlan::Ignored);
            };
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(item, Transition::Drop)
                    .reposition(item, *position)
                    .unavailable_text(ITEM_UNAVAILABLE),
            ))
        }
        Interaction::UseDoor { door } => {
            let state = door_state(store, door)?;
            if state.open {
                return Ok(InteractionPlan::Ignored);
            }
            if !holds_key(store, held, state) {
                return Ok(InteractionPlan::Unavailable {
                    entity: *door,
                    text: DOOR_LOCKED.to_string(),
                    cue: Some(Cue::LockedDoor),
                });
            }
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*door, Transition::SetDoorOpen(true))
                    .unavailable_text(DOOR_LOCKED),
            ))
        }
        Interaction::PlaceRune { slot } => {
            let state = rune_slot_state(store, slot)?;
            if state.placed.is_some() {
                return Ok(InteractionPlan::unavailable(*slot, SLOT_OCCUPIED));
            }
            let Some(item) = held else {
                return Ok(InteractionPlan::unavailable(*slot, NEED_RUNE));
            };
            let rune = item_state(store, &item)?.tag.clone();
            let cue = if rune == state.required_rune {
                Cue::CorrectRune
            } else {
                Cue::WrongRune
            };
            let position = store.try_get(slot, "plan")?.continuous().position;
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*slot, Transition::PlaceRune { item, rune })
                    .step(item, Transition::PlaceInto { slot: *slot })
                    .reposition(item, position)
                    .cue(*slot, cue)
                    .unavailable_text(SLOT_OCCUPIED),
            ))
        }
        Interaction::WithdrawRune { slot } => {
            let state = rune_slot_state(store, slot)?;
            let Some(placed) = &state.placed else {
                return Ok(InteractionPlan::Ignored);
            };
            if state.is_correct() {
                return Ok(InteractionPlan::unavailable(
                    *slot,
                    format!("Rune placed: {}", state.required_rune),
                ));
            }
            if context.inventory().is_full() {
                return Ok(InteractionPlan::unavailable(*slot, INVENTORY_FULL));
            }
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*slot, Transition::WithdrawRune)
                    .step(placed.item, Transition::PickUp { holder: local })
                    .unavailable_text(ITEM_UNAVAILABLE),
            ))
        }
        Interaction::PullLever { lever } => {
            let state = lever_state(store, lever)?;
            if !state.armed {
                return Ok(InteractionPlan::unavailable(*lever, LEVER_LOCKED));
            }
            if state.activated {
                return Ok(InteractionPlan::unavailable(*lever, LEVER_ACTIVATED));
            }
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*lever, Transition::ActivateLever)
                    .cue(*lever, Cue::LeverPulled)
                    .unavailable_text(LEVER_ACTIVATED),
            ))
        }
        Interaction::PlaceSymbol { table } => {
            let state = symbol_table_state(store, table)?;
            let Some(item) = held else {
                return Ok(InteractionPlan::unavailable(*table, NEED_SYMBOL));
            };
            if state.solved {
                return Ok(InteractionPlan::unavailable(*table, TABLE_SOLVED));
            }
            if state.layout.is_none() {
                return Ok(InteractionPlan::unavailable(*table, TABLE_UNSET));
            }
            if state.is_full() {
                return Ok(InteractionPlan::unavailable(*table, TABLE_FULL));
            }
            let symbol = item_state(store, &item)?.tag.clone();
            let position = store.try_get(table, "plan")?.continuous().position;
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*table, Transition::PlaceSymbol { item, symbol })
                    .step(item, Transition::PlaceInto { slot: *table })
                    .reposition(item, position)
                    .cue(*table, Cue::SymbolPlaced)
                    .unavailable_text(TABLE_FULL),
            ))
        }
        Interaction::RetrieveSymbol { table } => {
            let state = symbol_table_state(store, table)?;
            let Some(last) = state.placed.last() else {
                return Ok(InteractionPlan::Ignored);
            };
            if state.solved {
                return Ok(InteractionPlan::unavailable(*table, TABLE_SOLVED));
            }
            if context.inventory().is_full() {
                return Ok(InteractionPlan::unavailable(*table, INVENTORY_FULL));
            }
            Ok(InteractionPlan::Ready(
                Intent::new()
                    .step(*table, Transition::RetrieveSymbol { item: last.item })
                    .step(last.item, Transition::PickUp { holder: local })
                    .unavailable_text(ITEM_UNAVAILABLE),
            ))
        }
    }
}

/// The hint shown while the player looks at `entity`.
pub fn prompt(
    entity: &NetEntity,
    store: &EntityStore,
    context: &SessionContext,
) -> Option<String> {
    let record = store.get(entity)?;
    let text = match record.discrete() {
        DiscreteState::Item(item) => match item.custody {
            ItemCustody::Held(holder) if holder == context.local() => "Drop Item (G)".to_string(),
            _ if context.inventory().is_full() => INVENTORY_FULL.to_string(),
            ItemCustody::Free => "Pick Up (E)".to_string(),
            _ => ITEM_UNAVAILABLE.to_string(),
        },
        DiscreteState::Door(door) => {
            if door.open {
                "Door (Open)".to_string()
            } else if holds_key(store, context.inventory().held(), door) {
                format!("Use {} (E)", door.required_key.as_deref().unwrap_or_default())
            } else {
                DOOR_LOCKED.to_string()
            }
        }
        DiscreteState::RuneSlot(slot) => {
            if slot.is_correct() {
                format!("Rune placed: {}", slot.required_rune)
            } else if slot.placed.is_some() {
                "Take back Rune (E)".to_string()
            } else {
                format!("Place {} (E)", slot.required_rune)
            }
        }
        DiscreteState::Lever(lever) => {
            if !lever.armed {
                LEVER_LOCKED.to_string()
            } else if lever.activated {
                LEVER_ACTIVATED.to_string()
            } else {
                "Activate Lever".to_string()
            }
        }
        DiscreteState::SymbolTable(table) => {
            if table.solved {
                TABLE_SOLVED.to_string()
            } else if context.inventory().is_full() {
                if table.is_full() {
                    TABLE_FULL.to_string()
                } else {
                    "Place Symbol (C)".to_string()
                }
            } else if !table.placed.is_empty() {
                "Retrieve Symbol (R)".to_string()
            } else {
                TABLE_UNSET.to_string()
            }
        }
        _ => return None,
    };
    Some(text)
}

fn holds_key(store: &EntityStore, held: Option<NetEntity>, door: &DoorState) -> bool {
    let (Some(key), Some(item)) = (door.required_key.as_deref(), held) else {
        return false;
    };
    matches!(
        store.get(&item).map(|record| record.discrete()),
        Some(DiscreteState::Item(state)) if state.tag == key
    )
}

fn unexpected(entity: &NetEntity, expected: EntityKind, actual: &DiscreteState) -> EntityError {
    EntityError::UnexpectedKind {
        entity: *entity,
        expected: expected.name(),
        actual: actual.kind().name(),
    }
}

fn item_state<'a>(store: &'a EntityStore, entity: &NetEntity) -> Result<&'a ItemState, EntityError> {
    match store.try_get(entity, "plan")?.discrete() {
        DiscreteState::Item(item) => Ok(item),
        other => Err(unexpected(entity, EntityKind::Item, other)),
    }
}

fn door_state<'a>(store: &'a EntityStore, entity: &NetEntity) -> Result<&'a DoorState, EntityError> {
    match store.try_get(entity, "plan")?.discrete() {
        DiscreteState::Door(door) => Ok(door),
        other => Err(unexpected(entity, EntityKind::Door, other)),
    }
}

fn rune_slot_state<'a>(
    store: &'a EntityStore,
    entity: &NetEntity,
) -> Result<&'a RuneSlotState, EntityError> {
    match store.try_get(entity, "plan")?.discrete() {
        DiscreteState::RuneSlot(slot) => Ok(slot),
        other => Err(unexpected(entity, EntityKind::RuneSlot, other)),
    }
}

fn lever_state<'a>(store: &'a EntityStore, entity: &NetEntity) -> Result<&'a LeverState, EntityError> {
    match store.try_get(entity, "plan")?.discrete() {
        DiscreteState::Lever(lever) => Ok(lever),
        other => Err(unexpected(entity, EntityKind::Lever, other)),
    }
}

fn symbol_table_state<'a>(
    store: &'a EntityStore,
    entity: &NetEntity,
) -> Result<&'a SymbolTableState, EntityError> {
    match store.try_get(entity, "plan")?.discrete() {
        DiscreteState::SymbolTable(table) => Ok(table),
        other => Err(unexpected(entity, EntityKind::SymbolTable, other)),
    }
}
