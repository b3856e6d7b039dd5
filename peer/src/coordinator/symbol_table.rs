use catacomb_shared::{DiscreteState, NetEntity, Transition};

use crate::{scene::SymbolPuzzleConfig, world::EntityStore};

/// Solve a symbol table once it holds its layout's sequence and open its
/// doors. A wrongly filled table waits for players to take symbols back.
pub fn evaluate_symbol_table(
    config: &SymbolPuzzleConfig,
    store: &EntityStore,
) -> Vec<(NetEntity, Transition)> {
    let Some(DiscreteState::SymbolTable(table)) = store.get(&config.table).map(|r| r.discrete())
    else {
        return Vec::new();
    };
    if table.solved || !table.is_correct() {
        return Vec::new();
    }

    let mut actions = vec![(config.table, Transition::SolveTable)];
    for door in &config.doors {
        actions.push((*door, Transition::SetDoorOpen(true)));
    }
    actions
}
