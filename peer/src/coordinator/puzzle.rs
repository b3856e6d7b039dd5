use catacomb_shared::{DiscreteState, NetEntity, PuzzleState, Transition};

use crate::{scene::PuzzleConfig, world::EntityStore};

/// Decide which transitions bring a rune puzzle in line with its slots and
/// levers. Pure: reads the replica, changes nothing.
///
/// A solved puzzle is terminal. Doors that were opened stay open when a
/// stage is reset.
pub fn evaluate_puzzle(config: &PuzzleConfig, store: &EntityStore) -> Vec<(NetEntity, Transition)> {
    let Some(DiscreteState::Puzzle(puzzle)) = store.get(&config.puzzle).map(|r| r.discrete()) else {
        return Vec::new();
    };
    if puzzle.solved {
        return Vec::new();
    }

    let slots_correct = !config.slots.is_empty()
        && config.slots.iter().all(|slot| {
            matches!(
                store.get(slot).map(|r| r.discrete()),
                Some(DiscreteState::RuneSlot(state)) if state.is_correct()
            )
        });

    let mut actions = Vec::new();
    if !puzzle.cleared {
        if !slots_correct {
            return actions;
        }
        actions.push((config.puzzle, Transition::ClearStage));
        if config.skip_levers || config.required_levers == 0 {
            solve(config, &mut actions);
        } else {
            for lever in &config.levers {
                actions.push((*lever, Transition::ArmLever(true)));
            }
        }
        return actions;
    }

    if !slots_correct {
        actions.push((config.puzzle, Transition::ResetStage));
        for lever in &config.levers {
            actions.push((*lever, Transition::ResetLever));
        }
        return actions;
    }

    if config.skip_levers || config.required_levers == 0 {
        solve(config, &mut actions);
        return actions;
    }

    count_levers(config, puzzle, store, &mut actions);
    actions
}

fn count_levers(
    config: &PuzzleConfig,
    puzzle: &PuzzleState,
    store: &EntityStore,
    actions: &mut Vec<(NetEntity, Transition)>,
) {
    let mut count = puzzle.lever_count();
    for lever in &config.levers {
        let activated = matches!(
            store.get(lever).map(|r| r.discrete()),
            Some(DiscreteState::Lever(state)) if state.activated
        );
        if activated && puzzle.counted_levers.binary_search(lever).is_err() {
            actions.push((config.puzzle, Transition::CountLever { lever: *lever }));
            count += 1;
        }
    }

    if count >= config.required_levers {
        solve(config, actions);
    }
}

fn solve(config: &PuzzleConfig, actions: &mut Vec<(NetEntity, Transition)>) {
    actions.push((config.puzzle, Transition::SolvePuzzle));
    for door in &config.doors {
        actions.push((*door, Transition::SetDoorOpen(true)));
    }
}
