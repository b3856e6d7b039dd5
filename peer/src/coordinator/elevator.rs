use catacomb_shared::{DiscreteState, EntityKind, NetEntity, SessionRoster, Transition};

use crate::{scene::ElevatorConfig, world::EntityStore};

/// Depart once every connected peer has an avatar inside the elevator.
pub fn evaluate_elevator(
    config: &ElevatorConfig,
    store: &EntityStore,
    roster: &SessionRoster,
) -> Vec<(NetEntity, Transition)> {
    match store.get(&config.elevator).map(|r| r.discrete()) {
        Some(DiscreteState::Elevator(state)) if !state.departed => {}
        _ => return Vec::new(),
    }

    let gathered = roster.peers().all(|peer| {
        store.iter().any(|(entity, record)| {
            record.kind() == EntityKind::Avatar
                && entity.spawner() == Some(peer)
                && config.bounds.contains(record.continuous().position)
        })
    });
    if !gathered {
        return Vec::new();
    }

    let mut actions = vec![(config.elevator, Transition::Depart)];
    for door in &config.doors {
        actions.push((*door, Transition::SetDoorOpen(false)));
    }
    actions
}
