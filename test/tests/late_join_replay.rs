/// A peer that connects after discrete changes were made must end up with
/// the same world as everyone else, from the relay's buffered log alone.

use catacomb_peer::{
    CueEvent, DespawnEntityEvent, Interaction, InteractionUnavailableEvent, OwnershipGrantedEvent,
    PeerError, SpawnEntityEvent,
};
use catacomb_shared::{
    Cue, DiscreteState, DoorState, ItemCustody, ItemState, PlaneGround, Transition, Vec3,
};
use catacomb_test::{
    assert_discrete_converged, assert_single_owner, door_scene,
    helpers::scenes::{DOOR, ITEM},
    item_scene, join, tick_all_n, LocalHub,
};

#[test]
fn late_joiner_sees_door_opened_before_it_arrived() {
    let hub = LocalHub::new();
    let mut first = join(&hub, door_scene());
    first.tick();
    assert_eq!(first.act(DOOR, Transition::SetDoorOpen(true)), Ok(true));

    let second = join(&hub, door_scene());
    let mut peers = vec![first, second];
    tick_all_n(&mut peers, 2);

    assert_eq!(
        peers[1].discrete(&DOOR),
        Some(&DiscreteState::Door(DoorState {
            open: true,
            required_key: None
        }))
    );
    assert_discrete_converged(&peers, &DOOR);
    assert_eq!(peers[1].interaction_text(&DOOR).as_deref(), Some("Door (Open)"));
}

#[test]
fn cues_are_not_replayed() {
    let hub = LocalHub::new();
    let mut first = join(&hub, door_scene());
    first.tick();
    first.cue(DOOR, Cue::LockedDoor).unwrap();

    let mut second = join(&hub, door_scene());
    second.tick();
    let mut events = second.take_events();
    assert_eq!(events.read::<CueEvent>().count(), 0);
}

#[test]
fn despawned_avatar_is_never_replayed() {
    let hub = LocalHub::new();
    let mut first = join(&hub, door_scene());
    first.tick();
    let avatar = first
        .spawn_avatar(Vec3::ZERO, Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    assert!(hub.buffers_entity(&avatar));

    first.despawn(avatar).unwrap();
    assert!(!hub.buffers_entity(&avatar));
    assert!(!first.has_entity(&avatar));

    let mut second = join(&hub, door_scene());
    second.tick();
    assert!(!second.has_entity(&avatar));
    let mut events = second.take_events();
    assert_eq!(events.read::<SpawnEntityEvent>().count(), 0);
    assert_eq!(events.read::<DespawnEntityEvent>().count(), 0);
}

#[test]
fn avatar_spawned_before_join_is_replayed_to_late_joiner() {
    let hub = LocalHub::new();
    let mut first = join(&hub, door_scene());
    first.tick();
    let avatar = first
        .spawn_avatar(Vec3::new(2.0, 0.0, 2.0), Box::new(PlaneGround::flat(0.0)))
        .unwrap();

    let mut second = join(&hub, door_scene());
    second.tick();
    assert!(second.has_entity(&avatar));
    assert_eq!(second.owner_of(&avatar), Some(first.local_peer()));
    assert!(!second.is_owner(&avatar));
}

#[test]
fn late_joiner_knows_the_coordinator_before_its_first_tick() {
    let hub = LocalHub::new();
    let mut first = join(&hub, door_scene());
    first.tick();

    let mut second = join(&hub, door_scene());
    assert!(!second.is_coordinator());
    assert_eq!(second.coordinator(), first.local_peer());
    assert!(!second.is_owner(&DOOR));
    let mut events = second.take_events();
    assert_eq!(events.read::<OwnershipGrantedEvent>().count(), 0);

    assert!(matches!(
        second.act(DOOR, Transition::SetDoorOpen(true)),
        Err(PeerError::NotOwner { .. })
    ));
}

#[test]
fn late_joiner_picking_up_a_held_item_before_ticking_stays_consistent() {
    let hub = LocalHub::new();
    let mut first = join(&hub, item_scene());
    first.tick();
    first.interact(Interaction::PickUp { item: ITEM }).unwrap();
    assert_eq!(first.held_item(), Some(ITEM));

    let mut second = join(&hub, item_scene());
    second.interact(Interaction::PickUp { item: ITEM }).unwrap();

    let mut peers = vec![first, second];
    tick_all_n(&mut peers, 5);

    let holder = peers[0].local_peer();
    for peer in &peers {
        match peer.discrete(&ITEM) {
            Some(DiscreteState::Item(ItemState { custody, .. })) => {
                assert_eq!(*custody, ItemCustody::Held(holder));
            }
            other => panic!("unexpected item state {:?}", other),
        }
    }
    assert_discrete_converged(&peers, &ITEM);
    assert_single_owner(&peers, &ITEM);
    assert_eq!(peers[1].held_item(), None);

    let mut events = peers[1].take_events();
    let refused: Vec<_> = events.read::<InteractionUnavailableEvent>().collect();
    assert_eq!(refused, vec![(ITEM, "Item Unavailable".to_string())]);
}
