/// Competing and interrupted ownership requests between three peers.

use catacomb_peer::{Interaction, InteractionUnavailableEvent, Peer};
use catacomb_shared::{DiscreteState, ItemCustody, ItemState, OwnershipStatus, Vec3};
use catacomb_test::{
    assert_discrete_converged, assert_single_owner,
    helpers::scenes::ITEM,
    item_scene, join, tick_all_n, LocalHub,
};

fn session(hub: &LocalHub, size: usize) -> Vec<Peer> {
    let mut peers: Vec<Peer> = (0..size).map(|_| join(hub, item_scene())).collect();
    tick_all_n(&mut peers, 2);
    peers
}

fn custody(peer: &Peer) -> Option<ItemCustody> {
    match peer.discrete(&ITEM) {
        Some(DiscreteState::Item(ItemState { custody, .. })) => Some(*custody),
        _ => None,
    }
}

#[test]
fn simultaneous_pick_up_has_exactly_one_winner() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 3);
    let winner = peers[1].local_peer();

    peers[1].interact(Interaction::PickUp { item: ITEM }).unwrap();
    peers[2].interact(Interaction::PickUp { item: ITEM }).unwrap();
    assert_eq!(peers[1].ownership_status(&ITEM), Some(OwnershipStatus::Requested));
    assert_eq!(peers[2].ownership_status(&ITEM), Some(OwnershipStatus::Requested));

    tick_all_n(&mut peers, 3);

    assert_eq!(peers[1].held_item(), Some(ITEM));
    assert_eq!(peers[2].held_item(), None);
    assert_eq!(peers[2].pending_intents(), 0);
    for peer in &peers {
        assert_eq!(custody(peer), Some(ItemCustody::Held(winner)));
    }
    assert_single_owner(&peers, &ITEM);
    assert_discrete_converged(&peers, &ITEM);

    let mut events = peers[2].take_events();
    let unavailable: Vec<_> = events.read::<InteractionUnavailableEvent>().collect();
    assert_eq!(unavailable, vec![(ITEM, "Item Unavailable".to_string())]);
}

#[test]
fn loser_cannot_take_a_held_item_later() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 3);

    peers[1].interact(Interaction::PickUp { item: ITEM }).unwrap();
    tick_all_n(&mut peers, 3);
    assert_eq!(peers[2].interaction_text(&ITEM).as_deref(), Some("Item Unavailable"));

    peers[2].interact(Interaction::PickUp { item: ITEM }).unwrap();
    tick_all_n(&mut peers, 3);
    assert_eq!(peers[1].held_item(), Some(ITEM));
    assert_eq!(custody(&peers[2]), Some(ItemCustody::Held(peers[1].local_peer())));
}

#[test]
fn request_to_departed_owner_is_rerouted_to_coordinator() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 3);

    peers[2].interact(Interaction::PickUp { item: ITEM }).unwrap();
    tick_all_n(&mut peers, 3);
    peers[2]
        .interact(Interaction::Drop {
            position: Vec3::new(3.0, 0.5, 3.0),
        })
        .unwrap();
    tick_all_n(&mut peers, 2);
    assert_eq!(custody(&peers[1]), Some(ItemCustody::Free));
    assert_eq!(peers[1].owner_of(&ITEM), Some(peers[2].local_peer()));

    peers[1].interact(Interaction::PickUp { item: ITEM }).unwrap();
    let departed = peers.remove(2);
    hub.disconnect(departed.local_peer());

    tick_all_n(&mut peers, 4);
    assert_eq!(peers[1].held_item(), Some(ITEM));
    assert_eq!(custody(&peers[0]), Some(ItemCustody::Held(peers[1].local_peer())));
    assert_single_owner(&peers, &ITEM);
}
