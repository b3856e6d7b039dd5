/// The elevator departs only once every connected peer stands inside it.

use catacomb_peer::{Peer, SessionSignal};
use catacomb_shared::{DiscreteState, DoorState, ElevatorState, PlaneGround, Transition, Vec3};
use catacomb_test::{
    assert_discrete_converged, elevator_scene,
    helpers::scenes::{ELEVATOR, ELEVATOR_DOOR},
    join, tick_all_n, tick_collecting_signals, LocalHub,
};

fn departed(peer: &Peer) -> bool {
    matches!(
        peer.discrete(&ELEVATOR),
        Some(DiscreteState::Elevator(ElevatorState { departed: true }))
    )
}

#[test]
fn departs_when_everyone_is_inside() {
    let hub = LocalHub::new();
    let mut peers = vec![join(&hub, elevator_scene()), join(&hub, elevator_scene())];
    tick_all_n(&mut peers, 2);
    assert_eq!(
        peers[0].act(ELEVATOR_DOOR, Transition::SetDoorOpen(true)),
        Ok(true)
    );

    peers[0]
        .spawn_avatar(Vec3::ZERO, Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    let signals = tick_collecting_signals(&mut peers, 5);
    assert!(signals.iter().all(Vec::is_empty));
    assert!(!departed(&peers[0]));

    peers[1]
        .spawn_avatar(Vec3::new(1.0, 0.0, 1.0), Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    let signals = tick_collecting_signals(&mut peers, 4);

    let arrived = SessionSignal::AllRequiredPeersPresent { elevator: ELEVATOR };
    for seen in &signals {
        assert_eq!(seen, &vec![arrived]);
    }
    for peer in &peers {
        assert!(departed(peer));
        assert_eq!(
            peer.discrete(&ELEVATOR_DOOR),
            Some(&DiscreteState::Door(DoorState {
                open: false,
                required_key: None
            }))
        );
    }
    assert_discrete_converged(&peers, &ELEVATOR);
}

#[test]
fn avatar_outside_the_bounds_holds_the_elevator() {
    let hub = LocalHub::new();
    let mut peers = vec![join(&hub, elevator_scene()), join(&hub, elevator_scene())];
    tick_all_n(&mut peers, 2);

    peers[0]
        .spawn_avatar(Vec3::ZERO, Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    peers[1]
        .spawn_avatar(Vec3::new(10.0, 0.0, 0.0), Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    tick_all_n(&mut peers, 10);

    assert!(!departed(&peers[0]));
    assert!(!departed(&peers[1]));
}
