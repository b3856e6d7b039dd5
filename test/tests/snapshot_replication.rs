/// Continuous state streamed over an unreliable link.

use catacomb_peer::{PresentationChangedEvent, PresentationState};
use catacomb_shared::{
    ContinuousChannels, DiscreteState, LocomotionInput, ObstacleState, PlaneGround,
    PresentationTag, Transition, Vec3,
};
use catacomb_test::{
    door_scene, helpers::scenes::OBSTACLE, join, obstacle_scene, tick_all, tick_all_n,
    LinkConditions, LocalHub,
};

#[test]
fn remote_avatar_never_moves_backwards_over_a_lossy_link() {
    let hub = LocalHub::with_conditions(LinkConditions::lossy(0.3, 0.3), 11);
    let mut peers = vec![join(&hub, door_scene()), join(&hub, door_scene())];
    tick_all_n(&mut peers, 2);

    let avatar = peers[0]
        .spawn_avatar(Vec3::ZERO, Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    peers[0].set_input(LocomotionInput::forward());

    let mut last_z = 0.0;
    for _ in 0..120 {
        tick_all(&mut peers);
        if let Some(state) = peers[1].continuous(&avatar) {
            assert!(state.position.z >= last_z);
            last_z = state.position.z;
        }
    }
    assert!(last_z > 0.0);

    let mut events = peers[1].take_events();
    assert!(events
        .read::<PresentationChangedEvent>()
        .any(|change| change == (avatar, PresentationState::Locomotion(PresentationTag::Walking))));
}

#[test]
fn presented_position_converges_once_the_owner_stops() {
    let hub = LocalHub::with_conditions(LinkConditions::lossy(0.2, 0.2), 5);
    let mut peers = vec![join(&hub, door_scene()), join(&hub, door_scene())];
    tick_all_n(&mut peers, 2);

    let avatar = peers[0]
        .spawn_avatar(Vec3::ZERO, Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    peers[0].set_input(LocomotionInput::forward());
    tick_all_n(&mut peers, 60);
    peers[0].set_input(LocomotionInput::default());
    tick_all_n(&mut peers, 30);

    for _ in 0..200 {
        peers[1].present(1.0 / 60.0);
    }

    let owned = peers[0].continuous(&avatar).unwrap().position;
    let presented = peers[1].presented(&avatar).unwrap().position;
    assert!(owned.z > 1.0);
    assert!(owned.distance(presented) < 1e-3);
}

#[test]
fn paused_obstacle_stops_on_every_peer() {
    let hub = LocalHub::new();
    let mut peers = vec![join(&hub, obstacle_scene()), join(&hub, obstacle_scene())];
    tick_all_n(&mut peers, 30);
    assert!(peers[0].is_owner(&OBSTACLE));
    let remote = peers[1].continuous(&OBSTACLE).unwrap().position;
    assert!(remote.x > 0.0);

    assert_eq!(
        peers[0].act(OBSTACLE, Transition::SetObstacleMoving(false)),
        Ok(true)
    );
    tick_all_n(&mut peers, 3);
    let stopped = peers[0].continuous(&OBSTACLE).unwrap().position;
    tick_all_n(&mut peers, 30);

    assert_eq!(peers[0].continuous(&OBSTACLE).unwrap().position, stopped);
    let remote = peers[1].continuous(&OBSTACLE).unwrap();
    assert_eq!(remote.position, stopped);
    assert_eq!(remote.channels, ContinuousChannels::Obstacle { moving: false });
    assert_eq!(
        peers[1].discrete(&OBSTACLE),
        Some(&DiscreteState::Obstacle(ObstacleState { moving: false }))
    );
}
