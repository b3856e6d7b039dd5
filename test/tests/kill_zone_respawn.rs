/// Avatars that fall into a kill zone come back at its respawn point.

use catacomb_peer::{CueEvent, PeerConfig, SceneDefinition};
use catacomb_shared::{Bounds, Cue, LocomotionInput, PlaneGround, PresentationTag, Vec3};
use catacomb_test::{door_scene, join_with, tick_all, tick_all_n, LocalHub};

const RESPAWN: Vec3 = Vec3::new(0.0, 0.0, -4.0);

fn pit_scene() -> SceneDefinition {
    door_scene().with_kill_zone(
        Bounds::new(Vec3::new(-1.0, -1.0, 3.0), Vec3::new(1.0, 3.0, 5.0)),
        Some(RESPAWN),
    )
}

fn config() -> PeerConfig {
    PeerConfig {
        respawn_delay: 0.5,
        rng_seed: Some(7),
        ..Default::default()
    }
}

#[test]
fn avatar_walking_into_a_kill_zone_respawns_on_every_peer() {
    let hub = LocalHub::new();
    let mut peers = vec![
        join_with(&hub, pit_scene(), config()),
        join_with(&hub, pit_scene(), config()),
    ];
    tick_all_n(&mut peers, 2);

    let avatar = peers[0]
        .spawn_avatar(Vec3::ZERO, Box::new(PlaneGround::flat(0.0)))
        .unwrap();
    peers[0].set_input(LocomotionInput::forward());

    let mut ticks = 0;
    while !peers[0].is_avatar_dead() {
        tick_all(&mut peers);
        ticks += 1;
        assert!(ticks < 120, "avatar never reached the kill zone");
    }
    peers[0].set_input(LocomotionInput::default());
    let died_at = peers[0].continuous(&avatar).unwrap().position;
    assert!(died_at.z >= 3.0);

    tick_all_n(&mut peers, 10);
    assert!(peers[0].is_avatar_dead());
    assert_eq!(peers[0].continuous(&avatar).unwrap().position, died_at);

    tick_all_n(&mut peers, 30);
    assert!(!peers[0].is_avatar_dead());
    for peer in &peers {
        let state = peer.continuous(&avatar).unwrap();
        assert!(state.position.distance(RESPAWN) < 0.1);
        assert_eq!(state.presentation_tag(), Some(PresentationTag::Idle));
    }

    let mut events = peers[1].take_events();
    let cues: Vec<Cue> = events
        .read::<CueEvent>()
        .filter(|(entity, _)| *entity == avatar)
        .map(|(_, cue)| cue)
        .collect();
    assert_eq!(
        cues,
        vec![
            Cue::Died,
            Cue::BodyVisible(false),
            Cue::BodyVisible(true),
            Cue::Respawned
        ]
    );
}

#[test]
fn zone_without_a_respawn_point_respawns_above_the_death() {
    let hub = LocalHub::new();
    let scene = door_scene().with_kill_zone(
        Bounds::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 0.5, 1.0)),
        None,
    );
    let config = PeerConfig {
        respawn_delay: 0.0,
        ..config()
    };
    let mut peers = vec![join_with(&hub, scene, config)];

    let avatar = peers[0]
        .spawn_avatar(Vec3::new(0.0, 0.0, 0.5), Box::new(PlaneGround::flat(-5.0)))
        .unwrap();
    tick_all(&mut peers);
    assert!(peers[0].is_avatar_dead());
    let died_at = peers[0].continuous(&avatar).unwrap().position;

    tick_all(&mut peers);
    assert!(!peers[0].is_avatar_dead());
    let respawned = peers[0].continuous(&avatar).unwrap().position;
    assert!(respawned.y > died_at.y);
}
