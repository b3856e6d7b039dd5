/// Rune placement across four peers, aggregated by the session coordinator.

use catacomb_peer::{CueEvent, Interaction, Peer, SessionSignal};
use catacomb_shared::{Cue, DiscreteState, DoorState, ItemCustody, ItemState, LeverState};
use catacomb_test::{
    assert_discrete_converged,
    helpers::scenes::{LEVERS, PUZZLE, PUZZLE_DOOR, RUNES, SLOTS},
    join, rune_puzzle_scene, tick_all_n, tick_collecting_signals, LocalHub,
};

fn session(hub: &LocalHub, size: usize, required_levers: usize) -> Vec<Peer> {
    let mut peers: Vec<Peer> = (0..size)
        .map(|_| join(hub, rune_puzzle_scene(required_levers)))
        .collect();
    tick_all_n(&mut peers, 2);
    peers
}

fn count(signals: &[SessionSignal], expected: SessionSignal) -> usize {
    signals.iter().filter(|signal| **signal == expected).count()
}

#[test]
fn three_correct_runes_in_one_tick_clear_the_stage_once() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 4, 1);

    for index in 0..3 {
        peers[index + 1]
            .interact(Interaction::PickUp { item: RUNES[index] })
            .unwrap();
    }
    tick_all_n(&mut peers, 3);
    for index in 0..3 {
        assert_eq!(peers[index + 1].held_item(), Some(RUNES[index]));
    }

    for index in 0..3 {
        peers[index + 1]
            .interact(Interaction::PlaceRune { slot: SLOTS[index] })
            .unwrap();
    }
    let signals = tick_collecting_signals(&mut peers, 6);

    let cleared = SessionSignal::StageCleared { puzzle: PUZZLE };
    for seen in &signals {
        assert_eq!(count(seen, cleared), 1);
        assert_eq!(count(seen, SessionSignal::PuzzleSolved { puzzle: PUZZLE }), 0);
    }
    for lever in LEVERS {
        assert_eq!(
            peers[3].discrete(&lever),
            Some(&DiscreteState::Lever(LeverState {
                armed: true,
                activated: false
            }))
        );
    }
    for index in 0..3 {
        assert_eq!(peers[index + 1].held_item(), None);
        assert_discrete_converged(&peers, &SLOTS[index]);
        assert_eq!(
            peers[0].discrete(&RUNES[index]),
            Some(&DiscreteState::Item(ItemState {
                tag: ["fire", "water", "earth"][index].to_string(),
                custody: ItemCustody::Placed(SLOTS[index]),
            }))
        );
    }
    assert_discrete_converged(&peers, &PUZZLE);
}

#[test]
fn pulling_the_required_lever_solves_and_opens_the_door() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 4, 1);
    for index in 0..3 {
        peers[index + 1]
            .interact(Interaction::PickUp { item: RUNES[index] })
            .unwrap();
    }
    tick_all_n(&mut peers, 3);
    for index in 0..3 {
        peers[index + 1]
            .interact(Interaction::PlaceRune { slot: SLOTS[index] })
            .unwrap();
    }
    tick_all_n(&mut peers, 6);
    assert_eq!(peers[2].interaction_text(&LEVERS[0]).as_deref(), Some("Activate Lever"));

    peers[2]
        .interact(Interaction::PullLever { lever: LEVERS[0] })
        .unwrap();
    let signals = tick_collecting_signals(&mut peers, 6);

    for seen in &signals {
        assert_eq!(count(seen, SessionSignal::PuzzleSolved { puzzle: PUZZLE }), 1);
    }
    for peer in &peers {
        assert_eq!(
            peer.discrete(&PUZZLE_DOOR),
            Some(&DiscreteState::Door(DoorState {
                open: true,
                required_key: None
            }))
        );
    }
    assert_discrete_converged(&peers, &PUZZLE);
    assert_discrete_converged(&peers, &LEVERS[0]);
}

#[test]
fn lever_is_locked_until_the_stage_is_cleared() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 2, 1);
    assert_eq!(
        peers[1].interaction_text(&LEVERS[0]).as_deref(),
        Some("Complete the rune puzzle first")
    );
    peers[1]
        .interact(Interaction::PullLever { lever: LEVERS[0] })
        .unwrap();
    tick_all_n(&mut peers, 3);
    assert_eq!(
        peers[0].discrete(&LEVERS[0]),
        Some(&DiscreteState::Lever(LeverState::default()))
    );
}

#[test]
fn wrong_rune_can_be_taken_back() {
    let hub = LocalHub::new();
    let mut peers = session(&hub, 2, 1);

    peers[1]
        .interact(Interaction::PickUp { item: RUNES[1] })
        .unwrap();
    tick_all_n(&mut peers, 3);
    peers[1]
        .interact(Interaction::PlaceRune { slot: SLOTS[0] })
        .unwrap();
    tick_all_n(&mut peers, 3);

    assert_eq!(
        peers[1].interaction_text(&SLOTS[0]).as_deref(),
        Some("Take back Rune (E)")
    );
    let mut events = peers[0].take_events();
    let cues: Vec<_> = events.read::<CueEvent>().collect();
    assert_eq!(cues, vec![(SLOTS[0], Cue::WrongRune)]);

    peers[1]
        .interact(Interaction::WithdrawRune { slot: SLOTS[0] })
        .unwrap();
    tick_all_n(&mut peers, 3);
    assert_eq!(peers[1].held_item(), Some(RUNES[1]));
    assert_eq!(
        peers[0].interaction_text(&SLOTS[0]).as_deref(),
        Some("Place fire (E)")
    );
    assert_discrete_converged(&peers, &SLOTS[0]);
    assert_discrete_converged(&peers, &PUZZLE);
}
