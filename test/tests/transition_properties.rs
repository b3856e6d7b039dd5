/// Properties every peer relies on to converge without coordination.

use proptest::prelude::*;

use catacomb_shared::{
    ContinuousState, Cue, DiscreteState, DoorState, ElevatorState, ItemCustody, ItemState,
    LeverState, NetEntity, ObstacleState, PeerId, PlacedRune, PlacedSymbol, PuzzleState,
    RuneSlotState, SnapshotReceiver, SnapshotSender, SymbolTableState, Transition, Vec3,
};

fn entity() -> impl Strategy<Value = NetEntity> {
    (0u32..4).prop_map(NetEntity::scene)
}

fn peer() -> impl Strategy<Value = PeerId> {
    (0u16..4).prop_map(PeerId::new)
}

fn rune() -> impl Strategy<Value = String> {
    prop_oneof![Just("fire".to_string()), Just("water".to_string())]
}

fn custody() -> impl Strategy<Value = ItemCustody> {
    prop_oneof![
        Just(ItemCustody::Free),
        peer().prop_map(ItemCustody::Held),
        entity().prop_map(ItemCustody::Placed),
    ]
}

fn state() -> impl Strategy<Value = DiscreteState> {
    prop_oneof![
        any::<bool>().prop_map(|open| DiscreteState::Door(DoorState {
            open,
            required_key: None
        })),
        (any::<bool>(), any::<bool>())
            .prop_map(|(armed, activated)| DiscreteState::Lever(LeverState { armed, activated })),
        (rune(), proptest::option::of((entity(), rune()))).prop_map(|(required_rune, placed)| {
            DiscreteState::RuneSlot(RuneSlotState {
                required_rune,
                placed: placed.map(|(item, rune)| PlacedRune { item, rune }),
            })
        }),
        (rune(), custody()).prop_map(|(tag, custody)| DiscreteState::Item(ItemState { tag, custody })),
        any::<bool>().prop_map(|moving| DiscreteState::Obstacle(ObstacleState { moving })),
        (any::<bool>(), any::<bool>(), proptest::collection::btree_set(entity(), 0..3)).prop_map(
            |(cleared, solved, levers)| DiscreteState::Puzzle(PuzzleState {
                cleared,
                solved,
                counted_levers: levers.into_iter().collect(),
            })
        ),
        any::<bool>().prop_map(|departed| DiscreteState::Elevator(ElevatorState { departed })),
        (
            proptest::option::of(0u32..2),
            proptest::collection::vec(rune(), 0..3),
            proptest::collection::btree_map(entity(), rune(), 0..3),
            any::<bool>(),
        )
            .prop_map(|(layout, sequence, placed, solved)| {
                DiscreteState::SymbolTable(SymbolTableState {
                    layout,
                    sequence,
                    placed: placed
                        .into_iter()
                        .map(|(item, symbol)| PlacedSymbol { item, symbol })
                        .collect(),
                    solved,
                })
            }),
    ]
}

fn transition() -> impl Strategy<Value = Transition> {
    prop_oneof![
        any::<bool>().prop_map(Transition::SetDoorOpen),
        any::<bool>().prop_map(Transition::ArmLever),
        Just(Transition::ActivateLever),
        Just(Transition::ResetLever),
        (entity(), rune()).prop_map(|(item, rune)| Transition::PlaceRune { item, rune }),
        Just(Transition::WithdrawRune),
        peer().prop_map(|holder| Transition::PickUp { holder }),
        Just(Transition::Drop),
        entity().prop_map(|slot| Transition::PlaceInto { slot }),
        any::<bool>().prop_map(Transition::SetObstacleMoving),
        Just(Transition::ClearStage),
        Just(Transition::ResetStage),
        entity().prop_map(|lever| Transition::CountLever { lever }),
        Just(Transition::SolvePuzzle),
        Just(Transition::Depart),
        ((0u32..2), proptest::collection::vec(rune(), 0..3))
            .prop_map(|(layout, sequence)| Transition::ChooseLayout { layout, sequence }),
        (entity(), rune()).prop_map(|(item, symbol)| Transition::PlaceSymbol { item, symbol }),
        entity().prop_map(|item| Transition::RetrieveSymbol { item }),
        Just(Transition::SolveTable),
        Just(Transition::Cue(Cue::LeverPulled)),
    ]
}

proptest! {
    #[test]
    fn applying_a_transition_twice_equals_applying_it_once(
        initial in state(),
        transition in transition(),
    ) {
        if let Ok(Some(next)) = initial.apply(&transition) {
            prop_assert_eq!(next.apply(&transition), Ok(None));
        }
    }

    #[test]
    fn shuffled_snapshots_are_accepted_in_increasing_order(
        order in Just((0..24).collect::<Vec<usize>>()).prop_shuffle(),
        start in any::<u16>(),
    ) {
        let entity = NetEntity::scene(1);
        let mut sender = SnapshotSender::new(entity, Some(start));
        let snapshots: Vec<_> = (0..24)
            .map(|tick| sender.next_snapshot(1, tick, ContinuousState::at(Vec3::ZERO)))
            .collect();

        let mut receiver = SnapshotReceiver::new();
        let mut accepted = Vec::new();
        for index in order {
            if receiver.accept(&snapshots[index]) {
                accepted.push(index);
            }
        }

        prop_assert!(!accepted.is_empty());
        prop_assert!(accepted.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
