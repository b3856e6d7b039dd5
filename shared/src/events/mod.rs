mod buffered_log;
mod discrete_event;
mod error;
mod state;
mod transition;

pub use buffered_log::{BufferSlot, BufferedEventLog};
pub use discrete_event::DiscreteEvent;
pub use error::TransitionError;
pub use state::{
    DiscreteState, DoorState, ElevatorState, ItemCustody, ItemState, LeverState, ObstacleState,
    PlacedRune, PlacedSymbol, PuzzleState, RuneSlotState, SymbolTableState,
};
pub use transition::{Cue, Transition};
