pub mod assertions;
pub mod session;

pub use assertions::{assert_discrete_converged, assert_single_owner};
pub use scenes::{
    door_scene, elevator_scene, item_scene, obstacle_scene, rune_puzzle_scene, symbol_scene,
};
pub use session::{join, join_with, tick_all, tick_all_n, tick_collecting_signals};
