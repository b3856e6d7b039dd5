mod coordinator_queue;
mod elevator;
mod puzzle;
mod symbol_table;

pub use coordinator_queue::CoordinatorQueue;
pub use elevator::evaluate_elevator;
pub use puzzle::evaluate_puzzle;
pub use symbol_table::evaluate_symbol_table;
