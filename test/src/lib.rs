//! # Catacomb Test
//! Harness for running several peers in one process: an in-memory relay
//! standing in for the network, plus scenes and helpers shared by the
//! end-to-end tests.

pub mod helpers;
pub mod local_hub;

pub use helpers::*;
pub use local_hub::{HubEndpoint, LinkConditions, LocalHub};
