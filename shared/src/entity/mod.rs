pub mod entity_kind;
pub mod error;
pub mod net_entity;
