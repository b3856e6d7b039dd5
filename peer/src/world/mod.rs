mod entity_record;
mod entity_store;

pub use entity_record::EntityRecord;
pub use entity_store::EntityStore;
