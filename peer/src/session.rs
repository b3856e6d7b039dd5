use catacomb_shared::{NetEntity, PeerId, SessionRoster};

/// The single item slot of the local player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    held: Option<NetEntity>,
}

impl Inventory {
    pub fn new() -> Self {
        Self { held: None }
    }

    pub fn held(&self) -> Option<NetEntity> {
        self.held
    }

    pub fn is_full(&self) -> bool {
        self.held.is_some()
    }

    pub(crate) fn hold(&mut self, item: NetEntity) {
        self.held = Some(item);
    }

    /// Empties the slot if it holds `item`. Returns whether it did.
    pub(crate) fn release(&mut self, item: &NetEntity) -> bool {
        if self.held.as_ref() == Some(item) {
            self.held = None;
            return true;
        }
        false
    }
}

/// Session-scoped state handed to the components that need it: who is
/// connected and what the local player carries.
#[derive(Clone, Debug)]
pub struct SessionContext {
    roster: SessionRoster,
    inventory: Inventory,
}

impl SessionContext {
    pub fn new(local: PeerId) -> Self {
        Self {
            roster: SessionRoster::new(local),
            inventory: Inventory::new(),
        }
    }

    pub fn local(&self) -> PeerId {
        self.roster.local()
    }

    pub fn roster(&self) -> &SessionRoster {
        &self.roster
    }

    pub(crate) fn roster_mut(&mut self) -> &mut SessionRoster {
        &mut self.roster
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}
