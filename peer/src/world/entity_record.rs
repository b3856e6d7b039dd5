use catacomb_shared::{
    ContinuousState, DiscreteState, EntityKind, Interpolator, SnapshotReceiver, SnapshotSender,
};

/// Local replica of one replicated entity.
pub struct EntityRecord {
    pub(crate) discrete: DiscreteState,
    pub(crate) continuous: ContinuousState,
    pub(crate) interpolator: Interpolator,
    pub(crate) receiver: SnapshotReceiver,
    /// Present while the local peer owns the entity
    pub(crate) sender: Option<SnapshotSender>,
}

impl EntityRecord {
    pub fn new(discrete: DiscreteState, continuous: ContinuousState) -> Self {
        Self {
            discrete,
            continuous,
            interpolator: Interpolator::new(continuous),
            receiver: SnapshotReceiver::new(),
            sender: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.discrete.kind()
    }

    pub fn discrete(&self) -> &DiscreteState {
        &self.discrete
    }

    pub fn continuous(&self) -> &ContinuousState {
        &self.continuous
    }

    pub fn presented(&self) -> &ContinuousState {
        self.interpolator.presented()
    }
}
