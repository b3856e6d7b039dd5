use catacomb_shared::{Cue, NetEntity, Transition, Vec3};

/// A local action that needs ownership of one or more entities.
///
/// When every required entity is owned the steps are applied in order and
/// broadcast. Otherwise ownership is requested and the intent waits; if any
/// required entity is refused, times out or disappears the intent is dropped
/// and `unavailable_text` (when set) is shown to the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Intent {
    requires: Vec<NetEntity>,
    steps: Vec<(NetEntity, Transition)>,
    reposition: Vec<(NetEntity, Vec3)>,
    cues: Vec<(NetEntity, Cue)>,
    unavailable_text: Option<String>,
    /// Puzzle whose evaluation produced this intent
    puzzle: Option<usize>,
}

impl Intent {
    pub fn new() -> Self {
        Self {
            requires: Vec::new(),
            steps: Vec::new(),
            reposition: Vec::new(),
            cues: Vec::new(),
            unavailable_text: None,
            puzzle: None,
        }
    }

    pub fn from_steps(steps: Vec<(NetEntity, Transition)>) -> Self {
        let mut intent = Self::new();
        for (entity, transition) in steps {
            intent = intent.step(entity, transition);
        }
        intent
    }

    pub fn step(mut self, entity: NetEntity, transition: Transition) -> Self {
        self.require(entity);
        self.steps.push((entity, transition));
        self
    }

    /// Moves an owned entity once the steps have applied.
    pub fn reposition(mut self, entity: NetEntity, position: Vec3) -> Self {
        self.require(entity);
        self.reposition.push((entity, position));
        self
    }

    pub fn cue(mut self, entity: NetEntity, cue: Cue) -> Self {
        self.cues.push((entity, cue));
        self
    }

    pub fn unavailable_text(mut self, text: impl Into<String>) -> Self {
        self.unavailable_text = Some(text.into());
        self
    }

    /// Ties a coordinator decision to the puzzle it came from, so the
    /// puzzle is evaluated again if the intent is dropped.
    pub(crate) fn for_puzzle(mut self, index: usize) -> Self {
        self.puzzle = Some(index);
        self
    }

    pub(crate) fn puzzle(&self) -> Option<usize> {
        self.puzzle
    }

    pub fn requires(&self) -> &[NetEntity] {
        &self.requires
    }

    pub fn steps(&self) -> &[(NetEntity, Transition)] {
        &self.steps
    }

    pub fn repositions(&self) -> &[(NetEntity, Vec3)] {
        &self.reposition
    }

    pub fn cues(&self) -> &[(NetEntity, Cue)] {
        &self.cues
    }

    pub fn text(&self) -> Option<&str> {
        self.unavailable_text.as_deref()
    }

    /// The entity shown in unavailable feedback: the first one acted on.
    pub fn subject(&self) -> Option<NetEntity> {
        self.requires.first().copied()
    }

    fn require(&mut self, entity: NetEntity) {
        if !self.requires.contains(&entity) {
            self.requires.push(entity);
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Self::new()
    }
}
