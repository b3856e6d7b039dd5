use catacomb_shared::{
    Bounds, ContinuousChannels, ContinuousState, DiscreteState, DoorState, ElevatorState,
    EntityKind, ItemState, LeverState, NetEntity, ObstacleState, PuzzleState, RuneSlotState,
    SymbolTableState, Vec3,
};

/// One entity every peer creates when it loads the scene.
#[derive(Clone, Debug)]
pub struct SceneEntity {
    pub entity: NetEntity,
    pub discrete: DiscreteState,
    pub continuous: ContinuousState,
}

impl SceneEntity {
    pub fn kind(&self) -> EntityKind {
        self.discrete.kind()
    }
}

/// A rune puzzle: slots that must all hold their required rune, optional
/// levers to pull afterwards, and the doors that open once it is solved.
#[derive(Clone, Debug)]
pub struct PuzzleConfig {
    pub puzzle: NetEntity,
    pub slots: Vec<NetEntity>,
    pub levers: Vec<NetEntity>,
    pub doors: Vec<NetEntity>,
    /// Lever activations needed to solve. Zero means every lever.
    pub required_levers: usize,
    /// Open the doors as soon as the slots are correct
    pub skip_levers: bool,
}

impl PuzzleConfig {
    pub fn new(puzzle: NetEntity) -> Self {
        Self {
            puzzle,
            slots: Vec::new(),
            levers: Vec::new(),
            doors: Vec::new(),
            required_levers: 0,
            skip_levers: false,
        }
    }
}

/// One arrangement a symbol table can be set up with.
#[derive(Clone, Debug)]
pub struct SymbolLayout {
    /// Symbols spawned into the level, one item each
    pub symbols: Vec<String>,
    /// The order in which symbols must be placed on the table
    pub sequence: Vec<String>,
}

/// A table puzzle. The coordinator picks one layout at random, spawns its
/// symbols and opens `doors` once the table holds the layout's sequence.
#[derive(Clone, Debug)]
pub struct SymbolPuzzleConfig {
    pub table: NetEntity,
    pub layouts: Vec<SymbolLayout>,
    /// Where the spawned symbols appear, in symbol order. Symbols without a
    /// point appear on the table.
    pub symbol_points: Vec<Vec3>,
    pub doors: Vec<NetEntity>,
}

impl SymbolPuzzleConfig {
    pub fn new(table: NetEntity) -> Self {
        Self {
            table,
            layouts: Vec::new(),
            symbol_points: Vec::new(),
            doors: Vec::new(),
        }
    }
}

/// A gathering point: once every connected peer's avatar stands inside
/// `bounds`, the elevator departs and its doors close.
#[derive(Clone, Debug)]
pub struct ElevatorConfig {
    pub elevator: NetEntity,
    pub bounds: Bounds,
    pub doors: Vec<NetEntity>,
}

/// A region that kills any avatar entering it. Its owner respawns the
/// avatar at `respawn`, or one meter above where it died.
#[derive(Clone, Copy, Debug)]
pub struct KillZone {
    pub bounds: Bounds,
    pub respawn: Option<Vec3>,
}

/// Linear back-and-forth motion of an obstacle, simulated by its owner.
#[derive(Clone, Debug)]
pub struct ObstacleMotion {
    pub direction: Vec3,
    /// Travel from the start position before turning back
    pub distance: f32,
    /// Meters per second
    pub speed: f32,
    /// Seconds to wait before the first movement
    pub start_delay: f32,
    /// When set, the start delay is drawn uniformly from this range instead
    pub random_delay: Option<(f32, f32)>,
}

impl Default for ObstacleMotion {
    fn default() -> Self {
        Self {
            direction: Vec3::Z,
            distance: 5.0,
            speed: 2.0,
            start_delay: 0.0,
            random_delay: None,
        }
    }
}

/// Everything a peer needs to build the shared starting world.
#[derive(Clone, Debug, Default)]
pub struct SceneDefinition {
    pub entities: Vec<SceneEntity>,
    pub puzzles: Vec<PuzzleConfig>,
    pub elevators: Vec<ElevatorConfig>,
    pub obstacles: Vec<(NetEntity, ObstacleMotion)>,
    pub symbol_puzzles: Vec<SymbolPuzzleConfig>,
    pub kill_zones: Vec<KillZone>,
}

impl SceneDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: NetEntity, discrete: DiscreteState, position: Vec3) {
        self.entities.push(SceneEntity {
            entity,
            discrete,
            continuous: ContinuousState::at(position),
        });
    }

    pub fn with_door(mut self, entity: NetEntity, position: Vec3, required_key: Option<&str>) -> Self {
        let door = DoorState {
            open: false,
            required_key: required_key.map(str::to_string),
        };
        self.add_entity(entity, DiscreteState::Door(door), position);
        self
    }

    pub fn with_lever(mut self, entity: NetEntity, position: Vec3) -> Self {
        self.add_entity(entity, DiscreteState::Lever(LeverState::default()), position);
        self
    }

    pub fn with_rune_slot(mut self, entity: NetEntity, position: Vec3, required_rune: &str) -> Self {
        let slot = RuneSlotState {
            required_rune: required_rune.to_string(),
            placed: None,
        };
        self.add_entity(entity, DiscreteState::RuneSlot(slot), position);
        self
    }

    pub fn with_item(mut self, entity: NetEntity, position: Vec3, tag: &str) -> Self {
        let item = ItemState {
            tag: tag.to_string(),
            ..Default::default()
        };
        self.add_entity(entity, DiscreteState::Item(item), position);
        self
    }

    pub fn with_obstacle(mut self, entity: NetEntity, position: Vec3, motion: ObstacleMotion) -> Self {
        self.entities.push(SceneEntity {
            entity,
            discrete: DiscreteState::Obstacle(ObstacleState { moving: true }),
            continuous: ContinuousState::at(position)
                .with_channels(ContinuousChannels::Obstacle { moving: true }),
        });
        self.obstacles.push((entity, motion));
        self
    }

    pub fn with_puzzle(mut self, config: PuzzleConfig) -> Self {
        self.add_entity(
            config.puzzle,
            DiscreteState::Puzzle(PuzzleState::default()),
            Vec3::ZERO,
        );
        self.puzzles.push(config);
        self
    }

    pub fn with_symbol_puzzle(mut self, config: SymbolPuzzleConfig, position: Vec3) -> Self {
        self.add_entity(
            config.table,
            DiscreteState::SymbolTable(SymbolTableState::default()),
            position,
        );
        self.symbol_puzzles.push(config);
        self
    }

    pub fn with_kill_zone(mut self, bounds: Bounds, respawn: Option<Vec3>) -> Self {
        self.kill_zones.push(KillZone { bounds, respawn });
        self
    }

    pub fn with_elevator(mut self, config: ElevatorConfig) -> Self {
        self.add_entity(
            config.elevator,
            DiscreteState::Elevator(ElevatorState::default()),
            config.bounds.min,
        );
        self.elevators.push(config);
        self
    }
}
