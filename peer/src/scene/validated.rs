use std::collections::{HashMap, HashSet};

use log::warn;

use catacomb_shared::{EntityKind, NetEntity, Vec3};

use crate::scene::{
    definition::{
        ElevatorConfig, KillZone, ObstacleMotion, PuzzleConfig, SceneDefinition, SceneEntity,
        SymbolPuzzleConfig,
    },
    error::ConfigError,
};

/// A scene after its references were checked. Dependents that failed the
/// check are gone and lever thresholds are resolved to concrete counts.
pub struct ValidatedScene {
    pub entities: Vec<SceneEntity>,
    pub puzzles: Vec<PuzzleConfig>,
    pub elevators: Vec<ElevatorConfig>,
    pub obstacles: Vec<(NetEntity, ObstacleMotion)>,
    pub symbol_puzzles: Vec<SymbolPuzzleConfig>,
    pub kill_zones: Vec<KillZone>,
    pub faults: Vec<ConfigError>,
    puzzle_index: HashMap<NetEntity, Vec<usize>>,
}

impl ValidatedScene {
    pub fn new(definition: SceneDefinition) -> Self {
        let mut faults = Vec::new();
        let mut kinds: HashMap<NetEntity, EntityKind> = HashMap::new();
        let mut entities = Vec::new();
        let mut seen = HashSet::new();
        for entity in definition.entities {
            if !seen.insert(entity.entity) {
                faults.push(ConfigError::DuplicateEntity {
                    entity: entity.entity,
                });
                continue;
            }
            kinds.insert(entity.entity, entity.kind());
            entities.push(entity);
        }

        let mut puzzles = Vec::new();
        for config in definition.puzzles {
            if let Some(puzzle) = validate_puzzle(config, &kinds, &mut faults) {
                puzzles.push(puzzle);
            }
        }

        let mut elevators = Vec::new();
        for mut config in definition.elevators {
            if !check_kind(config.elevator, config.elevator, EntityKind::Elevator, "elevator", &kinds, &mut faults) {
                continue;
            }
            let owner = config.elevator;
            config
                .doors
                .retain(|door| check_kind(owner, *door, EntityKind::Door, "door", &kinds, &mut faults));
            elevators.push(config);
        }

        let mut obstacles = Vec::new();
        for (entity, motion) in definition.obstacles {
            if check_kind(entity, entity, EntityKind::Obstacle, "obstacle", &kinds, &mut faults) {
                obstacles.push((entity, motion));
            }
        }

        let mut symbol_puzzles = Vec::new();
        for mut config in definition.symbol_puzzles {
            let table = config.table;
            if !check_kind(table, table, EntityKind::SymbolTable, "symbol table", &kinds, &mut faults) {
                continue;
            }
            if config.layouts.is_empty() {
                faults.push(ConfigError::NoSymbolLayouts { table });
                continue;
            }
            config
                .doors
                .retain(|door| check_kind(table, *door, EntityKind::Door, "door", &kinds, &mut faults));
            symbol_puzzles.push(config);
        }

        for fault in &faults {
            warn!("scene configuration fault: {}", fault);
        }

        let mut puzzle_index: HashMap<NetEntity, Vec<usize>> = HashMap::new();
        for (index, puzzle) in puzzles.iter().enumerate() {
            for dependent in puzzle.slots.iter().chain(puzzle.levers.iter()) {
                puzzle_index.entry(*dependent).or_default().push(index);
            }
        }

        Self {
            entities,
            puzzles,
            elevators,
            obstacles,
            symbol_puzzles,
            kill_zones: definition.kill_zones,
            faults,
            puzzle_index,
        }
    }

    /// Indices of the puzzles that watch `entity` as a slot or lever.
    pub fn puzzles_watching(&self, entity: &NetEntity) -> &[usize] {
        self.puzzle_index
            .get(entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first kill zone containing `position`
    pub fn kill_zone_at(&self, position: Vec3) -> Option<&KillZone> {
        self.kill_zones
            .iter()
            .find(|zone| zone.bounds.contains(position))
    }

    pub fn obstacle_motion(&self, entity: &NetEntity) -> Option<&ObstacleMotion> {
        self.obstacles
            .iter()
            .find(|(obstacle, _)| obstacle == entity)
            .map(|(_, motion)| motion)
    }
}

fn validate_puzzle(
    mut config: PuzzleConfig,
    kinds: &HashMap<NetEntity, EntityKind>,
    faults: &mut Vec<ConfigError>,
) -> Option<PuzzleConfig> {
    let owner = config.puzzle;
    if !check_kind(owner, owner, EntityKind::Puzzle, "puzzle", kinds, faults) {
        return None;
    }

    config
        .slots
        .retain(|slot| check_kind(owner, *slot, EntityKind::RuneSlot, "rune slot", kinds, faults));
    config
        .levers
        .retain(|lever| check_kind(owner, *lever, EntityKind::Lever, "lever", kinds, faults));
    config
        .doors
        .retain(|door| check_kind(owner, *door, EntityKind::Door, "door", kinds, faults));

    let available = config.levers.len();
    if config.required_levers > available {
        faults.push(ConfigError::LeverThresholdClamped {
            puzzle: owner,
            required: config.required_levers,
            available,
        });
        config.required_levers = available;
    } else if config.required_levers == 0 {
        config.required_levers = available;
    }

    Some(config)
}

fn check_kind(
    owner: NetEntity,
    entity: NetEntity,
    expected: EntityKind,
    role: &'static str,
    kinds: &HashMap<NetEntity, EntityKind>,
    faults: &mut Vec<ConfigError>,
) -> bool {
    match kinds.get(&entity) {
        None => {
            faults.push(ConfigError::MissingDependent {
                owner,
                dependent: entity,
                role,
            });
            false
        }
        Some(kind) if *kind != expected => {
            faults.push(ConfigError::UnexpectedKind {
                entity,
                expected: expected.name(),
                actual: kind.name(),
            });
            false
        }
        Some(_) => true,
    }
}
