mod definition;
mod error;
mod validated;

pub use definition::{
    ElevatorConfig, KillZone, ObstacleMotion, PuzzleConfig, SceneDefinition, SceneEntity,
    SymbolLayout, SymbolPuzzleConfig,
};
pub use error::ConfigError;
pub use validated::ValidatedScene;
