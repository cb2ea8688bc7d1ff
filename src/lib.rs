//! # Emberfell World Core
//!
//! Procedural world-generation core for a tile-based RPG.
//!
//! ## Architecture Overview
//!
//! The crate is split into two layers:
//!
//! - **Generation**: synthesizes an overworld (biomes, rivers, settlements,
//!   roads, dungeon entrances), a linked dungeon level (classic room-corridor
//!   or Wave Function Collapse with themed pattern sets), and building
//!   interiors. All generators draw from a single seeded RNG so that the same
//!   seed always produces the same world.
//! - **World model**: the generated maps behind a uniform query interface
//!   (tile render info, solidity, descriptions, action prompts) plus a
//!   location manager that mediates transitions between the overworld,
//!   building interiors, and the dungeon.
//!
//! Rendering, input handling, and combat are external collaborators; they
//! consume the world exclusively through [`World`] queries and
//! [`World::handle_actor_interaction`].

pub mod generation;
pub mod world;

pub use generation::{
    ClassicDungeonGenerator, DungeonStyle, GenerationConfig, InteriorGenerator, Item, NoiseMap,
    OverworldGenerator, SettlementGenerator, Theme, ThematicWfcGenerator, WfcDungeonGenerator,
};
pub use world::{
    Actor, Building, BuildingKind, BuildingRegistry, DungeonLevel, DungeonTile, EntranceLink,
    Facing, Grid, InteriorTile, LocationKind, LocationManager, OverworldTile, Position, Rect,
    RenderInfo, Room, Settlement, SettlementCategory, SpellEffect, TileCatalog, TransitionIntent,
    TransitionResult, TreasureChest, World, WorldSnapshot,
};

/// Core error type for the world-generation crate.
///
/// Generation itself never fails (placement exhaustion and WFC
/// non-convergence resolve through documented fallbacks), so errors only
/// surface from snapshot I/O and from transition requests the current state
/// cannot honor.
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// World model is in a state the operation cannot work with
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A location transition was requested that the current state cannot honor
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Result type used throughout the crate.
pub type WorldResult<T> = Result<T, WorldError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// World configuration constants.
pub mod config {
    /// Default overworld width in tiles
    pub const DEFAULT_WORLD_WIDTH: u32 = 150;

    /// Default overworld height in tiles
    pub const DEFAULT_WORLD_HEIGHT: u32 = 150;

    /// Minimum number of dungeon entrances placed on the overworld
    pub const MIN_DUNGEON_ENTRANCES: u32 = 5;

    /// Maximum number of dungeon entrances placed on the overworld
    pub const MAX_DUNGEON_ENTRANCES: u32 = 8;

    /// Attempt budget for site-finding scans (settlements, dungeon entrances)
    pub const SITE_SEARCH_ATTEMPTS: u32 = 200;

    /// Connected floor regions at least this large count as rooms
    pub const MIN_ROOM_AREA: usize = 9;
}
