//! # World Facade
//!
//! Owns every generated map and exposes them behind a uniform, total query
//! interface. Rendering and input layers never touch grids directly; they ask
//! for render info, solidity, descriptions, and action prompts by coordinate
//! and [`LocationKind`], and mutate the world only through
//! [`World::handle_actor_interaction`] and [`World::loot_chest`].

use crate::generation::{
    utils, DungeonStyle, GenerationConfig, Item, OverworldGenerator, SettlementGenerator, Theme,
};
use crate::world::buildings::{BuildingRegistry, Settlement};
use crate::world::location::{LocationKind, LocationManager, TransitionResult};
use crate::world::tiles::{
    DungeonTile, InteriorTile, OverworldTile, RenderInfo, SpellEffect, TileCatalog,
};
use crate::world::{Actor, Grid, Position, Rect};
use crate::{config, WorldResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A dungeon room: bounding rect plus its flavor text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub bounds: Rect,
    pub description: String,
}

impl Room {
    pub fn new(bounds: Rect, description: String) -> Self {
        Self {
            bounds,
            description,
        }
    }

    pub fn center(&self) -> Position {
        self.bounds.center()
    }
}

/// An unopened treasure chest and its contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasureChest {
    pub position: Position,
    pub item: Item,
}

/// Links an overworld entrance tile to the stairs tile inside the dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntranceLink {
    pub overworld: Position,
    pub dungeon: Position,
}

/// One generated dungeon level with its rooms, loot, and entrance table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonLevel {
    pub tiles: Grid<DungeonTile>,
    pub rooms: Vec<Room>,
    pub chests: Vec<TreasureChest>,
    pub entrances: Vec<EntranceLink>,
    pub theme: Theme,
}

impl DungeonLevel {
    /// A zero-sized level; placeholder until generation runs.
    pub fn empty() -> Self {
        Self {
            tiles: Grid::new(0, 0, DungeonTile::Wall),
            rooms: Vec::new(),
            chests: Vec::new(),
            entrances: Vec::new(),
            theme: Theme::ClassicDungeon,
        }
    }

    /// Dungeon-side landing position for the entrance at an overworld tile.
    pub fn entrance_from_overworld(&self, overworld: Position) -> Option<Position> {
        self.entrances
            .iter()
            .find(|link| link.overworld == overworld)
            .map(|link| link.dungeon)
    }

    /// The entrance link whose stairs sit at a dungeon position.
    pub fn entrance_at(&self, dungeon: Position) -> Option<&EntranceLink> {
        self.entrances.iter().find(|link| link.dungeon == dungeon)
    }

    /// The room containing a dungeon position, if any.
    pub fn room_at(&self, pos: Position) -> Option<&Room> {
        self.rooms.iter().find(|room| room.bounds.contains(pos))
    }

    /// The chest at a dungeon position, if any.
    pub fn chest_at(&self, pos: Position) -> Option<&TreasureChest> {
        self.chests.iter().find(|chest| chest.position == pos)
    }
}

/// A cosmetic overlay pinned to one tile of one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct EffectInstance {
    location: LocationKind,
    position: Position,
    effect: SpellEffect,
}

/// Serializable image of a generated world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub config: GenerationConfig,
    pub terrain: Grid<OverworldTile>,
    pub buildings: BuildingRegistry,
    pub settlements: Vec<Settlement>,
    pub dungeon: DungeonLevel,
    pub location: LocationManager,
    pub start_position: Position,
}

impl WorldSnapshot {
    /// Writes the snapshot as JSON.
    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> WorldResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reads a snapshot back from JSON.
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> WorldResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// The generated world: overworld terrain, settlements and their buildings,
/// one linked dungeon level, and the location state machine.
#[derive(Debug, Clone)]
pub struct World {
    config: GenerationConfig,
    catalog: TileCatalog,
    terrain: Grid<OverworldTile>,
    buildings: BuildingRegistry,
    settlements: Vec<Settlement>,
    dungeon: DungeonLevel,
    location: LocationManager,
    effects: Vec<EffectInstance>,
    start_position: Position,
}

impl World {
    /// Generates a complete world from the config's seed.
    ///
    /// All randomness flows through one seeded rng in a fixed order, so the
    /// same config always produces the same world.
    pub fn generate(config: GenerationConfig) -> Self {
        let mut rng = utils::create_rng(&config);
        let catalog = TileCatalog::new();

        let overworld_gen = OverworldGenerator::new(config.world_width, config.world_height);
        let mut terrain = overworld_gen.generate_terrain(&mut rng);

        let sites =
            overworld_gen.suitable_settlement_sites(&terrain, config.max_settlements, &mut rng);
        let mut buildings = BuildingRegistry::new();
        let settlement_gen = SettlementGenerator::new();
        let settlements =
            settlement_gen.generate_settlements(&mut terrain, &mut buildings, &sites, &mut rng);

        let anchor = settlements
            .first()
            .map(|s| s.center)
            .unwrap_or_else(|| {
                Position::new(config.world_width as i32 / 2, config.world_height as i32 / 2)
            });
        let start_position = overworld_gen.find_start_position(&terrain, anchor);

        let entrance_count = rng.gen_range(
            config::MIN_DUNGEON_ENTRANCES as usize..=config::MAX_DUNGEON_ENTRANCES as usize,
        );
        let dungeon_sites =
            overworld_gen.suitable_dungeon_sites(&terrain, entrance_count, &mut rng);

        let dungeon = config
            .dungeon_style
            .build(&config, &dungeon_sites, &mut rng);
        for link in &dungeon.entrances {
            terrain.set(link.overworld, OverworldTile::DungeonEntrance);
        }

        log::info!(
            "generated world seed={}: {} settlements, {} buildings, {} dungeon entrances",
            config.seed,
            settlements.len(),
            buildings.len(),
            dungeon.entrances.len()
        );

        Self {
            config,
            catalog,
            terrain,
            buildings,
            settlements,
            dungeon,
            location: LocationManager::new(),
            effects: Vec::new(),
            start_position,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn terrain(&self) -> &Grid<OverworldTile> {
        &self.terrain
    }

    pub fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn dungeon(&self) -> &DungeonLevel {
        &self.dungeon
    }

    pub fn current_location(&self) -> LocationKind {
        self.location.current()
    }

    /// Tile where a new actor should be placed.
    pub fn start_position(&self) -> Position {
        self.start_position
    }

    /// Render info for any coordinate of any map. Total: out-of-bounds
    /// coordinates yield the solid Void sentinel.
    pub fn tile_render_info(&self, x: i32, y: i32, location: LocationKind) -> RenderInfo {
        let pos = Position::new(x, y);
        let mut info = match location {
            LocationKind::Overworld => match self.terrain.get(pos) {
                Some(&tile) => self.catalog.overworld(tile),
                None => self.catalog.void(),
            },
            LocationKind::Dungeon => match self.dungeon.tiles.get(pos) {
                Some(&tile) => self.catalog.dungeon(tile),
                None => self.catalog.void(),
            },
            LocationKind::BuildingInterior(id) => match self
                .buildings
                .get(id)
                .and_then(|b| b.interior.get(pos))
            {
                Some(&tile) => self.catalog.interior(tile),
                None => self.catalog.void(),
            },
        };

        if let Some(effect) = self.effect_at(pos, location) {
            let (glyph, color) = effect.overlay();
            info.glyph = glyph;
            info.color = color;
        }
        info
    }

    /// Whether the tile blocks movement. Out of bounds is always solid.
    pub fn is_solid(&self, x: i32, y: i32, location: LocationKind) -> bool {
        self.tile_render_info(x, y, location).solid
    }

    /// Biome tag for encounter generation. Everything underground or indoors
    /// is one biome; unknown overworld coordinates default to plains.
    pub fn biome(&self, x: i32, y: i32, location: LocationKind) -> &'static str {
        match location {
            LocationKind::Overworld => self
                .terrain
                .get(Position::new(x, y))
                .map(|&t| self.catalog.overworld(t).biome)
                .unwrap_or("plains"),
            LocationKind::Dungeon => "dungeon",
            LocationKind::BuildingInterior(_) => "interior",
        }
    }

    /// Short look-description for a tile, including dungeon room flavor and
    /// interior furniture text.
    pub fn description(&self, x: i32, y: i32, location: LocationKind) -> String {
        let pos = Position::new(x, y);
        match location {
            LocationKind::Dungeon => {
                let name = self.tile_render_info(x, y, location).name;
                if self.dungeon.tiles.get(pos).is_none() {
                    return "Out of bounds".to_string();
                }
                match self.dungeon.room_at(pos) {
                    Some(room) => format!("{}: {}", name, room.description),
                    None => name.to_string(),
                }
            }
            LocationKind::BuildingInterior(id) => {
                let tile = self.buildings.get(id).and_then(|b| b.interior.get(pos));
                match tile {
                    Some(tile) => interior_description(*tile).to_string(),
                    None => "Nothing here.".to_string(),
                }
            }
            LocationKind::Overworld => match self.terrain.get(pos) {
                Some(&tile) => self.catalog.overworld(tile).name.to_string(),
                None => "Out of bounds".to_string(),
            },
        }
    }

    /// Action prompt shown when the actor stands on a tile; empty when the
    /// tile offers nothing.
    pub fn action_prompt(&self, x: i32, y: i32, location: LocationKind) -> String {
        let pos = Position::new(x, y);
        match location {
            LocationKind::Overworld => match self.terrain.get(pos) {
                Some(OverworldTile::DungeonEntrance) => {
                    "Press Enter to enter the dungeon".to_string()
                }
                Some(OverworldTile::Door(kind)) => {
                    format!("Press Enter to enter the {}", kind.name().to_lowercase())
                }
                _ => String::new(),
            },
            LocationKind::Dungeon => match self.dungeon.tiles.get(pos) {
                Some(DungeonTile::StairsUp) => "Press Enter to exit the dungeon".to_string(),
                Some(DungeonTile::TreasureChest) => "Press Y to take the treasure".to_string(),
                _ => String::new(),
            },
            LocationKind::BuildingInterior(id) => {
                let tile = self.buildings.get(id).and_then(|b| b.interior.get(pos));
                match tile {
                    Some(InteriorTile::Door) => "Press Enter to exit building".to_string(),
                    Some(InteriorTile::StairsUp) => "Press Enter to go upstairs".to_string(),
                    Some(InteriorTile::Bed) => "Press Enter to use bed".to_string(),
                    Some(InteriorTile::Table) => "Press Enter to use table".to_string(),
                    Some(InteriorTile::Chair) => "Press Enter to use chair".to_string(),
                    Some(InteriorTile::Furnace) => "Press Enter to use forge".to_string(),
                    Some(InteriorTile::Storage) => "Press Enter to search storage".to_string(),
                    _ => String::new(),
                }
            }
        }
    }

    /// Pins a cosmetic spell overlay to a tile. Overlays only affect render
    /// info; solidity and generation state are untouched.
    pub fn add_spell_effect(&mut self, x: i32, y: i32, location: LocationKind, effect: SpellEffect) {
        let position = Position::new(x, y);
        if let Some(existing) = self
            .effects
            .iter_mut()
            .find(|e| e.position == position && e.location == location)
        {
            existing.effect = effect;
        } else {
            self.effects.push(EffectInstance {
                location,
                position,
                effect,
            });
        }
    }

    /// Clears all spell overlays.
    pub fn clear_spell_effects(&mut self) {
        self.effects.clear();
    }

    fn effect_at(&self, pos: Position, location: LocationKind) -> Option<SpellEffect> {
        self.effects
            .iter()
            .find(|e| e.position == pos && e.location == location)
            .map(|e| e.effect)
    }

    /// Opens the chest at a dungeon coordinate: removes the chest record,
    /// reverts the tile to floor, and hands back the loot.
    pub fn loot_chest(&mut self, x: i32, y: i32) -> Option<Item> {
        let pos = Position::new(x, y);
        let idx = self.dungeon.chests.iter().position(|c| c.position == pos)?;
        let chest = self.dungeon.chests.remove(idx);
        self.dungeon.tiles.set(pos, DungeonTile::Floor);
        log::debug!("chest looted at ({}, {}): {}", x, y, chest.item.name);
        Some(chest.item)
    }

    /// Single mutating entry point for transitions. Checks the actor's tile
    /// for an available transition and applies it.
    pub fn handle_actor_interaction(&mut self, actor: &mut Actor) -> WorldResult<TransitionResult> {
        let intent = self.location.can_transition(
            actor.position,
            &self.terrain,
            &self.buildings,
            &self.dungeon,
        );
        match intent {
            Some(intent) => {
                self.location
                    .transition(intent, actor, &self.buildings, &self.dungeon)
            }
            None => Ok(TransitionResult::NoTransition),
        }
    }

    /// Captures the world as a serializable snapshot.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            config: self.config.clone(),
            terrain: self.terrain.clone(),
            buildings: self.buildings.clone(),
            settlements: self.settlements.clone(),
            dungeon: self.dungeon.clone(),
            location: self.location.clone(),
            start_position: self.start_position,
        }
    }

    /// Rebuilds a world from a snapshot. Spell overlays are transient and
    /// start empty.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        Self {
            config: snapshot.config,
            catalog: TileCatalog::new(),
            terrain: snapshot.terrain,
            buildings: snapshot.buildings,
            settlements: snapshot.settlements,
            dungeon: snapshot.dungeon,
            location: snapshot.location,
            effects: Vec::new(),
            start_position: snapshot.start_position,
        }
    }
}

/// Look-descriptions for interior furniture.
fn interior_description(tile: InteriorTile) -> &'static str {
    match tile {
        InteriorTile::Wall => "A solid stone wall.",
        InteriorTile::Floor => "Worn wooden floorboards.",
        InteriorTile::Door => "A sturdy wooden door.",
        InteriorTile::Window => "A small window lets in some light.",
        InteriorTile::Bed => "A simple wooden bed.",
        InteriorTile::Table => "A rough wooden table.",
        InteriorTile::Chair => "A wooden chair.",
        InteriorTile::Counter => "A long wooden counter.",
        InteriorTile::Furnace => "A blazing forge for metalwork.",
        InteriorTile::Anvil => "A heavy iron anvil.",
        InteriorTile::Storage => "A storage chest.",
        InteriorTile::StairsUp => "Stairs leading up.",
        InteriorTile::Throne => "An ornate royal throne.",
        InteriorTile::Pillar => "A stone support pillar.",
    }
}

/// Dispatch from configured dungeon style to the matching generator.
impl DungeonStyle {
    pub(crate) fn build(
        &self,
        config: &GenerationConfig,
        entrance_sites: &[Position],
        rng: &mut rand::rngs::StdRng,
    ) -> DungeonLevel {
        use crate::generation::{ClassicDungeonGenerator, ThematicWfcGenerator};
        match *self {
            DungeonStyle::Classic(theme) => {
                ClassicDungeonGenerator::new(config.dungeon_width, config.dungeon_height, theme)
                    .generate(config, entrance_sites, rng)
            }
            DungeonStyle::Wfc(theme) => {
                ThematicWfcGenerator::new(theme)
                    .generate(
                        config.dungeon_width,
                        config.dungeon_height,
                        entrance_sites,
                        rng,
                    )
            }
        }
    }
}
