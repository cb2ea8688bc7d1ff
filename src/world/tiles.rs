//! # Tile Catalog
//!
//! Closed tile-type enums for every map layer plus the immutable catalog
//! that maps them to render data. The catalog is an explicitly constructed
//! value passed by reference into generators and queries; there is no
//! process-wide tile registry.

use serde::{Deserialize, Serialize};

/// RGB color triple used by the (external) renderer.
pub type Color = (u8, u8, u8);

/// Everything a renderer needs to draw one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderInfo {
    pub glyph: char,
    pub color: Color,
    pub solid: bool,
    pub name: &'static str,
    pub biome: &'static str,
}

/// Cosmetic overlays layered on top of a tile by the visual-effects layer.
///
/// Effects never change solidity or generation state; render-info queries
/// consult them for glyph/color overrides only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellEffect {
    Fire,
    Frost,
    Spark,
    Shadow,
}

impl SpellEffect {
    /// Overlay glyph and color for this effect.
    pub fn overlay(self) -> (char, Color) {
        match self {
            SpellEffect::Fire => ('*', (255, 100, 0)),
            SpellEffect::Frost => ('*', (150, 220, 255)),
            SpellEffect::Spark => ('+', (255, 255, 100)),
            SpellEffect::Shadow => ('▒', (60, 40, 80)),
        }
    }
}

/// The kinds of buildings settlements can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Tavern,
    Forge,
    Tower,
    Castle,
}

impl BuildingKind {
    /// Exterior footprint size (width, height) in overworld tiles.
    pub fn exterior_size(self) -> (u32, u32) {
        match self {
            BuildingKind::House => (3, 3),
            BuildingKind::Tavern => (4, 4),
            BuildingKind::Forge => (3, 4),
            BuildingKind::Tower => (4, 4),
            BuildingKind::Castle => (6, 6),
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::House => "House",
            BuildingKind::Tavern => "Tavern",
            BuildingKind::Forge => "Forge",
            BuildingKind::Tower => "Tower",
            BuildingKind::Castle => "Castle",
        }
    }

    fn roof_color(self) -> Color {
        match self {
            BuildingKind::House => (139, 121, 94),
            BuildingKind::Tavern => (160, 140, 100),
            BuildingKind::Forge => (120, 100, 80),
            BuildingKind::Tower => (150, 150, 150),
            BuildingKind::Castle => (180, 180, 180),
        }
    }
}

/// Overworld terrain tile types.
///
/// Biome tiles come from the noise classifier; roads, settled land, building
/// roofs/doors, and dungeon entrances are stamped over them during
/// settlement and entrance placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverworldTile {
    Ocean,
    River,
    Lake,
    Grasslands,
    DenseGrasslands,
    DeciduousForest,
    ConiferousForest,
    Jungle,
    DenseJungle,
    Desert,
    SandyDesert,
    HighDesert,
    Hills,
    GrassyHills,
    RockyHills,
    ForestedHills,
    Mountains,
    HighMountains,
    Swamp,
    DeepSwamp,
    Barren,
    Wasteland,
    Road,
    SettledLand,
    Roof(BuildingKind),
    Door(BuildingKind),
    DungeonEntrance,
}

impl OverworldTile {
    /// Water tiles block rivers and settlement sites.
    pub fn is_water(self) -> bool {
        matches!(
            self,
            OverworldTile::Ocean | OverworldTile::River | OverworldTile::Lake
        )
    }

    /// Mountain tiles block rivers and roads.
    pub fn is_mountain(self) -> bool {
        matches!(self, OverworldTile::Mountains | OverworldTile::HighMountains)
    }

    /// Terrain a building footprint may occupy.
    pub fn is_buildable(self) -> bool {
        matches!(
            self,
            OverworldTile::SettledLand | OverworldTile::Grasslands | OverworldTile::Road
        )
    }

    /// Biomes suitable for founding a settlement.
    pub fn is_settlement_site(self) -> bool {
        matches!(
            self,
            OverworldTile::Grasslands
                | OverworldTile::DenseGrasslands
                | OverworldTile::DeciduousForest
        )
    }

    /// Biomes suitable for a dungeon entrance.
    pub fn is_dungeon_site(self) -> bool {
        matches!(
            self,
            OverworldTile::DeciduousForest
                | OverworldTile::ConiferousForest
                | OverworldTile::Mountains
                | OverworldTile::HighMountains
                | OverworldTile::Hills
                | OverworldTile::ForestedHills
                | OverworldTile::RockyHills
                | OverworldTile::Swamp
                | OverworldTile::DeepSwamp
        )
    }

    /// Tiles road carving must not overwrite.
    pub fn blocks_road(self) -> bool {
        matches!(
            self,
            OverworldTile::Roof(_)
                | OverworldTile::Door(_)
                | OverworldTile::Ocean
                | OverworldTile::Lake
                | OverworldTile::Mountains
                | OverworldTile::HighMountains
        )
    }

    /// Tiles a river walk leaves untouched.
    pub fn blocks_river(self) -> bool {
        self.is_mountain() || self == OverworldTile::Ocean || matches!(self, OverworldTile::Roof(_) | OverworldTile::Door(_))
    }
}

/// Dungeon tile types across all themes.
///
/// Themed floors (cave, temple, crypt) collapse to [`DungeonTile::Floor`]
/// when the WFC grid is concretized; feature tiles keep their identity so
/// the thematic post-passes and queries can find them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DungeonTile {
    Wall,
    Floor,
    StairsUp,
    TreasureChest,
    Pillar,
    SecretPassage,
    // Caves
    Water,
    Stalactite,
    // Temples
    Altar,
    Shrine,
    SacredPillar,
    Mural,
    // Underground cities
    Street,
    Plaza,
    Fountain,
    Stall,
    // Crypts
    Sarcophagus,
    BoneWall,
    TombWall,
    Memorial,
}

impl DungeonTile {
    /// Whether an actor can stand on this tile.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            DungeonTile::Floor
                | DungeonTile::StairsUp
                | DungeonTile::TreasureChest
                | DungeonTile::SecretPassage
                | DungeonTile::Street
                | DungeonTile::Plaza
        )
    }
}

/// Building interior tile types (distinct from the terrain catalog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteriorTile {
    Wall,
    Floor,
    Door,
    Window,
    Bed,
    Table,
    Chair,
    Counter,
    Furnace,
    Anvil,
    Storage,
    StairsUp,
    Throne,
    Pillar,
}

impl InteriorTile {
    /// Furniture and walls block movement; chairs, windows, and doors do not.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            InteriorTile::Wall
                | InteriorTile::Pillar
                | InteriorTile::Storage
                | InteriorTile::Counter
                | InteriorTile::Bed
                | InteriorTile::Table
                | InteriorTile::Furnace
                | InteriorTile::Anvil
                | InteriorTile::Throne
        )
    }
}

/// Immutable lookup from tile type to render data.
///
/// Constructed once per world and passed by reference into every query path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileCatalog;

impl TileCatalog {
    /// Creates the catalog.
    pub fn new() -> Self {
        Self
    }

    /// Sentinel returned for out-of-bounds queries; always solid.
    pub fn void(&self) -> RenderInfo {
        RenderInfo {
            glyph: ' ',
            color: (0, 0, 0),
            solid: true,
            name: "Void",
            biome: "none",
        }
    }

    /// Render data for an overworld tile.
    pub fn overworld(&self, tile: OverworldTile) -> RenderInfo {
        let (glyph, color, solid, name, biome) = match tile {
            OverworldTile::Ocean => ('~', (100, 149, 237), true, "Ocean", "ocean"),
            OverworldTile::River => ('~', (64, 164, 223), true, "River", "river"),
            OverworldTile::Lake => ('~', (100, 149, 237), true, "Lake", "lake"),
            OverworldTile::Grasslands => (',', (120, 160, 90), false, "Grasslands", "plains"),
            OverworldTile::DenseGrasslands => {
                ('░', (100, 180, 100), false, "Dense Grasslands", "plains")
            }
            OverworldTile::DeciduousForest => {
                ('♣', (34, 139, 34), false, "Deciduous Forest", "forest")
            }
            OverworldTile::ConiferousForest => {
                ('♠', (25, 100, 25), false, "Coniferous Forest", "forest")
            }
            OverworldTile::Jungle => ('Ψ', (85, 107, 47), false, "Jungle", "jungle"),
            OverworldTile::DenseJungle => ('¶', (107, 142, 35), false, "Dense Jungle", "jungle"),
            OverworldTile::Desert => ('≈', (255, 218, 100), false, "Desert", "desert"),
            OverworldTile::SandyDesert => ('≋', (255, 228, 150), false, "Sandy Desert", "desert"),
            OverworldTile::HighDesert => ('∴', (240, 200, 120), false, "High Desert", "desert"),
            OverworldTile::Hills => ('∩', (160, 140, 100), false, "Hills", "mountains"),
            OverworldTile::GrassyHills => ('⌒', (140, 180, 120), false, "Grassy Hills", "mountains"),
            OverworldTile::RockyHills => ('∧', (140, 120, 100), false, "Rocky Hills", "mountains"),
            OverworldTile::ForestedHills => {
                ('♠', (100, 140, 80), false, "Forested Hills", "forest")
            }
            OverworldTile::Mountains => ('▲', (169, 169, 169), true, "Mountains", "mountains"),
            OverworldTile::HighMountains => {
                ('△', (200, 200, 200), true, "High Mountains", "mountains")
            }
            OverworldTile::Swamp => ('~', (107, 142, 35), false, "Swamp", "swamp"),
            OverworldTile::DeepSwamp => ('≈', (85, 107, 47), false, "Deep Swamp", "swamp"),
            OverworldTile::Barren => ('∴', (139, 137, 137), false, "Barren Land", "barren"),
            OverworldTile::Wasteland => ('∵', (120, 120, 120), false, "Wasteland", "barren"),
            OverworldTile::Road => ('▓', (139, 121, 94), false, "Road", "settled"),
            OverworldTile::SettledLand => ('▒', (160, 140, 100), false, "Settled Land", "settled"),
            OverworldTile::Roof(kind) => {
                return RenderInfo {
                    glyph: '█',
                    color: kind.roof_color(),
                    solid: true,
                    name: kind.name(),
                    biome: "settled",
                }
            }
            OverworldTile::Door(_) => ('+', (139, 69, 19), false, "Door", "settled"),
            OverworldTile::DungeonEntrance => {
                ('<', (255, 255, 255), false, "Dungeon Entrance", "dungeon")
            }
        };
        RenderInfo {
            glyph,
            color,
            solid,
            name,
            biome,
        }
    }

    /// Render data for a dungeon tile.
    pub fn dungeon(&self, tile: DungeonTile) -> RenderInfo {
        let (glyph, color, name) = match tile {
            DungeonTile::Wall => ('#', (100, 100, 100), "Wall"),
            DungeonTile::Floor => ('.', (139, 121, 94), "Floor"),
            DungeonTile::StairsUp => ('<', (255, 255, 255), "Stairs Up"),
            DungeonTile::TreasureChest => ('$', (255, 215, 0), "Treasure Chest"),
            DungeonTile::Pillar => ('O', (128, 128, 128), "Pillar"),
            DungeonTile::SecretPassage => ('.', (80, 80, 90), "Secret Passage"),
            DungeonTile::Water => ('~', (64, 164, 223), "Dark Water"),
            DungeonTile::Stalactite => ('i', (170, 170, 170), "Stalactite"),
            DungeonTile::Altar => ('♱', (255, 215, 0), "Altar"),
            DungeonTile::Shrine => ('☩', (230, 190, 80), "Shrine"),
            DungeonTile::SacredPillar => ('⌂', (200, 200, 160), "Sacred Pillar"),
            DungeonTile::Mural => ('▓', (150, 120, 90), "Mural"),
            DungeonTile::Street => ('▓', (140, 140, 140), "Street"),
            DungeonTile::Plaza => ('░', (170, 170, 170), "Plaza"),
            DungeonTile::Fountain => ('◊', (100, 180, 220), "Fountain"),
            DungeonTile::Stall => ('⌐', (160, 120, 80), "Market Stall"),
            DungeonTile::Sarcophagus => ('▬', (180, 180, 160), "Sarcophagus"),
            DungeonTile::BoneWall => ('☠', (220, 220, 200), "Bone Wall"),
            DungeonTile::TombWall => ('▓', (110, 100, 90), "Tomb Wall"),
            DungeonTile::Memorial => ('♰', (190, 190, 170), "Memorial"),
        };
        RenderInfo {
            glyph,
            color,
            solid: !tile.is_walkable(),
            name,
            biome: "dungeon",
        }
    }

    /// Render data for a building interior tile.
    pub fn interior(&self, tile: InteriorTile) -> RenderInfo {
        let (glyph, color, name) = match tile {
            InteriorTile::Wall => ('#', (100, 100, 100), "Wall"),
            InteriorTile::Floor => ('.', (139, 121, 94), "Floor"),
            InteriorTile::Door => ('+', (139, 69, 19), "Door"),
            InteriorTile::Window => ('○', (173, 216, 230), "Window"),
            InteriorTile::Bed => ('=', (255, 182, 193), "Bed"),
            InteriorTile::Table => ('┬', (139, 121, 94), "Table"),
            InteriorTile::Chair => ('h', (160, 82, 45), "Chair"),
            InteriorTile::Counter => ('━', (139, 121, 94), "Counter"),
            InteriorTile::Furnace => ('▲', (255, 69, 0), "Furnace"),
            InteriorTile::Anvil => ('♦', (105, 105, 105), "Anvil"),
            InteriorTile::Storage => ('■', (139, 121, 94), "Storage"),
            InteriorTile::StairsUp => ('<', (255, 255, 255), "Stairs Up"),
            InteriorTile::Throne => ('♔', (255, 215, 0), "Throne"),
            InteriorTile::Pillar => ('▓', (128, 128, 128), "Pillar"),
        };
        RenderInfo {
            glyph,
            color,
            solid: tile.is_solid(),
            name,
            biome: "interior",
        }
    }
}
