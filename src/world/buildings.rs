//! # Buildings and Settlements
//!
//! Typed building records owned by a registry arena. Settlements reference
//! buildings by index rather than holding them, so the world can hand out
//! `&Building` freely while settlements stay cheap to clone and serialize.

use crate::world::tiles::{BuildingKind, InteriorTile};
use crate::world::{Grid, Position, Rect};
use serde::{Deserialize, Serialize};

/// Cardinal facing of a building's door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

/// Index into the [`BuildingRegistry`].
pub type BuildingId = usize;

/// A placed building: overworld footprint plus its generated interior map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    /// Footprint on the overworld, in world tile coordinates.
    pub exterior: Rect,
    /// Interior map in local coordinates, larger than the footprint.
    pub interior: Grid<InteriorTile>,
    /// Door tile on the overworld.
    pub door: Position,
    pub facing: Facing,
    /// Interior tile just inside the door where an entering actor lands.
    pub entrance_point: Position,
}

impl Building {
    /// The overworld tile an actor must stand on to enter.
    pub fn exterior_door(&self) -> Position {
        self.door
    }
}

/// Arena owning every building in the world.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a building and returns its id.
    pub fn insert(&mut self, building: Building) -> BuildingId {
        self.buildings.push(building);
        self.buildings.len() - 1
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id)
    }

    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BuildingId, &Building)> {
        self.buildings.iter().enumerate()
    }

    /// Finds the building whose door sits at `pos`.
    pub fn building_at_door(&self, pos: Position) -> Option<BuildingId> {
        self.buildings.iter().position(|b| b.door == pos)
    }

    /// Finds the building whose footprint contains `pos`.
    pub fn building_at(&self, pos: Position) -> Option<BuildingId> {
        self.buildings.iter().position(|b| b.exterior.contains(pos))
    }
}

/// Settlement tier. Determines footprint size and the building manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementCategory {
    Town,
    Village,
    Hamlet,
}

impl SettlementCategory {
    /// Radius of the cleared diamond the settlement occupies.
    pub fn size(self) -> u32 {
        match self {
            SettlementCategory::Town => 5,
            SettlementCategory::Village => 4,
            SettlementCategory::Hamlet => 3,
        }
    }

    /// Buildings this settlement attempts to raise, in placement order.
    ///
    /// Placement can drop entries when no valid site exists, so the manifest
    /// is an upper bound on the final building count.
    pub fn manifest(self) -> Vec<BuildingKind> {
        let mut list = Vec::new();
        match self {
            SettlementCategory::Town => {
                list.extend(std::iter::repeat(BuildingKind::House).take(8));
                list.push(BuildingKind::Tavern);
                list.push(BuildingKind::Tavern);
                list.push(BuildingKind::Forge);
                list.push(BuildingKind::Forge);
                list.push(BuildingKind::Tower);
            }
            SettlementCategory::Village => {
                list.extend(std::iter::repeat(BuildingKind::House).take(7));
                list.push(BuildingKind::Tavern);
                list.push(BuildingKind::Forge);
            }
            SettlementCategory::Hamlet => {
                list.extend(std::iter::repeat(BuildingKind::House).take(4));
                list.push(BuildingKind::Tavern);
            }
        }
        list
    }

    pub fn name(self) -> &'static str {
        match self {
            SettlementCategory::Town => "Town",
            SettlementCategory::Village => "Village",
            SettlementCategory::Hamlet => "Hamlet",
        }
    }
}

/// A founded settlement: center tile, tier, and the buildings it raised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub center: Position,
    pub category: SettlementCategory,
    pub buildings: Vec<BuildingId>,
}

impl Settlement {
    pub fn new(center: Position, category: SettlementCategory) -> Self {
        Self {
            center,
            category,
            buildings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_counts() {
        assert_eq!(SettlementCategory::Town.manifest().len(), 13);
        assert_eq!(SettlementCategory::Village.manifest().len(), 9);
        assert_eq!(SettlementCategory::Hamlet.manifest().len(), 5);
    }

    #[test]
    fn test_town_manifest_composition() {
        let manifest = SettlementCategory::Town.manifest();
        let houses = manifest.iter().filter(|k| **k == BuildingKind::House).count();
        let towers = manifest.iter().filter(|k| **k == BuildingKind::Tower).count();
        assert_eq!(houses, 8);
        assert_eq!(towers, 1);
    }

    #[test]
    fn test_registry_door_lookup() {
        let mut registry = BuildingRegistry::new();
        let building = Building {
            kind: BuildingKind::House,
            exterior: Rect::new(10, 10, 3, 3),
            interior: Grid::new(5, 5, InteriorTile::Floor),
            door: Position::new(11, 12),
            facing: Facing::South,
            entrance_point: Position::new(2, 3),
        };
        let id = registry.insert(building);
        assert_eq!(registry.building_at_door(Position::new(11, 12)), Some(id));
        assert_eq!(registry.building_at(Position::new(11, 11)), Some(id));
        assert_eq!(registry.building_at_door(Position::new(0, 0)), None);
    }
}
