//! # Building Interiors
//!
//! Generates the interior map for each building kind. Interiors are larger
//! than the overworld footprint (buildings are bigger on the inside), share
//! a common skeleton (wall border, floor fill, one south door), and differ
//! only in furniture. Generation is total and deterministic per kind.

use crate::world::tiles::{BuildingKind, InteriorTile};
use crate::world::{Grid, Position};

/// A generated interior: the tile grid plus the landing tile just inside
/// the door.
#[derive(Debug, Clone)]
pub struct InteriorLayout {
    pub tiles: Grid<InteriorTile>,
    pub entrance_point: Position,
}

/// Builds interiors for every [`BuildingKind`].
#[derive(Debug, Default)]
pub struct InteriorGenerator;

impl InteriorGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates the interior for a building kind.
    ///
    /// Every interior has exactly one door, at the bottom-center of the
    /// grid, and the tile directly above it is always walkable floor.
    pub fn generate(&self, kind: BuildingKind) -> InteriorLayout {
        let (ext_w, ext_h) = kind.exterior_size();
        let (extra_w, extra_h) = match kind {
            BuildingKind::House | BuildingKind::Tower => (2, 2),
            BuildingKind::Tavern | BuildingKind::Forge => (3, 3),
            BuildingKind::Castle => (4, 4),
        };
        let w = (ext_w + extra_w) as i32;
        let h = (ext_h + extra_h) as i32;

        let mut layout = self.skeleton(w, h, kind);
        match kind {
            BuildingKind::House => self.furnish_house(&mut layout.tiles, w, h),
            BuildingKind::Tavern => self.furnish_tavern(&mut layout.tiles, w, h),
            BuildingKind::Forge => self.furnish_forge(&mut layout.tiles, w, h),
            BuildingKind::Tower => self.furnish_tower(&mut layout.tiles, w, h),
            BuildingKind::Castle => self.furnish_castle(&mut layout.tiles, w, h),
        }
        layout
    }

    /// Wall border, floor fill, south door, entrance point above the door.
    /// The castle variant uses a 2-tile wall and carves its own rooms.
    fn skeleton(&self, w: i32, h: i32, kind: BuildingKind) -> InteriorLayout {
        let mut tiles = Grid::new(w as u32, h as u32, InteriorTile::Wall);

        let border = if kind == BuildingKind::Castle { 2 } else { 1 };
        for y in border..h - border {
            for x in border..w - border {
                tiles.set(Position::new(x, y), InteriorTile::Floor);
            }
        }

        let door = Position::new(w / 2, h - 1);
        tiles.set(door, InteriorTile::Door);
        let entrance_point = Position::new(w / 2, h - 2);
        // The thick castle wall would leave the door boxed in.
        tiles.set(entrance_point, InteriorTile::Floor);

        InteriorLayout {
            tiles,
            entrance_point,
        }
    }

    fn furnish_house(&self, tiles: &mut Grid<InteriorTile>, w: i32, h: i32) {
        tiles.set(Position::new(w - 2, 1), InteriorTile::Bed);
        tiles.set(Position::new(w / 2, h / 2), InteriorTile::Table);
        tiles.set(Position::new(w / 2, h / 2 + 1), InteriorTile::Chair);
        if w >= 4 {
            tiles.set(Position::new(1, 1), InteriorTile::Window);
        }
    }

    fn furnish_tavern(&self, tiles: &mut Grid<InteriorTile>, w: i32, h: i32) {
        for x in 2..w - 2 {
            tiles.set(Position::new(x, 2), InteriorTile::Counter);
        }
        let table_spots = [
            Position::new(2, 4),
            Position::new(w - 3, 4),
            Position::new(2, h - 3),
            Position::new(w - 3, h - 3),
        ];
        for table in table_spots {
            if table.x < 1 || table.x >= w - 1 || table.y < 1 || table.y >= h - 1 {
                continue;
            }
            tiles.set(table, InteriorTile::Table);
            for chair in table.cardinal_adjacent_positions() {
                if tiles.get(chair) == Some(&InteriorTile::Floor) {
                    tiles.set(chair, InteriorTile::Chair);
                }
            }
        }
    }

    fn furnish_forge(&self, tiles: &mut Grid<InteriorTile>, w: i32, h: i32) {
        for x in 2..w - 2 {
            tiles.set(Position::new(x, 1), InteriorTile::Furnace);
        }
        tiles.set(Position::new(2, 3), InteriorTile::Anvil);
        tiles.set(Position::new(w - 3, 3), InteriorTile::Anvil);
        for y in h - 3..h - 1 {
            tiles.set(Position::new(1, y), InteriorTile::Storage);
            tiles.set(Position::new(w - 2, y), InteriorTile::Storage);
        }
    }

    fn furnish_tower(&self, tiles: &mut Grid<InteriorTile>, w: i32, h: i32) {
        // Upper floors are a stub behind the stairs for now.
        tiles.set(Position::new(1, 1), InteriorTile::StairsUp);
        tiles.set(Position::new(w / 2, h / 2), InteriorTile::Table);
    }

    fn furnish_castle(&self, tiles: &mut Grid<InteriorTile>, w: i32, h: i32) {
        tiles.set(Position::new(w / 2, 2), InteriorTile::Throne);
        if w >= 8 && h >= 8 {
            tiles.set(Position::new(3, 4), InteriorTile::Pillar);
            tiles.set(Position::new(w - 4, 4), InteriorTile::Pillar);
            tiles.set(Position::new(3, h - 5), InteriorTile::Pillar);
            tiles.set(Position::new(w - 4, h - 5), InteriorTile::Pillar);
        }
        // Side chamber in the northwest, opening into the hall through the
        // floor gap rather than a second door.
        for x in 1..3 {
            for y in 1..4 {
                tiles.set(Position::new(x, y), InteriorTile::Floor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [BuildingKind; 5] = [
        BuildingKind::House,
        BuildingKind::Tavern,
        BuildingKind::Forge,
        BuildingKind::Tower,
        BuildingKind::Castle,
    ];

    #[test]
    fn test_exactly_one_door() {
        let generator = InteriorGenerator::new();
        for kind in ALL_KINDS {
            let layout = generator.generate(kind);
            let doors = layout
                .tiles
                .count_matching(|t| *t == InteriorTile::Door);
            assert_eq!(doors, 1, "{} should have one door", kind.name());
        }
    }

    #[test]
    fn test_door_neighbor_is_walkable() {
        let generator = InteriorGenerator::new();
        for kind in ALL_KINDS {
            let layout = generator.generate(kind);
            let entrance = layout.tiles.get(layout.entrance_point).copied().unwrap();
            assert!(!entrance.is_solid(), "{} entrance blocked", kind.name());
        }
    }

    #[test]
    fn test_interior_is_larger_than_footprint() {
        let generator = InteriorGenerator::new();
        for kind in ALL_KINDS {
            let (ext_w, ext_h) = kind.exterior_size();
            let layout = generator.generate(kind);
            assert!(layout.tiles.width() > ext_w);
            assert!(layout.tiles.height() > ext_h);
        }
    }

    #[test]
    fn test_interior_floor_is_connected() {
        // Every walkable tile must be reachable from the entrance point, so
        // castle side rooms and tavern seating never get walled off.
        let generator = InteriorGenerator::new();
        for kind in ALL_KINDS {
            let layout = generator.generate(kind);
            let regions = layout.tiles.connected_regions(|t| !t.is_solid());
            let entrance_region = regions
                .iter()
                .find(|r| r.contains(&layout.entrance_point))
                .expect("entrance in a walkable region");
            let walkable = layout.tiles.count_matching(|t| !t.is_solid());
            assert_eq!(
                entrance_region.len(),
                walkable,
                "{} has unreachable interior tiles",
                kind.name()
            );
        }
    }

    #[test]
    fn test_forge_has_equipment() {
        let layout = InteriorGenerator::new().generate(BuildingKind::Forge);
        assert!(layout.tiles.count_matching(|t| *t == InteriorTile::Furnace) > 0);
        assert_eq!(layout.tiles.count_matching(|t| *t == InteriorTile::Anvil), 2);
        assert!(layout.tiles.count_matching(|t| *t == InteriorTile::Storage) > 0);
    }

    #[test]
    fn test_castle_has_throne_and_side_room() {
        let layout = InteriorGenerator::new().generate(BuildingKind::Castle);
        assert_eq!(layout.tiles.count_matching(|t| *t == InteriorTile::Throne), 1);
        assert_eq!(layout.tiles.get(Position::new(1, 1)), Some(&InteriorTile::Floor));
    }
}
