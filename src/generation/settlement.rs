//! # Settlement Generator
//!
//! Founds settlements on the sites the overworld query produced: clears a
//! diamond of roads and settled land, places the category's building
//! manifest with three fallback strategies, stamps building exteriors onto
//! the terrain, and finally connects all settlements with roads.

use crate::generation::interior::InteriorGenerator;
use crate::world::buildings::{
    Building, BuildingRegistry, Facing, Settlement, SettlementCategory,
};
use crate::world::tiles::{BuildingKind, OverworldTile};
use crate::world::{Grid, Position, Rect};
use rand::rngs::StdRng;
use rand::Rng;

/// Lays out settlements, their buildings, and the connecting road network.
#[derive(Debug, Default)]
pub struct SettlementGenerator;

impl SettlementGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Founds one settlement per site: the first is always a town, the
    /// second a village, the rest roll village or hamlet. Afterwards the
    /// road network connects every settlement to the first and to its
    /// successor.
    pub fn generate_settlements(
        &self,
        terrain: &mut Grid<OverworldTile>,
        registry: &mut BuildingRegistry,
        sites: &[Position],
        rng: &mut StdRng,
    ) -> Vec<Settlement> {
        let mut settlements = Vec::new();

        for (i, &center) in sites.iter().enumerate() {
            let category = match i {
                0 => SettlementCategory::Town,
                1 => SettlementCategory::Village,
                _ => {
                    if rng.gen_bool(0.5) {
                        SettlementCategory::Village
                    } else {
                        SettlementCategory::Hamlet
                    }
                }
            };
            let settlement = self.layout_settlement(terrain, registry, center, category, rng);
            log::debug!(
                "{} at ({}, {}): {} of {} buildings placed",
                category.name(),
                center.x,
                center.y,
                settlement.buildings.len(),
                category.manifest().len()
            );
            settlements.push(settlement);
        }

        self.connect_with_roads(terrain, &settlements);
        settlements
    }

    /// Lays out a single settlement of the given category at `center`.
    pub fn layout_settlement(
        &self,
        terrain: &mut Grid<OverworldTile>,
        registry: &mut BuildingRegistry,
        center: Position,
        category: SettlementCategory,
        rng: &mut StdRng,
    ) -> Settlement {
        let size = category.size() as i32;
        self.stamp_clearing(terrain, center, size);

        let mut settlement = Settlement::new(center, category);
        let mut placed: Vec<Rect> = Vec::new();

        for kind in category.manifest() {
            match self.find_building_position(terrain, center, size, kind, &placed, rng) {
                Some(pos) => {
                    let footprint = footprint_rect(pos, kind);
                    let id = self.place_building(terrain, registry, kind, footprint);
                    placed.push(footprint);
                    settlement.buildings.push(id);
                }
                None => {
                    log::warn!(
                        "no valid site for {} in {} at ({}, {})",
                        kind.name(),
                        category.name(),
                        center.x,
                        center.y
                    );
                }
            }
        }

        settlement
    }

    /// Clears the settlement diamond: cross-axis tiles become road, the
    /// inner area settled land. Settlements of size 4 and up also get
    /// diagonal roads.
    fn stamp_clearing(&self, terrain: &mut Grid<OverworldTile>, center: Position, size: i32) {
        for dx in -(size + 1)..=(size + 1) {
            for dy in -(size + 1)..=(size + 1) {
                let pos = center + Position::new(dx, dy);
                let distance = dx.abs() + dy.abs();
                if distance <= size {
                    if dx == 0 || dy == 0 {
                        terrain.set(pos, OverworldTile::Road);
                    } else if distance <= size - 1 {
                        terrain.set(pos, OverworldTile::SettledLand);
                    }
                }
            }
        }

        if size >= 4 {
            for i in 1..size {
                terrain.set(center + Position::new(i, i), OverworldTile::Road);
                terrain.set(center + Position::new(-i, -i), OverworldTile::Road);
                terrain.set(center + Position::new(i, -i), OverworldTile::Road);
                terrain.set(center + Position::new(-i, i), OverworldTile::Road);
            }
        }
    }

    /// Tries grid-aligned offsets, then random offsets, then the four edge
    /// positions. Returns the top-left corner of a valid footprint.
    fn find_building_position(
        &self,
        terrain: &Grid<OverworldTile>,
        center: Position,
        size: i32,
        kind: BuildingKind,
        placed: &[Rect],
        rng: &mut StdRng,
    ) -> Option<Position> {
        let (w, h) = kind.exterior_size();
        let (w, h) = (w as i32, h as i32);

        // Grid-aligned offsets around the center.
        let mut grid_offset = -size + 1;
        while grid_offset < size {
            let mut gy = -size + 1;
            while gy < size {
                let pos = center + Position::new(grid_offset, gy);
                if self.is_position_valid(terrain, footprint_rect(pos, kind), placed) {
                    return Some(pos);
                }
                gy += 2;
            }
            grid_offset += 2;
        }

        // Random offsets inside the settlement bounds.
        if size - w >= -size + 1 && size - h >= -size + 1 {
            for _ in 0..50 {
                let dx = rng.gen_range(-size + 1..=size - w);
                let dy = rng.gen_range(-size + 1..=size - h);
                let pos = center + Position::new(dx, dy);
                if self.is_position_valid(terrain, footprint_rect(pos, kind), placed) {
                    return Some(pos);
                }
            }
        }

        // Edge positions.
        let edges = [
            center + Position::new(-size + 1, 0),
            center + Position::new(size - w, 0),
            center + Position::new(0, -size + 1),
            center + Position::new(0, size - h),
        ];
        edges
            .into_iter()
            .find(|&pos| self.is_position_valid(terrain, footprint_rect(pos, kind), placed))
    }

    /// A footprint is valid when it lies fully on buildable terrain and
    /// keeps at least a 1-tile gap from every placed footprint.
    fn is_position_valid(
        &self,
        terrain: &Grid<OverworldTile>,
        footprint: Rect,
        placed: &[Rect],
    ) -> bool {
        for y in footprint.y..footprint.bottom() {
            for x in footprint.x..footprint.right() {
                match terrain.get(Position::new(x, y)) {
                    Some(tile) if tile.is_buildable() => {}
                    _ => return false,
                }
            }
        }
        !placed
            .iter()
            .any(|other| footprint.expanded(1).intersects(other))
    }

    /// Stamps roof and door tiles, generates the interior, and registers
    /// the building. The door is always at the bottom-center of the
    /// footprint.
    fn place_building(
        &self,
        terrain: &mut Grid<OverworldTile>,
        registry: &mut BuildingRegistry,
        kind: BuildingKind,
        footprint: Rect,
    ) -> crate::world::buildings::BuildingId {
        for y in footprint.y..footprint.bottom() {
            for x in footprint.x..footprint.right() {
                terrain.set(Position::new(x, y), OverworldTile::Roof(kind));
            }
        }
        let door = Position::new(
            footprint.x + footprint.width as i32 / 2,
            footprint.bottom() - 1,
        );
        terrain.set(door, OverworldTile::Door(kind));

        let layout = InteriorGenerator::new().generate(kind);
        registry.insert(Building {
            kind,
            exterior: footprint,
            interior: layout.tiles,
            door,
            facing: Facing::South,
            entrance_point: layout.entrance_point,
        })
    }

    /// Connects every settlement to the first one and to its successor with
    /// horizontal-then-vertical road carving.
    pub fn connect_with_roads(&self, terrain: &mut Grid<OverworldTile>, settlements: &[Settlement]) {
        if settlements.len() < 2 {
            return;
        }
        let main = settlements[0].center;
        for settlement in settlements.iter().skip(1) {
            self.carve_road(terrain, settlement.center, main);
        }
        for pair in settlements.windows(2) {
            self.carve_road(terrain, pair[0].center, pair[1].center);
        }
    }

    fn carve_road(&self, terrain: &mut Grid<OverworldTile>, from: Position, to: Position) {
        let mut current = from;
        while current.x != to.x {
            current.x += (to.x - current.x).signum();
            self.lay_road_tile(terrain, current);
        }
        while current.y != to.y {
            current.y += (to.y - current.y).signum();
            self.lay_road_tile(terrain, current);
        }
    }

    fn lay_road_tile(&self, terrain: &mut Grid<OverworldTile>, pos: Position) {
        if let Some(&tile) = terrain.get(pos) {
            if !tile.blocks_road() {
                terrain.set(pos, OverworldTile::Road);
            }
        }
    }
}

fn footprint_rect(pos: Position, kind: BuildingKind) -> Rect {
    let (w, h) = kind.exterior_size();
    Rect::new(pos.x, pos.y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{utils, GenerationConfig};

    fn flat_terrain(size: u32) -> Grid<OverworldTile> {
        Grid::new(size, size, OverworldTile::Grasslands)
    }

    fn rng(seed: u64) -> StdRng {
        utils::create_rng(&GenerationConfig::for_testing(seed))
    }

    #[test]
    fn test_buildings_stay_within_manifest() {
        let mut terrain = flat_terrain(40);
        let mut registry = BuildingRegistry::new();
        let generator = SettlementGenerator::new();
        let mut r = rng(3);

        for (center, category) in [
            (Position::new(10, 10), SettlementCategory::Town),
            (Position::new(30, 10), SettlementCategory::Village),
            (Position::new(20, 30), SettlementCategory::Hamlet),
        ] {
            let settlement =
                generator.layout_settlement(&mut terrain, &mut registry, center, category, &mut r);
            assert!(settlement.buildings.len() <= category.manifest().len());
        }
    }

    #[test]
    fn test_footprints_do_not_intersect() {
        let mut terrain = flat_terrain(40);
        let mut registry = BuildingRegistry::new();
        let generator = SettlementGenerator::new();
        let mut r = rng(8);

        let settlement = generator.layout_settlement(
            &mut terrain,
            &mut registry,
            Position::new(20, 20),
            SettlementCategory::Town,
            &mut r,
        );

        let rects: Vec<Rect> = settlement
            .buildings
            .iter()
            .map(|&id| registry.get(id).unwrap().exterior)
            .collect();
        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.intersects(b));
                assert!(!a.expanded(1).intersects(b));
            }
        }
    }

    #[test]
    fn test_footprints_only_claim_buildable_ground() {
        let mut terrain = flat_terrain(40);
        let center = Position::new(20, 20);
        // Unbuildable pockets close enough for footprints to reach but off
        // the cleared diamond and its diagonal roads, so they survive the
        // clearing stamp untouched.
        for offset in [
            Position::new(4, 3),
            Position::new(3, 4),
            Position::new(-4, 3),
            Position::new(-3, 4),
            Position::new(4, -3),
            Position::new(3, -4),
            Position::new(-4, -3),
            Position::new(-3, -4),
            Position::new(5, 2),
            Position::new(-5, 2),
            Position::new(5, -2),
            Position::new(-5, -2),
        ] {
            terrain.set(center + offset, OverworldTile::Ocean);
        }
        let snapshot = terrain.clone();

        let mut registry = BuildingRegistry::new();
        let generator = SettlementGenerator::new();
        let mut r = rng(8);
        let settlement =
            generator.layout_settlement(&mut terrain, &mut registry, center, SettlementCategory::Town, &mut r);
        assert!(!settlement.buildings.is_empty());

        for &id in &settlement.buildings {
            let b = registry.get(id).unwrap();
            for y in b.exterior.y..b.exterior.bottom() {
                for x in b.exterior.x..b.exterior.right() {
                    let before = snapshot.get(Position::new(x, y)).unwrap();
                    assert!(
                        before.is_buildable(),
                        "footprint cell ({}, {}) sat on {:?} before layout",
                        x,
                        y,
                        before
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_building_has_a_door_tile() {
        let mut terrain = flat_terrain(40);
        let mut registry = BuildingRegistry::new();
        let generator = SettlementGenerator::new();
        let mut r = rng(5);

        let settlement = generator.layout_settlement(
            &mut terrain,
            &mut registry,
            Position::new(20, 20),
            SettlementCategory::Village,
            &mut r,
        );
        for &id in &settlement.buildings {
            let building = registry.get(id).unwrap();
            assert_eq!(
                terrain.get(building.door),
                Some(&OverworldTile::Door(building.kind))
            );
            assert!(building.exterior.contains(building.door));
        }
    }

    #[test]
    fn test_roads_connect_settlement_centers() {
        let mut terrain = flat_terrain(60);
        let mut registry = BuildingRegistry::new();
        let generator = SettlementGenerator::new();
        let mut r = rng(2);

        let sites = [Position::new(15, 15), Position::new(45, 45)];
        let settlements =
            generator.generate_settlements(&mut terrain, &mut registry, &sites, &mut r);
        assert_eq!(settlements.len(), 2);

        // Both centers end up on the same road/settled network.
        let regions = terrain.connected_regions(|t| {
            matches!(
                t,
                OverworldTile::Road | OverworldTile::SettledLand | OverworldTile::Door(_)
            )
        });
        let containing: Vec<usize> = settlements
            .iter()
            .map(|s| {
                regions
                    .iter()
                    .position(|r| r.contains(&s.center))
                    .expect("center on road network")
            })
            .collect();
        assert_eq!(containing[0], containing[1]);
    }

    #[test]
    fn test_unbuildable_site_places_nothing() {
        let mut terrain = Grid::new(40, 40, OverworldTile::Ocean);
        let mut registry = BuildingRegistry::new();
        let generator = SettlementGenerator::new();
        let mut r = rng(1);

        // The clearing stamps over the ocean, so some placements can still
        // succeed; buildings that do land must sit on cleared ground.
        let settlement = generator.layout_settlement(
            &mut terrain,
            &mut registry,
            Position::new(20, 20),
            SettlementCategory::Hamlet,
            &mut r,
        );
        for &id in &settlement.buildings {
            let b = registry.get(id).unwrap();
            for y in b.exterior.y..b.exterior.bottom() {
                for x in b.exterior.x..b.exterior.right() {
                    let tile = terrain.get(Position::new(x, y)).unwrap();
                    assert!(matches!(
                        tile,
                        OverworldTile::Roof(_) | OverworldTile::Door(_)
                    ));
                }
            }
        }
    }
}
