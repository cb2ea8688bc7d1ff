//! # Grid
//!
//! Generic dense 2D grid storage shared by the overworld terrain, the
//! dungeon level, building interiors, and the WFC superposition field.

use crate::Position;
use serde::{Deserialize, Serialize};

/// Dense row-major 2D grid.
///
/// All accessors are total: out-of-bounds reads return `None` rather than
/// panicking, which lets the query layer substitute sentinel tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `fill`.
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks whether a position lies within the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width as i32 && pos.y < self.height as i32
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some((pos.y as u32 * self.width + pos.x as u32) as usize)
        } else {
            None
        }
    }

    /// Returns the cell at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<&T> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Returns a mutable reference to the cell at `pos`.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Sets the cell at `pos`, ignoring out-of-bounds writes.
    pub fn set(&mut self, pos: Position, value: T) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = value;
        }
    }

    /// Iterates over every coordinate in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Iterates over `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        self.positions().zip(self.cells.iter())
    }

    /// Number of cells matching a predicate.
    pub fn count_matching(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.cells.iter().filter(|c| pred(c)).count()
    }
}

impl<T: Clone + PartialEq> Grid<T> {
    /// Finds all maximal 4-connected regions of cells matching `pred`.
    ///
    /// Iterative flood fill with an explicit stack so large grids cannot
    /// exhaust the call stack.
    pub fn connected_regions(&self, pred: impl Fn(&T) -> bool) -> Vec<Vec<Position>> {
        let mut visited = Grid::new(self.width, self.height, false);
        let mut regions = Vec::new();

        for start in self.positions() {
            if *visited.get(start).unwrap_or(&true) {
                continue;
            }
            if !self.get(start).map(&pred).unwrap_or(false) {
                continue;
            }

            let mut region = Vec::new();
            let mut stack = vec![start];
            visited.set(start, true);

            while let Some(pos) = stack.pop() {
                region.push(pos);
                for next in pos.cardinal_adjacent_positions() {
                    if !self.in_bounds(next) || *visited.get(next).unwrap_or(&true) {
                        continue;
                    }
                    if self.get(next).map(&pred).unwrap_or(false) {
                        visited.set(next, true);
                        stack.push(next);
                    }
                }
            }

            regions.push(region);
        }

        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds_are_total() {
        let grid = Grid::new(4, 3, 0u8);
        assert!(grid.get(Position::new(3, 2)).is_some());
        assert!(grid.get(Position::new(4, 2)).is_none());
        assert!(grid.get(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_grid_set_out_of_bounds_is_noop() {
        let mut grid = Grid::new(2, 2, 0u8);
        grid.set(Position::new(5, 5), 9);
        assert_eq!(grid.count_matching(|&c| c == 9), 0);
    }

    #[test]
    fn test_connected_regions_splits_diagonals() {
        // Two floor cells touching only diagonally are separate regions.
        let mut grid = Grid::new(3, 3, '#');
        grid.set(Position::new(0, 0), '.');
        grid.set(Position::new(1, 1), '.');
        let regions = grid.connected_regions(|&c| c == '.');
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_connected_regions_finds_full_area() {
        let mut grid = Grid::new(5, 5, '#');
        for x in 1..4 {
            for y in 1..4 {
                grid.set(Position::new(x, y), '.');
            }
        }
        let regions = grid.connected_regions(|&c| c == '.');
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 9);
    }
}
