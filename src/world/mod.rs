//! # World Module
//!
//! Runtime world model: coordinates, grids, tile catalogs, buildings, the
//! location/transition state machine, and the [`World`] facade that exposes
//! the generated maps to rendering and input layers.

pub mod buildings;
pub mod grid;
pub mod location;
pub mod map;
pub mod tiles;

pub use buildings::*;
pub use grid::*;
pub use location::*;
pub use map::*;
pub use tiles::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate on any of the world's maps.
///
/// # Examples
///
/// ```
/// use emberfell::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.manhattan_distance(Position::new(13, 9)), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    /// Returns only the 4 cardinal adjacent positions (no diagonals).
    pub fn cardinal_adjacent_positions(self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle in tile coordinates.
///
/// Used for room footprints, building exteriors, and region bounding boxes.
///
/// # Examples
///
/// ```
/// use emberfell::{Position, Rect};
///
/// let rect = Rect::new(5, 5, 10, 8);
/// assert_eq!(rect.center(), Position::new(10, 9));
/// assert!(rect.contains(Position::new(7, 7)));
/// assert!(!rect.contains(Position::new(15, 12)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and dimensions.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Center position of the rectangle.
    pub fn center(&self) -> Position {
        Position::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }

    /// Checks whether a position lies inside this rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x && pos.y >= self.y && pos.x < self.right() && pos.y < self.bottom()
    }

    /// Checks whether this rectangle overlaps another.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || other.x >= self.right()
            || self.y >= other.bottom()
            || other.y >= self.bottom())
    }

    /// Returns the rectangle grown by `margin` tiles on every side.
    pub fn expanded(&self, margin: u32) -> Rect {
        Rect::new(
            self.x - margin as i32,
            self.y - margin as i32,
            self.width + margin * 2,
            self.height + margin * 2,
        )
    }
}

/// Minimal handle for the entity whose position the world relocates during
/// transitions. Character data lives in an external collaborator; the world
/// core only needs a coordinate it can read and move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub position: Position,
}

impl Actor {
    /// Creates an actor at the given position.
    pub fn new(position: Position) -> Self {
        Self { position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_manhattan_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(pos2), 7);
    }

    #[test]
    fn test_position_cardinal_adjacent() {
        let pos = Position::new(5, 5);
        let adjacent = pos.cardinal_adjacent_positions();
        assert_eq!(adjacent.len(), 4);
        assert!(adjacent.contains(&Position::new(5, 4)));
        assert!(adjacent.contains(&Position::new(4, 5)));
        assert!(!adjacent.contains(&Position::new(4, 4)));
    }

    #[test]
    fn test_position_arithmetic() {
        let pos1 = Position::new(5, 10);
        let pos2 = Position::new(3, 2);
        assert_eq!(pos1 + pos2, Position::new(8, 12));
        assert_eq!(pos1 - pos2, Position::new(2, 8));
    }

    #[test]
    fn test_rect_geometry() {
        let rect = Rect::new(5, 5, 10, 8);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 13);
        assert_eq!(rect.center(), Position::new(10, 9));
        assert!(rect.contains(Position::new(5, 5)));
        assert!(rect.contains(Position::new(14, 12)));
        assert!(!rect.contains(Position::new(15, 12)));
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(5, 5, 10, 8);
        let b = Rect::new(10, 8, 6, 6);
        let c = Rect::new(20, 20, 5, 5);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_expanded_catches_adjacency() {
        // Two footprints touching edge-to-edge violate a 1-tile gap once one
        // side is expanded.
        let a = Rect::new(0, 0, 3, 3);
        let b = Rect::new(3, 0, 3, 3);
        assert!(!a.intersects(&b));
        assert!(a.expanded(1).intersects(&b));
    }
}
