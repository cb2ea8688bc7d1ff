//! # Location Manager
//!
//! Tracks which map the actor currently occupies and mediates transitions
//! between the overworld, building interiors, and the dungeon. Transitions
//! are polled: input layers ask [`LocationManager::can_transition`] for the
//! intent available at the actor's tile, then apply it through
//! [`LocationManager::transition`].
//!
//! Entering a map saves the departing position; the matching exit restores
//! that exact coordinate, so an enter/exit pair is always a round trip.

use crate::world::buildings::{BuildingId, BuildingRegistry};
use crate::world::map::DungeonLevel;
use crate::world::tiles::{InteriorTile, OverworldTile};
use crate::world::{Actor, Grid, Position};
use crate::{WorldError, WorldResult};
use serde::{Deserialize, Serialize};

/// Which map the actor currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationKind {
    Overworld,
    BuildingInterior(BuildingId),
    Dungeon,
}

/// A transition available at the actor's current tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionIntent {
    EnterBuilding(BuildingId),
    ExitBuilding,
    EnterDungeon,
    ExitDungeon,
}

/// Outcome of applying a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    EnteredBuilding(BuildingId),
    ExitedBuilding,
    EnteredDungeon,
    ExitedDungeon,
    /// The actor's tile offers no transition.
    NoTransition,
}

/// State machine over [`LocationKind`] with a saved-position table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationManager {
    current: LocationKind,
    /// Departed locations, innermost last. Supports nested sub-states.
    stack: Vec<LocationKind>,
    /// Position to restore when returning to the keyed location.
    /// Small association list; kept as a Vec so snapshots serialize to JSON.
    saved_positions: Vec<(LocationKind, Position)>,
}

impl Default for LocationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationManager {
    /// Starts on the overworld with no history.
    pub fn new() -> Self {
        Self {
            current: LocationKind::Overworld,
            stack: Vec::new(),
            saved_positions: Vec::new(),
        }
    }

    fn save_position(&mut self, key: LocationKind, pos: Position) {
        if let Some(entry) = self.saved_positions.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = pos;
        } else {
            self.saved_positions.push((key, pos));
        }
    }

    pub fn current(&self) -> LocationKind {
        self.current
    }

    /// Returns the transition available at `position`, if any.
    pub fn can_transition(
        &self,
        position: Position,
        terrain: &Grid<OverworldTile>,
        buildings: &BuildingRegistry,
        dungeon: &DungeonLevel,
    ) -> Option<TransitionIntent> {
        match self.current {
            LocationKind::Overworld => match terrain.get(position)? {
                OverworldTile::Door(_) => {
                    buildings.building_at_door(position).map(TransitionIntent::EnterBuilding)
                }
                OverworldTile::DungeonEntrance => {
                    dungeon.entrance_from_overworld(position)?;
                    Some(TransitionIntent::EnterDungeon)
                }
                _ => None,
            },
            LocationKind::BuildingInterior(id) => {
                let building = buildings.get(id)?;
                match building.interior.get(position)? {
                    InteriorTile::Door => Some(TransitionIntent::ExitBuilding),
                    _ => None,
                }
            }
            LocationKind::Dungeon => {
                if dungeon.entrance_at(position).is_some() {
                    Some(TransitionIntent::ExitDungeon)
                } else {
                    None
                }
            }
        }
    }

    /// Applies a transition: saves the departing position, relocates the
    /// actor, and updates the current location.
    pub fn transition(
        &mut self,
        intent: TransitionIntent,
        actor: &mut Actor,
        buildings: &BuildingRegistry,
        dungeon: &DungeonLevel,
    ) -> WorldResult<TransitionResult> {
        match intent {
            TransitionIntent::EnterBuilding(id) => {
                if self.current != LocationKind::Overworld {
                    return Err(WorldError::InvalidTransition(
                        "buildings are entered from the overworld".to_string(),
                    ));
                }
                let building = buildings.get(id).ok_or_else(|| {
                    WorldError::InvalidTransition(format!("no building with id {id}"))
                })?;
                self.save_position(LocationKind::Overworld, actor.position);
                self.stack.push(self.current);
                actor.position = building.entrance_point;
                self.current = LocationKind::BuildingInterior(id);
                log::debug!("entered building {} ({})", id, building.kind.name());
                Ok(TransitionResult::EnteredBuilding(id))
            }
            TransitionIntent::ExitBuilding => {
                if !matches!(self.current, LocationKind::BuildingInterior(_)) {
                    return Err(WorldError::InvalidTransition(
                        "not inside a building".to_string(),
                    ));
                }
                let restored = self.take_saved(LocationKind::Overworld)?;
                self.stack.pop();
                actor.position = restored;
                self.current = LocationKind::Overworld;
                Ok(TransitionResult::ExitedBuilding)
            }
            TransitionIntent::EnterDungeon => {
                if self.current != LocationKind::Overworld {
                    return Err(WorldError::InvalidTransition(
                        "the dungeon is entered from the overworld".to_string(),
                    ));
                }
                let entry = dungeon.entrance_from_overworld(actor.position).ok_or_else(|| {
                    WorldError::InvalidTransition(format!(
                        "no dungeon entrance at ({}, {})",
                        actor.position.x, actor.position.y
                    ))
                })?;
                self.save_position(LocationKind::Overworld, actor.position);
                self.stack.push(self.current);
                actor.position = entry;
                self.current = LocationKind::Dungeon;
                log::debug!("descended into the dungeon at ({}, {})", entry.x, entry.y);
                Ok(TransitionResult::EnteredDungeon)
            }
            TransitionIntent::ExitDungeon => {
                if self.current != LocationKind::Dungeon {
                    return Err(WorldError::InvalidTransition(
                        "not inside the dungeon".to_string(),
                    ));
                }
                let restored = self.take_saved(LocationKind::Overworld)?;
                self.stack.pop();
                actor.position = restored;
                self.current = LocationKind::Overworld;
                Ok(TransitionResult::ExitedDungeon)
            }
        }
    }

    fn take_saved(&mut self, key: LocationKind) -> WorldResult<Position> {
        // A missing entry means an exit without a matching enter, which the
        // state checks above should have ruled out.
        let idx = self.saved_positions.iter().position(|(k, _)| *k == key);
        debug_assert!(idx.is_some());
        match idx {
            Some(i) => Ok(self.saved_positions.remove(i).1),
            None => Err(WorldError::InvalidTransition(
                "no saved position to return to".to_string(),
            )),
        }
    }
}
