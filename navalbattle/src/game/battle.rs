// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! The two-sided battle state machine.
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::{
    board::{
        BoardDimensions, CannotPlaceReason, CannotShootReason, Coordinate, Grid, GridCell,
        PlaceError, ShotError,
    },
    config::{ConfigError, GameConfig},
    game::{BattleObserver, Side},
    rng::DeterministicRng,
    ships::{check_placement, PlacementRequest, Ship, ShipId, ShipPlacer, MIN_DISTANCE},
};

/// Stage of a battle, derived from the fleets and the shots fired.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    /// At least one fleet is empty. Ships may be added; shots are refused.
    Setup,
    /// Both fleets have ships and neither is fully destroyed.
    InProgress,
    /// One fleet is fully destroyed. Terminal.
    GameOver,
}

/// A shot fired at one side's board. Immutable once recorded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    pub position: Coordinate,
    pub hit: bool,
    /// The ship that was hit, if any.
    pub ship_id: Option<ShipId>,
}

/// Outcome of a successfully-fired shot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShotOutcome {
    /// Nothing was hit.
    Miss,
    /// The given ship was hit but not destroyed.
    Hit(ShipId),
    /// The given ship was hit and destroyed, but the target still has other ships.
    Destroyed(ShipId),
    /// The given ship was hit and destroyed, and it was the target's last ship.
    Victory(ShipId),
}

impl ShotOutcome {
    /// Whether a ship was hit.
    pub fn hit(&self) -> bool {
        self.ship().is_some()
    }

    /// Whether the shot destroyed the ship it hit.
    pub fn destroyed(&self) -> bool {
        matches!(self, ShotOutcome::Destroyed(_) | ShotOutcome::Victory(_))
    }

    /// Get the id of the ship that was hit.
    pub fn ship(&self) -> Option<ShipId> {
        match *self {
            ShotOutcome::Miss => None,
            ShotOutcome::Hit(id) | ShotOutcome::Destroyed(id) | ShotOutcome::Victory(id) => {
                Some(id)
            }
        }
    }
}

/// Whether the firing side keeps the turn after a shot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TurnAdvance {
    Keep,
    Pass,
}

/// The turn rule: a miss passes the turn, a hit that leaves the ship afloat keeps it,
/// and a hit that destroys the ship passes it.
pub fn turn_advance(outcome: &ShotOutcome) -> TurnAdvance {
    match outcome {
        ShotOutcome::Hit(_) => TurnAdvance::Keep,
        ShotOutcome::Miss | ShotOutcome::Destroyed(_) | ShotOutcome::Victory(_) => {
            TurnAdvance::Pass
        }
    }
}

/// One side's fleet and the shots fired at it.
#[derive(Debug, Clone)]
struct SideState {
    fleet: Vec<Ship>,
    grid: Grid,
    /// Incoming shots in the order they were fired.
    shots: Vec<Shot>,
}

impl SideState {
    fn new(dim: BoardDimensions) -> Self {
        Self {
            fleet: Vec::new(),
            grid: Grid::new(dim),
            shots: Vec::new(),
        }
    }

    fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.fleet.iter().find(|ship| ship.id == id)
    }

    fn hits_on(&self, id: ShipId) -> usize {
        self.shots
            .iter()
            .filter(|shot| shot.ship_id == Some(id))
            .count()
    }

    fn is_destroyed(&self, id: ShipId) -> bool {
        self.ship(id)
            .map_or(false, |ship| self.hits_on(id) >= ship.size())
    }

    fn defeated(&self) -> bool {
        !self.fleet.is_empty() && self.fleet.iter().all(|ship| self.is_destroyed(ship.id))
    }
}

/// State of a single match between the player and the enemy. Both sides play on boards
/// of the same dimensions.
pub struct Battle {
    dim: BoardDimensions,
    min_distance: usize,
    sides: [SideState; 2],
    turn: Side,
    observer: Option<Box<dyn BattleObserver>>,
}

impl Battle {
    /// Start an empty battle. The player moves first unless changed with
    /// [`set_turn`][Self::set_turn].
    pub fn new(dim: BoardDimensions) -> Self {
        Self {
            dim,
            min_distance: MIN_DISTANCE,
            sides: [SideState::new(dim), SideState::new(dim)],
            turn: Side::Player,
            observer: None,
        }
    }

    /// Start a battle with explicit fleets. Fails on the first ship that violates the
    /// placement rules.
    pub fn with_fleets(
        dim: BoardDimensions,
        player: impl IntoIterator<Item = Ship>,
        enemy: impl IntoIterator<Item = Ship>,
    ) -> Result<Self, PlaceError> {
        let mut battle = Self::new(dim);
        for ship in player {
            battle.add_ship(Side::Player, ship)?;
        }
        for ship in enemy {
            battle.add_ship(Side::Enemy, ship)?;
        }
        Ok(battle)
    }

    /// Set up a match from `config`: generate both fleets, player first, and resolve the
    /// initial turn. All randomness comes from `rng`.
    pub fn from_config(
        config: &GameConfig,
        rng: &mut DeterministicRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let request = PlacementRequest::from_config(config)?;
        let placer = ShipPlacer::default();
        let mut battle = Self::new(request.dimensions);
        for side in Side::BOTH.iter().copied() {
            let placement = placer.place_fleet(rng, &request);
            for ship in placement.ships {
                // Generated ships already satisfy the rules this battle checks.
                if let Err(err) = battle.add_ship(side, ship) {
                    debug!("dropping generated {:?} ship: {}", side, err);
                }
            }
        }
        battle.turn = config.initial_turn.resolve(rng);
        Ok(battle)
    }

    /// Attach an observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn BattleObserver>) {
        self.observer = Some(observer);
    }

    /// Detach and return the current observer.
    pub fn take_observer(&mut self) -> Option<Box<dyn BattleObserver>> {
        self.observer.take()
    }

    pub fn dimensions(&self) -> &BoardDimensions {
        &self.dim
    }

    /// Add a ship to `side`'s fleet. On failure the fleet is unchanged.
    pub fn add_ship(&mut self, side: Side, ship: Ship) -> Result<(), PlaceError> {
        if self.sides.iter().any(|s| !s.shots.is_empty()) {
            return Err(PlaceError::new(CannotPlaceReason::BattleStarted, ship));
        }
        let state = &mut self.sides[side.index()];
        check_placement(&self.dim, &state.fleet, &ship, self.min_distance)
            .map_err(|reason| PlaceError::new(reason, ship))?;
        for cell in ship.cells() {
            state.grid[&cell].ship = Some(ship.id);
        }
        state.fleet.push(ship);
        Ok(())
    }

    /// Current stage of the battle.
    pub fn phase(&self) -> Phase {
        if self.sides.iter().any(|s| s.fleet.is_empty()) {
            Phase::Setup
        } else if self.sides.iter().any(SideState::defeated) {
            Phase::GameOver
        } else {
            Phase::InProgress
        }
    }

    /// The side whose turn it is.
    pub fn current_turn(&self) -> Side {
        self.turn
    }

    /// Hand the turn to `side`, notifying the observer if it changed.
    pub fn set_turn(&mut self, side: Side) {
        if side != self.turn {
            let from = self.turn;
            self.turn = side;
            debug!("turn passes from {:?} to {:?}", from, side);
            if let Some(observer) = self.observer.as_mut() {
                observer.turn_changed(from, side);
            }
        }
    }

    /// Hand the turn to the other side.
    pub fn toggle_turn(&mut self) {
        self.set_turn(self.turn.opponent());
    }

    /// Apply the turn rule for `outcome` and return the side whose turn it now is.
    pub fn advance_turn(&mut self, outcome: &ShotOutcome) -> Side {
        if turn_advance(outcome) == TurnAdvance::Pass {
            self.toggle_turn();
        }
        self.turn
    }

    /// Fire at `position` on the opponent of `firing`'s board. Does not change the turn.
    pub fn fire_shot(
        &mut self,
        firing: Side,
        position: Coordinate,
    ) -> Result<ShotOutcome, ShotError> {
        match self.phase() {
            Phase::Setup => {
                return Err(ShotError::new(CannotShootReason::FleetsNotReady, position))
            }
            Phase::GameOver => {
                return Err(ShotError::new(CannotShootReason::GameAlreadyOver, position))
            }
            Phase::InProgress => {}
        }
        let target = firing.opponent();
        let state = &mut self.sides[target.index()];
        let ship_id = match state.grid.get_mut(&position) {
            None => return Err(ShotError::new(CannotShootReason::OutOfBounds, position)),
            Some(cell) if cell.hit => {
                return Err(ShotError::new(CannotShootReason::AlreadyShot, position))
            }
            Some(cell) => {
                cell.hit = true;
                cell.ship
            }
        };
        state.shots.push(Shot {
            position,
            hit: ship_id.is_some(),
            ship_id,
        });

        let id = match ship_id {
            None => return Ok(ShotOutcome::Miss),
            Some(id) => id,
        };
        if !state.is_destroyed(id) {
            return Ok(ShotOutcome::Hit(id));
        }
        let defeated = state.defeated();
        if let (Some(observer), Some(ship)) = (self.observer.as_mut(), state.ship(id)) {
            observer.ship_destroyed(target, ship);
            if defeated {
                observer.game_over(firing);
            }
        }
        if defeated {
            debug!("{:?} destroyed the last {:?} ship", firing, target);
            Ok(ShotOutcome::Victory(id))
        } else {
            Ok(ShotOutcome::Destroyed(id))
        }
    }

    /// Fire as the side whose turn it is, then apply the turn rule.
    pub fn play_turn(&mut self, position: Coordinate) -> Result<ShotOutcome, ShotError> {
        let outcome = self.fire_shot(self.turn, position)?;
        self.advance_turn(&outcome);
        Ok(outcome)
    }

    /// Whether every cell of `side`'s ship `ship_id` has been hit. Unknown ids are never
    /// destroyed.
    pub fn is_ship_destroyed(&self, side: Side, ship_id: ShipId) -> bool {
        self.sides[side.index()].is_destroyed(ship_id)
    }

    /// Whether one side's fleet has been entirely destroyed.
    pub fn is_game_over(&self) -> bool {
        self.phase() == Phase::GameOver
    }

    /// The side whose opponent's fleet was destroyed, if the game is over.
    pub fn winner(&self) -> Option<Side> {
        if self.phase() != Phase::GameOver {
            return None;
        }
        Side::BOTH
            .iter()
            .copied()
            .find(|side| self.sides[side.opponent().index()].defeated())
    }

    /// `side`'s ships in placement order.
    pub fn fleet(&self, side: Side) -> &[Ship] {
        &self.sides[side.index()].fleet
    }

    /// Get one of `side`'s ships by id.
    pub fn ship(&self, side: Side, ship_id: ShipId) -> Option<&Ship> {
        self.sides[side.index()].ship(ship_id)
    }

    /// Shots fired at `side`'s board, oldest first.
    pub fn shots(&self, side: Side) -> &[Shot] {
        &self.sides[side.index()].shots
    }

    /// Cells of `side`'s board that have not been shot, row-major.
    pub fn untried_cells(&self, side: Side) -> Vec<Coordinate> {
        self.sides[side.index()].grid.untried().collect()
    }

    /// Whether `position` on `side`'s board is on the board and not yet shot.
    pub fn is_untried(&self, side: Side, position: &Coordinate) -> bool {
        self.sides[side.index()]
            .grid
            .get(position)
            .map_or(false, |cell| !cell.hit)
    }

    /// Number of `side`'s ships still afloat.
    pub fn remaining_ships(&self, side: Side) -> usize {
        let state = &self.sides[side.index()];
        state
            .fleet
            .iter()
            .filter(|ship| !state.is_destroyed(ship.id))
            .count()
    }

    /// Occupancy and hit state of one cell on `side`'s board.
    pub fn cell(&self, side: Side, position: &Coordinate) -> Option<GridCell> {
        self.sides[side.index()].grid.get(position).copied()
    }
}

impl fmt::Debug for Battle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Battle")
            .field("dim", &self.dim)
            .field("min_distance", &self.min_distance)
            .field("sides", &self.sides)
            .field("turn", &self.turn)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
