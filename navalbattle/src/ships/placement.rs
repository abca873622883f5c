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
//! Constrained random fleet generation.
//!
//! Ships are placed one at a time, smallest variant first, by sampling candidate
//! placements until one is in bounds and keeps its distance from every ship placed so
//! far. Each ship gets a fixed attempt budget; a ship that cannot be placed within it is
//! skipped rather than failing the whole fleet, and so is every remaining ship of the
//! same variant. Callers must count ships from the returned fleet.

use log::{debug, trace, warn};
use rand::Rng;

use crate::{
    board::{BoardDimensions, CannotPlaceReason, Coordinate},
    config::{ConfigError, GameConfig, ShipCounts},
    rng::DeterministicRng,
    ships::{Orientation, Quadrant, Ship, ShipId, ShipVariant},
};

/// Attempts made for each ship before it is skipped.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 200;

/// Minimum Chebyshev distance between cells of different ships in one fleet. A value of
/// 2 keeps ships from touching, including diagonally.
pub const MIN_DISTANCE: usize = 2;

/// Probability that a candidate anchor is drawn from the variant's preferred quadrants,
/// once the fleet is non-empty.
pub const DEFAULT_BIAS_PROBABILITY: f64 = 0.7;

/// Tuning for [`ShipPlacer`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlacementConfig {
    pub max_attempts: usize,
    pub min_distance: usize,
    pub bias_probability: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
            min_distance: MIN_DISTANCE,
            bias_probability: DEFAULT_BIAS_PROBABILITY,
        }
    }
}

/// The board and ship counts to generate a fleet for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PlacementRequest {
    pub dimensions: BoardDimensions,
    pub ship_counts: ShipCounts,
}

impl PlacementRequest {
    pub fn new(dimensions: BoardDimensions, ship_counts: ShipCounts) -> Self {
        Self {
            dimensions,
            ship_counts,
        }
    }

    /// Build a request from a match config.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.dimensions()?, config.ship_counts))
    }
}

/// Result of generating a fleet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FleetPlacement {
    /// Ships that were placed, with IDs assigned in placement order starting at 0.
    pub ships: Vec<Ship>,
    /// Requested ships that could not be placed, per variant.
    pub skipped: ShipCounts,
}

/// Check whether `ship` may join `fleet` on a board of `dim`.
pub fn check_placement(
    dim: &BoardDimensions,
    fleet: &[Ship],
    ship: &Ship,
    min_distance: usize,
) -> Result<(), CannotPlaceReason> {
    if !ship.fits(dim) {
        Err(CannotPlaceReason::OutOfBounds)
    } else if fleet.iter().any(|other| other.id == ship.id) {
        Err(CannotPlaceReason::DuplicateId)
    } else if fleet
        .iter()
        .any(|other| other.distance_to(ship) < min_distance)
    {
        Err(CannotPlaceReason::TooClose)
    } else {
        Ok(())
    }
}

/// Generate a fleet with the default [`PlacementConfig`].
pub fn generate_ships(rng: &mut DeterministicRng, request: &PlacementRequest) -> Vec<Ship> {
    ShipPlacer::default().place_fleet(rng, request).ships
}

/// Random fleet generator.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ShipPlacer {
    config: PlacementConfig,
}

impl ShipPlacer {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Place every requested ship that fits. Output depends only on the request, the
    /// config and the state of `rng`.
    pub fn place_fleet(
        &self,
        rng: &mut DeterministicRng,
        request: &PlacementRequest,
    ) -> FleetPlacement {
        let dim = &request.dimensions;
        let capacity = request.ship_counts.total().min(dim.total_size());
        let mut ships: Vec<Ship> = Vec::with_capacity(capacity);
        let mut skipped = ShipCounts {
            small: 0,
            medium: 0,
            large: 0,
            xlarge: 0,
        };
        for (variant, count) in request.ship_counts.iter() {
            for placed in 0..count {
                let id = ships.len();
                match self.place_ship(rng, dim, &ships, id, variant) {
                    Some(ship) => {
                        debug!(
                            "placed {:?} ship {} at {:?} {:?}",
                            variant, id, ship.anchor, ship.orientation
                        );
                        ships.push(ship);
                    }
                    None => {
                        // The board only gets more crowded, so later ships of this
                        // variant are skipped without drawing.
                        let remaining = count - placed;
                        warn!(
                            "skipping {} {:?} ship(s): no valid placement on {}x{} board \
                             after {} attempts",
                            remaining,
                            variant,
                            dim.width(),
                            dim.height(),
                            self.config.max_attempts
                        );
                        skipped.set(variant, remaining);
                        break;
                    }
                }
            }
        }
        FleetPlacement { ships, skipped }
    }

    /// Try up to `max_attempts` candidates for one ship.
    fn place_ship(
        &self,
        rng: &mut DeterministicRng,
        dim: &BoardDimensions,
        fleet: &[Ship],
        id: ShipId,
        variant: ShipVariant,
    ) -> Option<Ship> {
        for attempt in 0..self.config.max_attempts {
            let orientation: Orientation = rng.gen();
            let bias = !fleet.is_empty();
            let anchor = match self.pick_anchor(rng, dim, bias, variant, orientation) {
                Some(anchor) => anchor,
                None => continue,
            };
            let ship = Ship::new(id, anchor, variant, orientation);
            match check_placement(dim, fleet, &ship, self.config.min_distance) {
                Ok(()) => return Some(ship),
                Err(reason) => trace!("attempt {} for ship {} rejected: {}", attempt, id, reason),
            }
        }
        None
    }

    /// Choose an anchor such that the ship fits on the board in `orientation`, biased
    /// toward the variant's preferred quadrants when `bias` is set. Returns `None` if the
    /// ship is longer than the board in that orientation.
    fn pick_anchor(
        &self,
        rng: &mut DeterministicRng,
        dim: &BoardDimensions,
        bias: bool,
        variant: ShipVariant,
        orientation: Orientation,
    ) -> Option<Coordinate> {
        let len = variant.size();
        let (max_x, max_y) = match orientation {
            Orientation::Horizontal => (dim.width().checked_sub(len)?, dim.height() - 1),
            Orientation::Vertical => (dim.width() - 1, dim.height().checked_sub(len)?),
        };
        let mut x_range = (0, max_x);
        let mut y_range = (0, max_y);

        if bias && rng.next() < self.config.bias_probability {
            let preferred = variant.preferred_quadrants();
            let quadrants: Vec<Quadrant> = Quadrant::ALL
                .iter()
                .copied()
                .filter(|q| preferred.contains(*q))
                .collect();
            if let Ok(quadrant) = rng.next_choice(&quadrants) {
                let ((qx0, qx1), (qy0, qy1)) = quadrant.bounds(dim);
                x_range = clip(x_range, (qx0, qx1));
                y_range = clip(y_range, (qy0, qy1));
            }
        }

        let x = rng.next_int(x_range.0 as i64, x_range.1 as i64) as usize;
        let y = rng.next_int(y_range.0 as i64, y_range.1 as i64) as usize;
        Some(Coordinate::new(x, y))
    }
}

/// Narrow the inclusive `range` to the half-open `region`, keeping `range` unchanged if
/// they do not overlap.
fn clip(range: (usize, usize), region: (usize, usize)) -> (usize, usize) {
    let lo = range.0.max(region.0);
    match region.1.checked_sub(1) {
        Some(hi) if lo <= hi.min(range.1) => (lo, hi.min(range.1)),
        _ => range,
    }
}
