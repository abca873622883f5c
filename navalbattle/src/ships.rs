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
//! Ships, their size classes and their footprint on the board.
use enumflags2::BitFlags;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};

use crate::board::{BoardDimensions, Coordinate};

pub use self::placement::{
    check_placement, generate_ships, FleetPlacement, PlacementConfig, PlacementRequest,
    ShipPlacer, DEFAULT_BIAS_PROBABILITY, MAX_PLACEMENT_ATTEMPTS, MIN_DISTANCE,
};

mod placement;

/// Identifier of a ship within its own fleet. Stable once the ship is placed and used to
/// correlate shots with ships.
pub type ShipId = usize;

/// Size class of a ship.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipVariant {
    /// Two cells.
    Small,
    /// Three cells.
    Medium,
    /// Four cells.
    Large,
    /// Five cells.
    Xlarge,
}

impl ShipVariant {
    /// All variants in placement order, smallest first.
    pub const ALL: &'static [ShipVariant] = &[
        ShipVariant::Small,
        ShipVariant::Medium,
        ShipVariant::Large,
        ShipVariant::Xlarge,
    ];

    /// Number of cells a ship of this variant occupies.
    pub fn size(self) -> usize {
        match self {
            ShipVariant::Small => 2,
            ShipVariant::Medium => 3,
            ShipVariant::Large => 4,
            ShipVariant::Xlarge => 5,
        }
    }

    /// Board quadrants this variant is steered toward during random placement, so that
    /// different sizes spread across the board.
    pub fn preferred_quadrants(self) -> BitFlags<Quadrant> {
        match self {
            ShipVariant::Small => Quadrant::NorthEast | Quadrant::SouthWest,
            ShipVariant::Medium => Quadrant::NorthWest | Quadrant::SouthEast,
            ShipVariant::Large => Quadrant::SouthWest | Quadrant::SouthEast,
            ShipVariant::Xlarge => Quadrant::NorthWest | Quadrant::NorthEast,
        }
    }
}

/// One quarter of the board. North is low `y`, west is low `x`.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum Quadrant {
    /// Low `x`, low `y`.
    NorthWest = 0b0001,
    /// High `x`, low `y`.
    NorthEast = 0b0010,
    /// Low `x`, high `y`.
    SouthWest = 0b0100,
    /// High `x`, high `y`.
    SouthEast = 0b1000,
}

impl Quadrant {
    /// Every quadrant, in declaration order.
    pub const ALL: &'static [Quadrant] = &[
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Half-open `x` and `y` ranges covered by this quadrant. For odd dimensions the
    /// middle row or column belongs to both halves.
    pub fn bounds(self, dim: &BoardDimensions) -> ((usize, usize), (usize, usize)) {
        let west = (0, (dim.width() + 1) / 2);
        let east = (dim.width() / 2, dim.width());
        let north = (0, (dim.height() + 1) / 2);
        let south = (dim.height() / 2, dim.height());
        match self {
            Quadrant::NorthWest => (west, north),
            Quadrant::NorthEast => (east, north),
            Quadrant::SouthWest => (west, south),
            Quadrant::SouthEast => (east, south),
        }
    }
}

/// Layout direction of a ship's cells.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Cells extend toward `+x`.
    Horizontal,
    /// Cells extend toward `+y`.
    Vertical,
}

impl Distribution<Orientation> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Orientation {
        if rng.gen() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }
}

/// A ship placed on a board. Never moves once placed; destruction is derived from the
/// shots fired at it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Ship {
    /// Identifier unique within the owning fleet.
    pub id: ShipId,
    /// First cell of the ship.
    pub anchor: Coordinate,
    pub variant: ShipVariant,
    pub orientation: Orientation,
}

impl Ship {
    pub fn new(
        id: ShipId,
        anchor: Coordinate,
        variant: ShipVariant,
        orientation: Orientation,
    ) -> Self {
        Self {
            id,
            anchor,
            variant,
            orientation,
        }
    }

    /// Number of cells this ship occupies.
    pub fn size(&self) -> usize {
        self.variant.size()
    }

    /// The cells covered by the ship, starting at the anchor. Cells past `usize::MAX` are
    /// never produced, so a ship that would overflow yields fewer than `size` cells and
    /// is rejected by bounds checks.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let Ship {
            anchor, orientation, ..
        } = *self;
        (0..self.size()).filter_map(move |i| match orientation {
            Orientation::Horizontal => {
                anchor.x.checked_add(i).map(|x| Coordinate::new(x, anchor.y))
            }
            Orientation::Vertical => {
                anchor.y.checked_add(i).map(|y| Coordinate::new(anchor.x, y))
            }
        })
    }

    /// Whether any cell of the ship lies on `coord`.
    pub fn occupies(&self, coord: &Coordinate) -> bool {
        self.cells().any(|cell| &cell == coord)
    }

    /// Whether every cell of the ship is on the board.
    pub fn fits(&self, dim: &BoardDimensions) -> bool {
        self.cells().count() == self.size() && self.cells().all(|cell| dim.contains(&cell))
    }

    /// Smallest Chebyshev distance between any cell of this ship and any cell of `other`.
    pub fn distance_to(&self, other: &Ship) -> usize {
        self.cells()
            .flat_map(|a| other.cells().map(move |b| a.chebyshev(&b)))
            .min()
            .unwrap_or(usize::MAX)
    }
}
