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
//! Configuration consumed when setting up a match.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::BoardDimensions,
    game::Side,
    rng::DeterministicRng,
    ships::ShipVariant,
};

/// Error returned for a configuration that cannot produce a playable match.
#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum ConfigError {
    /// The board has no cells, or too many to address.
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Every ship count is zero.
    #[error("at least one ship must be requested")]
    NoShips,
    /// Cell spacing for world mapping must be positive and finite.
    #[error("cell spacing must be positive and finite, got {0}")]
    InvalidCellSpacing(f64),
    /// The requested ships cover more cells than the board has.
    #[error("requested ships need {cells} cells but the board has {capacity}")]
    TooManyShips { cells: usize, capacity: usize },
}

/// Number of ships requested per variant. Variants missing from serialized input count
/// as zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ShipCounts {
    #[serde(default)]
    pub small: usize,
    #[serde(default)]
    pub medium: usize,
    #[serde(default)]
    pub large: usize,
    #[serde(default)]
    pub xlarge: usize,
}

impl ShipCounts {
    /// Count requested for `variant`.
    pub fn get(&self, variant: ShipVariant) -> usize {
        match variant {
            ShipVariant::Small => self.small,
            ShipVariant::Medium => self.medium,
            ShipVariant::Large => self.large,
            ShipVariant::Xlarge => self.xlarge,
        }
    }

    /// Set the count requested for `variant`.
    pub fn set(&mut self, variant: ShipVariant, count: usize) {
        match variant {
            ShipVariant::Small => self.small = count,
            ShipVariant::Medium => self.medium = count,
            ShipVariant::Large => self.large = count,
            ShipVariant::Xlarge => self.xlarge = count,
        }
    }

    /// Total number of ships requested, saturating at `usize::MAX`.
    pub fn total(&self) -> usize {
        self.iter()
            .fold(0usize, |total, (_, count)| total.saturating_add(count))
    }

    /// Number of board cells the requested ships occupy, saturating at `usize::MAX`.
    pub fn cells(&self) -> usize {
        self.iter().fold(0usize, |cells, (variant, count)| {
            cells.saturating_add(count.saturating_mul(variant.size()))
        })
    }

    /// Variants paired with their counts, smallest variant first.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (ShipVariant, usize)> {
        ShipVariant::ALL.iter().map(move |&v| (v, self.get(v)))
    }
}

impl Default for ShipCounts {
    /// The classic five-ship fleet: 2, 3, 3, 4 and 5 cells.
    fn default() -> Self {
        Self {
            small: 1,
            medium: 2,
            large: 1,
            xlarge: 1,
        }
    }
}

/// Which side takes the first turn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialTurn {
    Player,
    Enemy,
    /// Drawn from the match's random engine.
    Random,
}

impl InitialTurn {
    /// Resolve to a concrete side. Only `Random` consumes a draw.
    pub fn resolve(self, rng: &mut DeterministicRng) -> Side {
        match self {
            InitialTurn::Player => Side::Player,
            InitialTurn::Enemy => Side::Enemy,
            InitialTurn::Random => {
                if rng.next_boolean() {
                    Side::Player
                } else {
                    Side::Enemy
                }
            }
        }
    }
}

impl Default for InitialTurn {
    fn default() -> Self {
        InitialTurn::Player
    }
}

/// Setup parameters for a match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub ship_counts: ShipCounts,
    pub initial_turn: InitialTurn,
}

impl GameConfig {
    /// Board dimensions described by this config.
    pub fn dimensions(&self) -> Result<BoardDimensions, ConfigError> {
        BoardDimensions::try_new(self.board_width, self.board_height).ok_or(
            ConfigError::InvalidDimensions {
                width: self.board_width,
                height: self.board_height,
            },
        )
    }

    /// Check that the config can produce a playable match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dim = self.dimensions()?;
        if self.ship_counts.total() == 0 {
            return Err(ConfigError::NoShips);
        }
        let cells = self.ship_counts.cells();
        if cells > dim.total_size() {
            return Err(ConfigError::TooManyShips {
                cells,
                capacity: dim.total_size(),
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let dim = BoardDimensions::default();
        Self {
            board_width: dim.width(),
            board_height: dim.height(),
            ship_counts: ShipCounts::default(),
            initial_turn: InitialTurn::default(),
        }
    }
}
