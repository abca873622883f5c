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
//! Deterministic core of a naval-battle game.
//!
//! The crate covers ship placement, shot resolution, the turn rule, win detection and a
//! headless simulator. It has no rendering, networking or storage; a front end feeds it
//! a [`GameConfig`] and shot requests and reads back fleets, shot logs and turn state.
//!
//! ```
//! use navalbattle::{
//!     board::{BoardDimensions, Coordinate},
//!     game::{Battle, ShotOutcome, Side},
//!     ships::{Orientation, Ship, ShipVariant},
//! };
//!
//! let mut battle = Battle::new(BoardDimensions::new(10, 10));
//! let ship = Ship::new(0, Coordinate::new(0, 0), ShipVariant::Small, Orientation::Horizontal);
//! battle.add_ship(Side::Player, ship).unwrap();
//! battle.add_ship(Side::Enemy, ship).unwrap();
//!
//! assert_eq!(battle.play_turn(Coordinate::new(0, 0)), Ok(ShotOutcome::Hit(0)));
//! assert_eq!(battle.current_turn(), Side::Player);
//! assert_eq!(battle.play_turn(Coordinate::new(1, 0)), Ok(ShotOutcome::Victory(0)));
//! assert_eq!(battle.winner(), Some(Side::Player));
//! ```

pub mod board;
pub mod config;
pub mod game;
pub mod rng;
pub mod ships;

pub use crate::{
    config::{ConfigError, GameConfig, InitialTurn, ShipCounts},
    rng::{DeterministicRng, InvalidArgument},
};
