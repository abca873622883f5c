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
//! Battle rules: the two-sided state machine, the enemy AI and the headless simulator.
//!
//! [`Battle`] owns both fleets and the shots fired at them and resolves one shot at a
//! time. It never advances the turn on its own; callers apply the turn rule with
//! [`Battle::advance_turn`] (or use [`Battle::play_turn`] to do both) so that each front
//! end can pace turn changes as it likes.
//!
//! [`Simulator`] drives a [`Battle`] from a scripted instruction list or from two seeded
//! [`TargetingAi`] players and reports a [`BattleResult`].

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};
use serde::{Deserialize, Serialize};

pub use self::{
    ai::TargetingAi,
    battle::{turn_advance, Battle, Phase, Shot, ShotOutcome, TurnAdvance},
    observer::BattleObserver,
    simulator::{
        BattleResult, FleetSnapshot, Instruction, SimulationError, Simulator, SimulatorConfig,
        ShotRecord, SHOT_INTERVAL_MS,
    },
};

mod ai;
mod battle;
mod observer;
mod simulator;

/// One of the two participants in a match.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

/// The side whose turn it is. Turns and sides share one type.
pub type Turn = Side;

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Enemy];

    /// Get the opponent of this side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Position of this side in per-side arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl Distribution<Side> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Side {
        if rng.gen() {
            Side::Player
        } else {
            Side::Enemy
        }
    }
}
