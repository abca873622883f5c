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
//! Headless battle driver for fixtures, replays and mock data.
//!
//! Nothing here reads the clock. [`ShotRecord::timestamp`] is a logical offset derived
//! from the shot's position in the history and exists only for display and sorting.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    board::{BoardDimensions, Coordinate, PlaceError, ShotError},
    config::{ConfigError, GameConfig},
    game::{Battle, ShotOutcome, Side, TargetingAi},
    rng::DeterministicRng,
    ships::Ship,
};

/// Logical milliseconds between consecutive shots in a [`BattleResult`].
pub const SHOT_INTERVAL_MS: u64 = 500;

/// Error returned when a simulation cannot be set up or a scripted shot is refused.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid game config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid fleet: {0}")]
    Fleet(#[from] PlaceError),
    /// Instruction `index` (zero-based) was refused by the battle. Shots before it remain
    /// applied.
    #[error("instruction {index} rejected: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: ShotError,
    },
}

/// A scripted step. Serialized as `{"type": "fire_shot", "data": {"position": ...}}`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Instruction {
    /// Fire as the side whose turn it is.
    FireShot { position: Coordinate },
}

impl Instruction {
    pub fn fire(x: usize, y: usize) -> Self {
        Instruction::FireShot {
            position: Coordinate::new(x, y),
        }
    }
}

/// Explicit setup for a [`Simulator`], bypassing random placement.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SimulatorConfig {
    /// Seed for the AI players in [`Simulator::run_seeded`].
    pub seed: u64,
    pub dimensions: BoardDimensions,
    pub player_ships: Vec<Ship>,
    pub enemy_ships: Vec<Ship>,
    pub initial_turn: Side,
}

impl SimulatorConfig {
    /// Config with the player moving first.
    pub fn new(
        seed: u64,
        dimensions: BoardDimensions,
        player_ships: Vec<Ship>,
        enemy_ships: Vec<Ship>,
    ) -> Self {
        Self {
            seed,
            dimensions,
            player_ships,
            enemy_ships,
            initial_turn: Side::Player,
        }
    }
}

/// One resolved shot in a [`BattleResult`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotRecord {
    /// Side that fired.
    pub turn: Side,
    pub position: Coordinate,
    pub hit: bool,
    pub ship_destroyed: bool,
    /// Logical offset in milliseconds from the first shot.
    pub timestamp: u64,
}

/// The fleets a simulation started with.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FleetSnapshot {
    pub player: Vec<Ship>,
    pub enemy: Vec<Ship>,
}

/// Summary of a simulation run.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResult {
    pub winner: Option<Side>,
    /// Number of shots resolved.
    pub total_turns: usize,
    pub player_shots: usize,
    pub enemy_shots: usize,
    pub player_hits: usize,
    pub enemy_hits: usize,
    pub ship_placements: FleetSnapshot,
    pub shot_history: Vec<ShotRecord>,
}

/// Drives a [`Battle`] without any presentation layer.
#[derive(Debug)]
pub struct Simulator {
    battle: Battle,
    rng: DeterministicRng,
    ais: [TargetingAi; 2],
    history: Vec<ShotRecord>,
}

impl Simulator {
    /// Build a simulator over explicit fleets.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        let mut battle =
            Battle::with_fleets(config.dimensions, config.player_ships, config.enemy_ships)?;
        battle.set_turn(config.initial_turn);
        Ok(Self::from_battle(battle, DeterministicRng::new(config.seed)))
    }

    /// Build a simulator whose fleets and first turn are generated from `config`, with
    /// every random draw taken from `seed`.
    pub fn from_game_config(config: &GameConfig, seed: u64) -> Result<Self, SimulationError> {
        let mut rng = DeterministicRng::new(seed);
        let battle = Battle::from_config(config, &mut rng)?;
        Ok(Self::from_battle(battle, rng))
    }

    fn from_battle(battle: Battle, rng: DeterministicRng) -> Self {
        Self {
            battle,
            rng,
            ais: [TargetingAi::new(), TargetingAi::new()],
            history: Vec::new(),
        }
    }

    /// The battle being simulated.
    pub fn battle(&self) -> &Battle {
        &self.battle
    }

    /// Mutable access to the battle, for attaching an observer.
    pub fn battle_mut(&mut self) -> &mut Battle {
        &mut self.battle
    }

    /// Shots resolved so far.
    pub fn history(&self) -> &[ShotRecord] {
        &self.history
    }

    /// Play `instructions` in order, each as the side whose turn it is, applying the
    /// turn rule after every shot. Instructions after the game ends are ignored. A
    /// refused shot stops the run with [`SimulationError::Rejected`].
    pub fn execute_instructions<I>(
        &mut self,
        instructions: I,
    ) -> Result<BattleResult, SimulationError>
    where
        I: IntoIterator<Item = Instruction>,
    {
        let mut instructions = instructions.into_iter().enumerate();
        while let Some((index, instruction)) = instructions.next() {
            if self.battle.is_game_over() {
                let ignored = 1 + instructions.by_ref().count();
                debug!("game over, ignoring {} remaining instructions", ignored);
                break;
            }
            match instruction {
                Instruction::FireShot { position } => {
                    self.fire(position)
                        .map_err(|source| SimulationError::Rejected { index, source })?;
                }
            }
        }
        Ok(self.result())
    }

    /// Let two [`TargetingAi`] players fight for up to `max_shots` more shots or until
    /// the game ends. Deterministic for a given seed and starting state.
    pub fn run_seeded(&mut self, max_shots: usize) -> BattleResult {
        let mut fired = 0;
        while fired < max_shots && !self.battle.is_game_over() {
            let side = self.battle.current_turn();
            let target = side.opponent();
            let ai = &mut self.ais[side.index()];
            let coord = match ai.choose_target(&self.battle, target, &mut self.rng) {
                Some(coord) => coord,
                None => break,
            };
            match self.fire(coord) {
                Ok(outcome) => {
                    self.ais[side.index()].record_outcome(&self.battle, target, coord, &outcome);
                    fired += 1;
                }
                Err(err) => {
                    debug!("seeded run stopped: {}", err);
                    break;
                }
            }
        }
        self.result()
    }

    /// Summarize the simulation so far.
    pub fn result(&self) -> BattleResult {
        let count = |side: Side, hits_only: bool| {
            self.history
                .iter()
                .filter(|record| record.turn == side && (record.hit || !hits_only))
                .count()
        };
        BattleResult {
            winner: self.battle.winner(),
            total_turns: self.history.len(),
            player_shots: count(Side::Player, false),
            enemy_shots: count(Side::Enemy, false),
            player_hits: count(Side::Player, true),
            enemy_hits: count(Side::Enemy, true),
            ship_placements: FleetSnapshot {
                player: self.battle.fleet(Side::Player).to_vec(),
                enemy: self.battle.fleet(Side::Enemy).to_vec(),
            },
            shot_history: self.history.clone(),
        }
    }

    /// Fire as the current side, advance the turn and record the shot.
    fn fire(&mut self, position: Coordinate) -> Result<ShotOutcome, ShotError> {
        let side = self.battle.current_turn();
        let outcome = self.battle.play_turn(position)?;
        self.history.push(ShotRecord {
            turn: side,
            position,
            hit: outcome.hit(),
            ship_destroyed: outcome.destroyed(),
            timestamp: self.history.len() as u64 * SHOT_INTERVAL_MS,
        });
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        board::CannotShootReason,
        ships::{Orientation, ShipVariant},
    };

    fn quick() -> Simulator {
        Simulator::new(SimulatorConfig::new(
            1,
            BoardDimensions::new(5, 5),
            vec![Ship::new(0, Coordinate::new(3, 3), ShipVariant::Small, Orientation::Horizontal)],
            vec![Ship::new(0, Coordinate::new(1, 1), ShipVariant::Small, Orientation::Vertical)],
        ))
        .unwrap()
    }

    #[test]
    fn timestamps_are_logical() {
        let mut sim = quick();
        let result = sim
            .execute_instructions(vec![
                Instruction::fire(0, 0),
                Instruction::fire(4, 4),
                Instruction::fire(0, 4),
            ])
            .unwrap();
        let stamps: Vec<_> = result.shot_history.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![0, SHOT_INTERVAL_MS, 2 * SHOT_INTERVAL_MS]);
    }

    #[test]
    fn rejected_instruction_reports_index() {
        let mut sim = quick();
        let err = sim
            .execute_instructions(vec![Instruction::fire(1, 1), Instruction::fire(1, 1)])
            .unwrap_err();
        match err {
            SimulationError::Rejected { index, source } => {
                assert_eq!(index, 1);
                assert_eq!(source.reason(), CannotShootReason::AlreadyShot);
            }
            other => panic!("unexpected error {}", other),
        }
        assert_eq!(sim.history().len(), 1);
    }

    #[test]
    fn invalid_fleet_rejected() {
        let overlapping = vec![
            Ship::new(0, Coordinate::new(0, 0), ShipVariant::Small, Orientation::Horizontal),
            Ship::new(1, Coordinate::new(0, 0), ShipVariant::Small, Orientation::Vertical),
        ];
        let result = Simulator::new(SimulatorConfig::new(
            0,
            BoardDimensions::new(5, 5),
            overlapping.clone(),
            overlapping,
        ));
        assert!(matches!(result, Err(SimulationError::Fleet(_))));
    }

    #[test]
    fn seeded_run_respects_shot_cap() {
        let mut sim = Simulator::from_game_config(&GameConfig::default(), 5).unwrap();
        let result = sim.run_seeded(7);
        assert_eq!(result.total_turns, 7);
        assert_eq!(result.winner, None);
        let result = sim.run_seeded(usize::MAX);
        assert!(result.winner.is_some());
    }
}
