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
//! Hunt-and-target opponent.
use std::collections::VecDeque;

use crate::{
    board::Coordinate,
    game::{Battle, ShotOutcome, Side},
    rng::DeterministicRng,
};

/// Computer opponent. While hunting it fires at random untried cells; after a hit that
/// leaves the ship afloat it probes the untried orthogonal neighbors of its hits until
/// the ship is destroyed.
#[derive(Debug, Default, Clone)]
pub struct TargetingAi {
    /// Cells queued for probing around known hits.
    targets: VecDeque<Coordinate>,
}

impl TargetingAi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the AI is following up on a hit.
    pub fn is_targeting(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Pick the next cell to fire at on `target`'s board. Returns `None` only if every
    /// cell has been shot.
    pub fn choose_target(
        &mut self,
        battle: &Battle,
        target: Side,
        rng: &mut DeterministicRng,
    ) -> Option<Coordinate> {
        while let Some(coord) = self.targets.pop_front() {
            if battle.is_untried(target, &coord) {
                return Some(coord);
            }
        }
        let untried = battle.untried_cells(target);
        rng.next_choice(&untried).ok().copied()
    }

    /// Update the AI with the outcome of a shot it fired at `coord`.
    pub fn record_outcome(
        &mut self,
        battle: &Battle,
        target: Side,
        coord: Coordinate,
        outcome: &ShotOutcome,
    ) {
        match outcome {
            ShotOutcome::Miss => {}
            ShotOutcome::Hit(_) => {
                for neighbor in battle.dimensions().neighbors(coord) {
                    if battle.is_untried(target, &neighbor) && !self.targets.contains(&neighbor) {
                        self.targets.push_back(neighbor);
                    }
                }
            }
            // Ships never touch, so nothing queued around a destroyed ship can hit.
            ShotOutcome::Destroyed(_) | ShotOutcome::Victory(_) => self.targets.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        board::BoardDimensions,
        ships::{Orientation, Ship, ShipVariant},
    };

    fn battle() -> Battle {
        Battle::with_fleets(
            BoardDimensions::new(6, 6),
            vec![Ship::new(0, Coordinate::new(0, 0), ShipVariant::Small, Orientation::Horizontal)],
            vec![Ship::new(0, Coordinate::new(2, 2), ShipVariant::Medium, Orientation::Vertical)],
        )
        .unwrap()
    }

    #[test]
    fn hunting_picks_untried_cells() {
        let mut battle = battle();
        let mut ai = TargetingAi::new();
        let mut rng = DeterministicRng::new(8);
        for _ in 0..10 {
            let coord = ai.choose_target(&battle, Side::Enemy, &mut rng).unwrap();
            assert!(battle.is_untried(Side::Enemy, &coord));
            let outcome = battle.fire_shot(Side::Player, coord).unwrap();
            if outcome.hit() {
                break;
            }
            ai.record_outcome(&battle, Side::Enemy, coord, &outcome);
        }
    }

    #[test]
    fn hit_switches_to_neighbors_until_destroyed() {
        let mut battle = battle();
        let mut ai = TargetingAi::new();
        let mut rng = DeterministicRng::new(1);

        let first = Coordinate::new(2, 3);
        let outcome = battle.fire_shot(Side::Player, first).unwrap();
        assert_eq!(outcome, ShotOutcome::Hit(0));
        ai.record_outcome(&battle, Side::Enemy, first, &outcome);
        assert!(ai.is_targeting());

        let mut shots = 0;
        loop {
            let coord = ai.choose_target(&battle, Side::Enemy, &mut rng).unwrap();
            assert!(coord.chebyshev(&first) <= 2);
            let outcome = battle.fire_shot(Side::Player, coord).unwrap();
            ai.record_outcome(&battle, Side::Enemy, coord, &outcome);
            shots += 1;
            if outcome.destroyed() {
                break;
            }
            assert!(shots < 12, "target mode failed to finish the ship");
        }
        assert!(!ai.is_targeting());
        assert!(battle.is_game_over());
    }

    #[test]
    fn exhausted_board_yields_none() {
        let mut battle = Battle::with_fleets(
            BoardDimensions::new(2, 1),
            vec![Ship::new(0, Coordinate::new(0, 0), ShipVariant::Small, Orientation::Horizontal)],
            vec![Ship::new(0, Coordinate::new(0, 0), ShipVariant::Small, Orientation::Horizontal)],
        )
        .unwrap();
        let mut ai = TargetingAi::new();
        let mut rng = DeterministicRng::new(4);
        battle.fire_shot(Side::Enemy, Coordinate::new(0, 0)).unwrap();
        battle.fire_shot(Side::Enemy, Coordinate::new(1, 0)).unwrap();
        assert_eq!(ai.choose_target(&battle, Side::Player, &mut rng), None);
    }

    #[test]
    fn queued_cells_shot_elsewhere_are_skipped() {
        let mut battle = battle();
        let mut ai = TargetingAi::new();
        let mut rng = DeterministicRng::new(6);
        let hit = Coordinate::new(2, 2);
        ai.record_outcome(&battle, Side::Enemy, hit, &ShotOutcome::Hit(0));
        // Up and down are queued first; shoot them without telling the AI.
        battle.fire_shot(Side::Player, Coordinate::new(2, 1)).unwrap();
        battle.fire_shot(Side::Player, Coordinate::new(2, 3)).unwrap();
        let next = ai.choose_target(&battle, Side::Enemy, &mut rng).unwrap();
        assert_eq!(next, Coordinate::new(1, 2));
        assert!(battle.is_untried(Side::Enemy, &next));
        assert_eq!(rng.draws(), 0);
    }
}
