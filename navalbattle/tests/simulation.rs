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
use navalbattle::{
    board::{BoardDimensions, Coordinate},
    game::{Instruction, Side, SimulationError, Simulator, SimulatorConfig},
    ships::{Orientation, Ship, ShipVariant},
    ConfigError, GameConfig, InitialTurn, ShipCounts,
};

fn quick_fixture() -> SimulatorConfig {
    SimulatorConfig::new(
        7,
        BoardDimensions::new(5, 5),
        vec![Ship::new(0, Coordinate::new(3, 3), ShipVariant::Small, Orientation::Horizontal)],
        vec![Ship::new(0, Coordinate::new(1, 1), ShipVariant::Small, Orientation::Vertical)],
    )
}

#[test]
fn quick_fixture_two_shot_win() {
    let mut sim = Simulator::new(quick_fixture()).unwrap();
    let result = sim
        .execute_instructions(vec![Instruction::fire(1, 1), Instruction::fire(1, 2)])
        .unwrap();

    assert_eq!(result.winner, Some(Side::Player));
    assert_eq!(result.total_turns, 2);
    assert_eq!(result.player_shots, 2);
    assert_eq!(result.player_hits, 2);
    assert_eq!(result.enemy_shots, 0);
    assert_eq!(result.enemy_hits, 0);
    assert_eq!(result.ship_placements.enemy, quick_fixture().enemy_ships);

    let first = &result.shot_history[0];
    assert_eq!(first.turn, Side::Player);
    assert!(first.hit);
    assert!(!first.ship_destroyed);
    let second = &result.shot_history[1];
    assert!(second.hit);
    assert!(second.ship_destroyed);
}

#[test]
fn instructions_alternate_on_misses() {
    let mut sim = Simulator::new(quick_fixture()).unwrap();
    let result = sim
        .execute_instructions(vec![
            Instruction::fire(4, 0),
            Instruction::fire(0, 0),
            Instruction::fire(1, 1),
            Instruction::fire(2, 2),
            Instruction::fire(3, 3),
            Instruction::fire(4, 3),
        ])
        .unwrap();

    let turns: Vec<_> = result.shot_history.iter().map(|r| r.turn).collect();
    assert_eq!(
        turns,
        vec![
            Side::Player, // miss
            Side::Enemy,  // miss
            Side::Player, // hit, keeps turn
            Side::Player, // miss
            Side::Enemy,  // hit, keeps turn
            Side::Enemy,  // destroys the player's only ship
        ]
    );
    assert_eq!(result.winner, Some(Side::Enemy));
    assert_eq!(result.enemy_hits, 2);
    assert_eq!(result.player_hits, 1);
}

#[test]
fn instructions_after_win_are_ignored() {
    let mut sim = Simulator::new(quick_fixture()).unwrap();
    let result = sim
        .execute_instructions(vec![
            Instruction::fire(1, 1),
            Instruction::fire(1, 2),
            Instruction::fire(0, 0),
            Instruction::fire(1, 1),
        ])
        .unwrap();
    assert_eq!(result.total_turns, 2);
    assert_eq!(result.winner, Some(Side::Player));
}

#[test]
fn scripted_runs_replay_identically() {
    let script = vec![
        Instruction::fire(0, 0),
        Instruction::fire(2, 2),
        Instruction::fire(1, 1),
        Instruction::fire(1, 2),
    ];
    let a = Simulator::new(quick_fixture())
        .unwrap()
        .execute_instructions(script.clone())
        .unwrap();
    let b = Simulator::new(quick_fixture())
        .unwrap()
        .execute_instructions(script)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn seeded_battles_are_reproducible() {
    let mut config = GameConfig::default();
    config.initial_turn = InitialTurn::Random;
    let run = |seed| {
        let mut sim = Simulator::from_game_config(&config, seed).unwrap();
        sim.run_seeded(usize::MAX)
    };
    for seed in [1u64, 2, 99, 0xdead_beef].iter().copied() {
        let a = run(seed);
        let b = run(seed);
        assert_eq!(a, b, "seed {} diverged", seed);
        assert!(a.winner.is_some());
        assert_eq!(a.total_turns, a.player_shots + a.enemy_shots);
        let fleet_cells: usize = a.ship_placements.enemy.iter().map(|s| s.size()).sum();
        if a.winner == Some(Side::Player) {
            assert_eq!(a.player_hits, fleet_cells);
        }
    }
}

#[test]
fn seeded_battle_on_cramped_board_still_finishes() {
    let config = GameConfig {
        board_width: 6,
        board_height: 6,
        ship_counts: ShipCounts {
            small: 4,
            medium: 3,
            large: 2,
            xlarge: 1,
        },
        initial_turn: InitialTurn::Enemy,
    };
    assert_eq!(config.validate(), Ok(()));
    let mut sim = Simulator::from_game_config(&config, 31).unwrap();
    let placed = sim.battle().fleet(Side::Player).len();
    assert!(placed > 0 && placed < config.ship_counts.total());
    let result = sim.run_seeded(usize::MAX);
    assert!(result.winner.is_some());
    assert_eq!(result.shot_history[0].turn, Side::Enemy);
}

#[test]
fn oversized_fleet_config_is_rejected() {
    let config: GameConfig =
        serde_json::from_str(r#"{"shipCounts": {"small": 1099511627776}}"#).unwrap();
    match Simulator::from_game_config(&config, 1) {
        Err(SimulationError::Config(ConfigError::TooManyShips { capacity, .. })) => {
            assert_eq!(capacity, 100)
        }
        other => panic!("unexpected {:?}", other.map(|_| ())),
    }
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let mut sim = Simulator::new(quick_fixture()).unwrap();
    let result = sim
        .execute_instructions(vec![Instruction::fire(1, 1), Instruction::fire(1, 2)])
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["winner"], "player");
    assert_eq!(json["totalTurns"], 2);
    assert_eq!(json["shotHistory"][1]["shipDestroyed"], true);
    assert_eq!(json["shipPlacements"]["enemy"][0]["variant"], "small");
    assert_eq!(json["shipPlacements"]["enemy"][0]["orientation"], "vertical");
}

#[test]
fn instructions_parse_from_json() {
    let json = r#"[
        {"type": "fire_shot", "data": {"position": {"x": 1, "y": 1}}},
        {"type": "fire_shot", "data": {"position": {"x": 1, "y": 2}}}
    ]"#;
    let instructions: Vec<Instruction> = serde_json::from_str(json).unwrap();
    assert_eq!(instructions, vec![Instruction::fire(1, 1), Instruction::fire(1, 2)]);
    let round = serde_json::to_string(&instructions[0]).unwrap();
    assert_eq!(round, r#"{"type":"fire_shot","data":{"position":{"x":1,"y":1}}}"#);
}

#[test]
fn game_config_parses_with_defaults() {
    let config: GameConfig = serde_json::from_str(
        r#"{"boardWidth": 8, "shipCounts": {"small": 3}, "initialTurn": "random"}"#,
    )
    .unwrap();
    assert_eq!(config.board_width, 8);
    assert_eq!(config.board_height, 10);
    assert_eq!(config.ship_counts.small, 3);
    assert_eq!(config.ship_counts.medium, 0);
    assert_eq!(config.initial_turn, InitialTurn::Random);
}
