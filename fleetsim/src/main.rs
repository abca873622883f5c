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
use std::{fmt, fs, process};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use navalbattle::{
    game::{Battle, BattleResult, Instruction, Side, SimulationError, Simulator},
    ships::ShipVariant,
    GameConfig, InitialTurn,
};

type BoxError = Box<dyn std::error::Error>;

/// Shots allowed in an automatic battle unless overridden.
const DEFAULT_MAX_SHOTS: &str = "10000";

fn main() {
    let seed_arg = Arg::with_name("seed")
        .short("s")
        .long("seed")
        .value_name("SEED")
        .help("seed for fleet placement and AI choices")
        .takes_value(true)
        .default_value("1");
    let config_arg = Arg::with_name("config")
        .short("c")
        .long("config")
        .value_name("FILE")
        .help("JSON game config (boardWidth, boardHeight, shipCounts, initialTurn)")
        .takes_value(true);
    let first_arg = Arg::with_name("first")
        .short("f")
        .long("first")
        .value_name("SIDE")
        .help("which side fires first, overriding the config")
        .takes_value(true)
        .possible_values(&["player", "enemy", "random"])
        .case_insensitive(true);
    let json_arg = Arg::with_name("json")
        .long("json")
        .help("print the battle result as JSON instead of boards");

    let matches = App::new("fleetsim")
        .version("0.1")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Runs deterministic naval battles without a user interface.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("raise log verbosity; repeat for more"),
        )
        .subcommand(
            SubCommand::with_name("auto")
                .about("let two computer players fight")
                .arg(seed_arg.clone())
                .arg(config_arg.clone())
                .arg(first_arg.clone())
                .arg(json_arg.clone())
                .arg(
                    Arg::with_name("max_shots")
                        .long("max-shots")
                        .value_name("N")
                        .help("stop after this many shots")
                        .takes_value(true)
                        .default_value(DEFAULT_MAX_SHOTS),
                ),
        )
        .subcommand(
            SubCommand::with_name("replay")
                .about("play a script of shots against generated fleets")
                .arg(
                    Arg::with_name("script")
                        .value_name("SCRIPT")
                        .help("file with one `fire <x>,<y>` per line")
                        .required(true),
                )
                .arg(seed_arg)
                .arg(config_arg)
                .arg(first_arg)
                .arg(json_arg),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let outcome = match matches.subcommand() {
        ("auto", Some(sub)) => run_auto(sub),
        ("replay", Some(sub)) => run_replay(sub),
        _ => unreachable!(),
    };
    if let Err(err) = outcome {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

/// Install the logger. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Load the config file if given and apply the `--first` override.
fn load_config(matches: &ArgMatches) -> Result<GameConfig, BoxError> {
    let mut config = match matches.value_of("config") {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };
    if let Some(first) = matches.value_of("first") {
        config.initial_turn = match first.to_ascii_lowercase().as_str() {
            "player" => InitialTurn::Player,
            "enemy" => InitialTurn::Enemy,
            "random" => InitialTurn::Random,
            _ => unreachable!(),
        };
    }
    config.validate()?;
    Ok(config)
}

/// Build a simulator from the common arguments.
fn simulator(matches: &ArgMatches) -> Result<Simulator, BoxError> {
    let config = load_config(matches)?;
    let seed: u64 = matches.value_of("seed").unwrap_or("1").parse()?;
    info!(
        "generating {}x{} battle with seed {}",
        config.board_width, config.board_height, seed
    );
    let sim = Simulator::from_game_config(&config, seed)?;
    for side in Side::BOTH.iter().copied() {
        let placed = sim.battle().fleet(side).len();
        if placed < config.ship_counts.total() {
            eprintln!(
                "note: only {} of {} {} ships fit on the board",
                placed,
                config.ship_counts.total(),
                SideName(side)
            );
        }
    }
    Ok(sim)
}

fn run_auto(matches: &ArgMatches) -> Result<(), BoxError> {
    let mut sim = simulator(matches)?;
    let max_shots: usize = matches.value_of("max_shots").unwrap_or(DEFAULT_MAX_SHOTS).parse()?;
    let result = sim.run_seeded(max_shots);
    report(matches, sim.battle(), &result)
}

fn run_replay(matches: &ArgMatches) -> Result<(), BoxError> {
    let mut sim = simulator(matches)?;
    // Required by clap.
    let path = matches.value_of("script").unwrap_or_default();
    let instructions = parse_script(&fs::read_to_string(path)?)?;
    let result = match sim.execute_instructions(instructions) {
        Ok(result) => result,
        Err(SimulationError::Rejected { index, source }) => {
            eprintln!("instruction {} rejected: {}", index + 1, source);
            sim.result()
        }
        Err(err) => return Err(err.into()),
    };
    report(matches, sim.battle(), &result)
}

/// Print the result, either as JSON or as boards and a summary.
fn report(matches: &ArgMatches, battle: &Battle, result: &BattleResult) -> Result<(), BoxError> {
    if matches.is_present("json") {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    for side in Side::BOTH.iter().copied() {
        println!("{} board:", SideName(side));
        show_revealed_board(battle, side);
        println!();
    }
    match result.winner {
        Some(side) => println!("{} wins after {} shots", SideName(side), result.total_turns),
        None => println!("no winner after {} shots", result.total_turns),
    }
    println!(
        "player: {} shots, {} hits; enemy: {} shots, {} hits",
        result.player_shots, result.player_hits, result.enemy_shots, result.enemy_hits
    );
    Ok(())
}

/// Error for a script line that is not a recognized instruction.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("line {line}: expected `fire <x>,<y>`, got \"{text}\"")]
struct ScriptError {
    line: usize,
    text: String,
}

/// Parse a shot script. Blank lines and lines starting with `#` are skipped.
fn parse_script(text: &str) -> Result<Vec<Instruction>, ScriptError> {
    static FIRE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?x)^(?:fire|shoot)\s+
        (?:(?:at|on)\s+)?
        (?P<x>[0-9]+)(?:\s*,\s*|\s+)(?P<y>[0-9]+)$",
        )
        .unwrap()
    });

    let mut instructions = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim().to_ascii_lowercase();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let error = || ScriptError {
            line: i + 1,
            text: raw.trim().to_string(),
        };
        let captures = FIRE.captures(&line).ok_or_else(error)?;
        let x = captures["x"].parse().map_err(|_| error())?;
        let y = captures["y"].parse().map_err(|_| error())?;
        instructions.push(Instruction::fire(x, y));
    }
    Ok(instructions)
}

/// Print out the fully-revealed board for the given side.
fn show_revealed_board(battle: &Battle, side: Side) {
    enum RevealedCell {
        Empty,
        Shot,
        NotShot(ShipAbbreviation),
        Hit(ShipAbbreviation),
        Sunk(ShipAbbreviation),
    }
    impl fmt::Display for RevealedCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                RevealedCell::Empty => f.pad("~~"),
                RevealedCell::Shot => f.pad("x"),
                RevealedCell::NotShot(ship) => fmt::Display::fmt(ship, f),
                RevealedCell::Hit(ship) => f.pad(&format!("x{}", ship.abbrev())),
                RevealedCell::Sunk(ship) => f.pad(&format!("X{}", ship.abbrev())),
            }
        }
    }
    let dim = *battle.dimensions();
    show_board(
        dim.width(),
        dim.iter_coordinates().map(|row| {
            row.map(|coord| {
                let cell = battle.cell(side, &coord).unwrap_or_default();
                let ship = cell.ship.and_then(|id| battle.ship(side, id));
                match ship {
                    None if cell.hit => RevealedCell::Shot,
                    None => RevealedCell::Empty,
                    Some(ship) if battle.is_ship_destroyed(side, ship.id) => {
                        RevealedCell::Sunk(ShipAbbreviation(ship.variant))
                    }
                    Some(ship) if cell.hit => RevealedCell::Hit(ShipAbbreviation(ship.variant)),
                    Some(ship) => RevealedCell::NotShot(ShipAbbreviation(ship.variant)),
                }
            })
        }),
    )
}

/// Show the board by printing the grid. Takes an iterator over the rows of iterators over
/// the items
fn show_board(width: usize, rows: impl Iterator<Item = impl Iterator<Item = impl fmt::Display>>) {
    print!("   ");
    for i in 0..width {
        print!("{:^4}", i);
    }
    println!();
    for (i, row) in rows.enumerate() {
        print!("{:>2} ", i);
        for cell in row {
            print!("{:^4}", cell);
        }
        println!();
    }
}

/// Display helper that prints a side's name.
struct SideName(Side);

impl fmt::Display for SideName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self.0 {
            Side::Player => "player",
            Side::Enemy => "enemy",
        })
    }
}

/// Display helper that prints the ship's variant abbreviation.
struct ShipAbbreviation(ShipVariant);

impl ShipAbbreviation {
    fn abbrev(&self) -> &'static str {
        match self.0 {
            ShipVariant::Small => "sm",
            ShipVariant::Medium => "md",
            ShipVariant::Large => "lg",
            ShipVariant::Xlarge => "xl",
        }
    }
}

impl fmt::Display for ShipAbbreviation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.abbrev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_accepts_common_forms() {
        let script = "
            # opening salvo
            fire 1,1
            FIRE 2 3
            shoot at 4, 5

            fire on 0 0
        ";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                Instruction::fire(1, 1),
                Instruction::fire(2, 3),
                Instruction::fire(4, 5),
                Instruction::fire(0, 0),
            ]
        );
    }

    #[test]
    fn script_reports_bad_line() {
        let err = parse_script("fire 1,1\nlaunch 2,2\n").unwrap_err();
        assert_eq!(
            err,
            ScriptError {
                line: 2,
                text: "launch 2,2".to_string()
            }
        );
    }

    #[test]
    fn script_error_names_line_and_text() {
        let err = parse_script("# warmup\n\nfire x,1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 3: expected `fire <x>,<y>`, got \"fire x,1\""
        );
    }

    #[test]
    fn script_rejects_overflowing_numbers() {
        let err = parse_script("fire 99999999999999999999999,1").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn abbreviations_are_two_characters() {
        for variant in ShipVariant::ALL {
            assert_eq!(ShipAbbreviation(*variant).abbrev().len(), 2);
        }
    }
}
