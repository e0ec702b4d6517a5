/*
 * jieqi, a Jieqi (revealed chess) rules engine and expectimax search
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>.
 */

//! The `jieqi` command-line front end (`spec.md` §6). Subcommands:
//!
//! - `strategies --json`: list the names in the strategy registry.
//! - `battle`: play a configured number of games between two named
//!   strategies and write a report directory.
//! - `eval`: report the static evaluation of a JFN position.
//! - `moves`: list the legal moves of a JFN position.
//! - `apply`: apply one move to a JFN position and print the result.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::json;

use jieqi_core::battle::{self, Outcome};
use jieqi_core::board::{Board, Move};
use jieqi_core::config::{BattleConfig, EngineConfig};
use jieqi_core::defs::Colour;
use jieqi_core::jfn;
use jieqi_core::movegen;
use jieqi_core::search;
use jieqi_core::strategy;

#[derive(Parser)]
#[command(name = "jieqi", about = "A Jieqi rules engine and expectimax search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the strategy registry's names.
    Strategies {
        #[arg(long)]
        json: bool,
    },
    /// Play games between two named strategies.
    Battle {
        #[arg(long)]
        red: String,
        #[arg(long)]
        black: String,
        /// Seconds of search budget per ply.
        #[arg(long, default_value_t = 0.2)]
        time: f64,
        #[arg(long = "max-moves", default_value_t = 200)]
        max_moves: u32,
        /// How many ranked root moves each search reports (`spec.md` §4.7's
        /// `N`).
        #[arg(long, default_value_t = search::DEFAULT_TOP_N)]
        candidates: usize,
        #[arg(long, default_value_t = 1)]
        games: usize,
        #[arg(long, default_value_t = 1)]
        workers: usize,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long = "out", default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the static evaluation of a JFN position.
    Eval { jfn: String },
    /// List the legal moves of a JFN position.
    Moves { jfn: String },
    /// Apply one move to a JFN position and print the resulting JFN.
    Apply { jfn: String, mv: String },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Strategies { json } => strategies(json),
        Command::Battle { red, black, time, max_moves, candidates, games, workers, category, seed, out_dir } => {
            run_battle(
                &red,
                &black,
                time,
                max_moves,
                candidates,
                games,
                workers,
                category.as_deref(),
                seed,
                &out_dir,
            )
        }
        Command::Eval { jfn } => eval(&jfn),
        Command::Moves { jfn } => moves(&jfn),
        Command::Apply { jfn, mv } => apply(&jfn, &mv),
    }
}

fn strategies(as_json: bool) -> Result<(), String> {
    let mut names = strategy::names();
    names.sort_unstable();
    if as_json {
        println!("{}", json!({ "strategies": names }));
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_battle(
    red: &str,
    black: &str,
    time_secs: f64,
    max_moves: u32,
    candidates: usize,
    games: usize,
    workers: usize,
    category: Option<&str>,
    seed: u64,
    out_dir: &std::path::Path,
) -> Result<(), String> {
    if strategy::build(red).is_none() {
        return Err(format!("unknown strategy: {red}"));
    }
    if strategy::build(black).is_none() {
        return Err(format!("unknown strategy: {black}"));
    }
    if time_secs <= 0.0 {
        return Err("--time must be positive".to_owned());
    }

    let engine_config = EngineConfig {
        time_limit: Duration::from_secs_f64(time_secs),
        candidate_count: candidates,
        ..EngineConfig::default()
    };
    let mut battle_config = BattleConfig::new(red, black);
    battle_config.max_moves = max_moves;

    let reports = battle::run_many(
        games,
        workers,
        move |game_id| {
            let mut rng = oorandom::Rand64::new(seed.wrapping_add(game_id as u64).into());
            Board::new_random_initial(&mut rng)
        },
        move || strategy::build(red).expect("checked above").with_top_n(candidates),
        move || strategy::build(black).expect("checked above").with_top_n(candidates),
        engine_config,
        battle_config,
    );

    let run_id = format!(
        "{}-vs-{}-{}",
        red,
        black,
        SystemTime::now().duration_since(UNIX_EPOCH).map_err(|e| e.to_string())?.as_secs()
    );
    let dir = out_dir.join(&run_id);
    fs::create_dir_all(&dir).map_err(|e| e.to_string())?;

    let (mut red_wins, mut black_wins, mut draws) = (0_u32, 0_u32, 0_u32);
    let summaries: Vec<_> = reports
        .iter()
        .enumerate()
        .map(|(i, report)| {
            let winner = match report.outcome {
                Outcome::Winner(Colour::Red) => {
                    red_wins += 1;
                    "red"
                }
                Outcome::Winner(Colour::Black) => {
                    black_wins += 1;
                    "black"
                }
                Outcome::Draw => {
                    draws += 1;
                    "draw"
                }
            };
            json!({ "game": i, "result": winner, "plies": report.plies.len() })
        })
        .collect();

    let results = json!({
        "run_id": run_id,
        "config": {
            "red": red, "black": black, "time_per_ply_s": time_secs,
            "max_moves": max_moves, "games": games, "workers": workers,
            "category": category, "seed": seed,
        },
        "totals": { "red_wins": red_wins, "black_wins": black_wins, "draws": draws },
        "games": summaries,
    });
    fs::write(dir.join("results.json"), serde_json::to_string_pretty(&results).map_err(|e| e.to_string())?)
        .map_err(|e| e.to_string())?;
    info!("wrote {} games to {}", games, dir.display());
    println!("{}", dir.display());
    Ok(())
}

fn eval(jfn_str: &str) -> Result<(), String> {
    let parsed = jfn::parse(jfn_str).map_err(|e| e.to_string())?;
    let searcher = strategy::build("it2").expect("it2 is always registered");
    let score = searcher.evaluate(&parsed.board, parsed.turn);
    println!("{}", json!({ "score": score }));
    Ok(())
}

fn moves(jfn_str: &str) -> Result<(), String> {
    let parsed = jfn::parse(jfn_str).map_err(|e| e.to_string())?;
    let legal = movegen::legal_moves(&parsed.board, parsed.turn);
    let move_strings: Vec<String> = legal.iter().map(ToString::to_string).collect();
    println!("{}", json!({ "moves": move_strings }));
    Ok(())
}

fn apply(jfn_str: &str, mv_str: &str) -> Result<(), String> {
    let parsed = jfn::parse(jfn_str).map_err(|e| e.to_string())?;
    let mut mv = Move::parse(mv_str).map_err(|e| e.to_string())?;
    if mv.reveal && mv.revealed_kind.is_none() {
        let true_kind = parsed.board.at(mv.from).map(|p| p.true_kind);
        mv.revealed_kind = true_kind;
    }
    let mut board = parsed.board;
    let captured = board.apply(mv).map_err(|e| e.to_string())?;
    board.set_turn(parsed.turn.flip());
    let new_fen = jfn::generate(&board, board.turn(), parsed.viewer);
    let captured_info = captured.map(|p| {
        json!({ "kind": p.true_kind.to_string(), "colour": p.colour.to_string(), "was_hidden": p.is_hidden() })
    });
    println!("{}", json!({ "fen": new_fen, "captured": captured_info }));
    Ok(())
}
