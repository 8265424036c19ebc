//! Renju engine command line
//!
//! `renju selfplay` lets the engine play both colors; `renju analyze` replays
//! a game and reports how the engine sees the resulting position.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use renju::rules::{forbidden_positions, forbidden_reason, is_forbidden};
use renju::{AIEngine, Board, EngineConfig, Pos, Stone};

#[derive(Parser, Debug)]
#[command(author, version, about = "Renju engine with forbidden-move rules and alpha-beta search", long_about = None)]
struct Args {
    /// Maximum search depth in plies
    #[arg(short, long, global = true)]
    depth: Option<u32>,

    /// Time budget per move in milliseconds
    #[arg(short, long, global = true)]
    time: Option<u64>,

    /// JSON engine configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Engine against itself from the empty board
    Selfplay {
        /// Stop after this many stones
        #[arg(long, default_value_t = renju::board::TOTAL_CELLS)]
        max_moves: usize,
    },
    /// Replay a game and report evaluation, forbidden points and the engine's choice
    Analyze {
        /// Moves in coordinate notation, e.g. "H8 J9 G7"
        #[arg(short, long)]
        moves: String,

        /// Number of statically best moves to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut engine = AIEngine::with_config(load_config(&args)?);

    match args.command {
        Command::Selfplay { max_moves } => selfplay(&mut engine, max_moves),
        Command::Analyze { moves, top } => analyze(&mut engine, &moves, top),
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config = config.with_depth(depth);
    }
    if let Some(ms) = args.time {
        config = config.with_time_limit(ms);
    }
    Ok(config)
}

fn selfplay(engine: &mut AIEngine, max_moves: usize) -> Result<()> {
    let mut board = Board::new();

    while !board.is_game_over() && board.stone_count() < max_moves {
        let color = board.current_player();
        let start = Instant::now();
        let result = engine.get_move_with_stats(&board, color);
        let Some(pos) = result.best_move else {
            info!("{color:?} has no legal move, stopping");
            break;
        };
        if !board.place_timed(pos, color, start.elapsed()) {
            bail!("engine chose unplayable move {pos}");
        }
        println!(
            "{:>3}. {:<5} {:<3} score {:>7} ({} ms)",
            board.stone_count(),
            stone_name(color),
            pos,
            result.score,
            result.time_ms
        );
    }

    println!("\n{board}");
    println!("{}", outcome(&board));
    Ok(())
}

fn analyze(engine: &mut AIEngine, moves: &str, top: usize) -> Result<()> {
    let mut board = Board::new();

    let coords = moves
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    for (ply, coord) in coords.enumerate() {
        let pos: Pos = coord
            .parse()
            .with_context(|| format!("move {}: bad coordinate {coord:?}", ply + 1))?;
        let color = board.current_player();
        if is_forbidden(&mut board, pos, color) {
            let reason = forbidden_reason(&mut board, pos, color);
            bail!("move {}: {coord} is forbidden for Black ({reason})", ply + 1);
        }
        if !board.place(pos, color) {
            bail!("move {}: {coord} cannot be played", ply + 1);
        }
    }

    println!("{board}");

    let to_move = board.current_player();
    let evaluator = engine.evaluator();
    println!(
        "Evaluation: Black {:+}, White {:+}",
        evaluator.evaluate(&board, Stone::Black),
        evaluator.evaluate(&board, Stone::White)
    );
    println!(
        "{} to move, win probability {:.1}%",
        stone_name(to_move),
        100.0 * evaluator.win_probability(&board, to_move)
    );

    if board.is_game_over() {
        println!("{}", outcome(&board));
        return Ok(());
    }

    let forbidden = forbidden_positions(&mut board, Stone::Black);
    if !forbidden.is_empty() {
        println!("Forbidden for Black:");
        for pos in forbidden {
            println!("  {pos}: {}", forbidden_reason(&mut board, pos, Stone::Black));
        }
    }

    println!("Top static moves for {}:", stone_name(to_move));
    for scored in evaluator.best_moves(&mut board, to_move, top) {
        println!("  {:<3} {:>8}", scored.pos, scored.score);
    }

    let result = engine.get_move_with_stats(&board, to_move);
    match result.best_move {
        Some(pos) => println!(
            "Engine plays {pos} (score {}, {} nodes, {} ms)",
            result.score, result.nodes, result.time_ms
        ),
        None => println!("Engine finds no legal move"),
    }
    Ok(())
}

fn stone_name(stone: Stone) -> &'static str {
    match stone {
        Stone::Black => "Black",
        Stone::White => "White",
        Stone::Empty => "-",
    }
}

fn outcome(board: &Board) -> String {
    match board.winner() {
        Some(winner) => format!("{} wins", stone_name(winner)),
        None if board.is_game_over() => "Draw".to_string(),
        None => format!("Stopped after {} moves", board.stone_count()),
    }
}
