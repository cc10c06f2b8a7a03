use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;
use std::io::{self, BufRead, Write};
use std::process;
use std::time::Instant;

use filler_solver::config::Config;
use filler_solver::debug_logger::{DebugLogger, LogEntry};
use filler_solver::game::{Grid, StandardGame, STANDARD_COLORS, STANDARD_COLS, STANDARD_ROWS};
use filler_solver::grid::{grid_from_rows, grid_to_rows, load_grid, random_grid};
use filler_solver::search::SearchOutcome;
use filler_solver::solver::Solver;
use filler_solver::types::{color_name, parse_color};

/// Command line options for the solver
#[derive(Debug, Default)]
struct Options {
    board_path: Option<String>,
    config_path: Option<String>,
    depth: Option<u8>,
    second_player_starts: bool,
    opening: Option<String>,
    random_seed: Option<u64>,
    play: bool,
}

fn print_usage() {
    eprintln!("Filler Solver");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  filler-solve [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --board <path>          Board file, one row of color digits per line");
    eprintln!("  --config <path>         Path to Filler.toml (default: Filler.toml)");
    eprintln!("  --depth <n>             Plies to look ahead (overrides the config)");
    eprintln!("  --second                Player 2 moves first");
    eprintln!("  --opening <C1,C2,...>   Colors already played, by name or index");
    eprintln!("  --random <seed>         Play on a random board from the given seed");
    eprintln!("  --play                  Interactive session, one color per prompt");
    eprintln!("  --help                  Show this help message");
}

fn require_value(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| format!("{} requires an argument", flag))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--board" => {
                options.board_path = Some(require_value(args, i, "--board")?);
                i += 1;
            }
            "--config" => {
                options.config_path = Some(require_value(args, i, "--config")?);
                i += 1;
            }
            "--depth" => {
                let value = require_value(args, i, "--depth")?;
                options.depth = Some(
                    value
                        .parse::<u8>()
                        .map_err(|e| format!("Invalid depth '{}': {}", value, e))?,
                );
                i += 1;
            }
            "--second" => options.second_player_starts = true,
            "--opening" => {
                options.opening = Some(require_value(args, i, "--opening")?);
                i += 1;
            }
            "--random" => {
                let value = require_value(args, i, "--random")?;
                options.random_seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|e| format!("Invalid seed '{}': {}", value, e))?,
                );
                i += 1;
            }
            "--play" => options.play = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
        i += 1;
    }

    Ok(options)
}

fn parse_colors<S: AsRef<str>>(names: &[S]) -> Result<Vec<u8>, String> {
    names
        .iter()
        .map(|name| parse_color(name.as_ref().trim()).map_err(|e| e.to_string()))
        .collect()
}

fn format_line(outcome: &SearchOutcome) -> String {
    outcome
        .trace
        .iter()
        .map(|&color| color_name(color))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Board the session starts from: a board file, a random board, or the configured one
fn initial_grid(
    options: &Options,
    config: &Config,
) -> Result<Grid<STANDARD_ROWS, STANDARD_COLS>, String> {
    if let Some(path) = &options.board_path {
        info!("Loading board from {}", path);
        return load_grid(path);
    }
    if let Some(seed) = options.random_seed {
        info!("Generating random board from seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        return Ok(random_grid(&mut rng, STANDARD_COLORS as u8));
    }
    grid_from_rows(config.game.board.as_slice()).map_err(|e| format!("Invalid configured board: {}", e))
}

/// One search plus its debug log entry
async fn solve_and_log(
    solver: &Solver,
    logger: &DebugLogger,
    board: &[String],
    second_player_starts: bool,
    history: &[u8],
    game: StandardGame,
) -> Result<SearchOutcome, String> {
    let outcome = solver
        .solve_with_progress(game)
        .await
        .map_err(|e| e.to_string())?;

    let entry = LogEntry::new(
        board.to_vec(),
        second_player_starts,
        history.to_vec(),
        solver.config().search.max_depth,
        &outcome,
    );
    logger.log_solve(&entry).await;

    Ok(outcome)
}

async fn run(options: Options) -> Result<(), String> {
    let mut config = match &options.config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };
    if let Some(depth) = options.depth {
        config.search.max_depth = depth;
    }

    let second_player_starts = options.second_player_starts || config.game.second_player_starts;
    let grid = initial_grid(&options, &config)?;
    let board = grid_to_rows(&grid);

    let mut history = match &options.opening {
        Some(list) => parse_colors(list.split(',').collect::<Vec<_>>().as_slice())?,
        None => parse_colors(config.game.opening.as_slice())?,
    };

    let mut game = StandardGame::new(&grid, second_player_starts)
        .and_then(|game| game.simulate_sequence(&history))
        .map_err(|e| e.to_string())?;

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let solver = Solver::new(config);

    if !options.play {
        print!("{}", game);
        let start_time = Instant::now();
        let outcome =
            solve_and_log(&solver, &logger, &board, second_player_starts, &history, game).await?;

        println!("Best line: {}", format_line(&outcome));
        println!("Score: {:+}", outcome.score);
        println!("Explored path: {} nodes", outcome.reachable);
        println!("Time: {}ms", start_time.elapsed().as_millis());
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", game);
        if game.is_ended() {
            println!("Game over. Score: {:+}", game.score());
            return Ok(());
        }

        let outcome =
            solve_and_log(&solver, &logger, &board, second_player_starts, &history, game).await?;
        let best = outcome
            .best_move()
            .map(color_name)
            .unwrap_or_else(|| "none".to_string());

        loop {
            print!("{} [best={}{:+}]: ", game.current_player(), best, outcome.score);
            io::stdout().flush().map_err(|e| e.to_string())?;

            let line = match lines.next() {
                Some(line) => line.map_err(|e| e.to_string())?,
                None => {
                    println!();
                    return Ok(());
                }
            };

            match parse_color(line.trim()).and_then(|color| game.simulate(color).map(|next| (color, next))) {
                Ok((color, next)) => {
                    history.push(color);
                    game = next;
                    break;
                }
                Err(e) => println!("{}", e),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    info!("Starting Filler solver...");

    if let Err(e) = run(options).await {
        warn!("Solver stopped: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
