// Standalone replay tool for re-solving Filler debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all plies
//   --plies <p1,p2>        Replay specific plies (comma-separated)
//   --validate             Run validation mode with expected moves
//   --verbose              Show detailed output for each ply
//   --config <path>        Path to Filler.toml (default: Filler.toml)

use std::env;
use std::process;

use filler_solver::config::Config;
use filler_solver::replay::ReplayEngine;
use filler_solver::types::parse_color;

enum Mode {
    All,
    Plies(String),
    Validate(String),
}

fn print_usage() {
    eprintln!("Filler Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all plies in the log");
    eprintln!("  --plies <P1,P2,...>     Replay specific plies (comma-separated)");
    eprintln!("  --validate <P:C,...>    Validate expected colors (format: ply:color,...)");
    eprintln!("  --verbose               Show detailed output for each ply");
    eprintln!("  --config <path>         Path to Filler.toml (default: Filler.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all plies");
    eprintln!("  replay filler_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific plies");
    eprintln!("  replay filler_debug.jsonl --plies 0,4,10");
    eprintln!();
    eprintln!("  # Validate expected colors, '|' separates acceptable alternatives");
    eprintln!("  replay filler_debug.jsonl --validate 0:green|yellow,4:2");
}

fn parse_plies(s: &str) -> Result<Vec<usize>, String> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<usize>()
                .map_err(|e| format!("Invalid ply number '{}': {}", p, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(usize, Vec<u8>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'ply:color'", pair));
            }

            let ply = parts[0]
                .parse::<usize>()
                .map_err(|e| format!("Invalid ply number '{}': {}", parts[0], e))?;

            let colors: Result<Vec<u8>, String> = parts[1]
                .split('|')
                .map(|c| parse_color(c.trim()).map_err(|e| e.to_string()))
                .collect();

            Ok((ply, colors?))
        })
        .collect()
}

fn require_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Filler.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--plies" => {
                mode = Some(Mode::Plies(require_value(&args, i, "--plies")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(require_value(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = require_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --plies, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} plies...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Plies(arg) => {
            let plies = match parse_plies(&arg) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error parsing plies: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific ply(s)...\n", plies.len());
            match engine.replay_plies(&entries, &plies) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = match parse_expected_moves(&arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
