// Integration tests for the replay engine
//
// Tests the core functionality of the replay engine including:
// - Loading JSONL solve logs
// - Replaying logged positions at their logged depth
// - Validating expected moves
// - Generating statistics

use filler_solver::config::Config;
use filler_solver::debug_logger::{DebugLogger, LogEntry};
use filler_solver::game::StandardGame;
use filler_solver::grid::{grid_to_rows, random_grid};
use filler_solver::replay::ReplayEngine;
use filler_solver::solver::Solver;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Helper function to get the path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn engine() -> ReplayEngine {
    ReplayEngine::new(Config::default_hardcoded(), false)
}

#[test]
fn test_load_log_file_skips_blank_lines() {
    let entries = engine()
        .load_log_file(fixture_path("opening_depth1.jsonl"))
        .expect("Failed to load opening_depth1.jsonl");

    assert_eq!(entries.len(), 3, "Expected 3 log entries");
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.ply, i, "Ply should match index");
        assert_eq!(entry.history.len(), entry.ply, "History length is the ply");
        assert_eq!(entry.depth, 1);
    }
    assert_eq!(entries[0].recommended, Some(1), "Opening move should be GREEN");
}

#[test]
fn test_load_log_file_missing() {
    let result = engine().load_log_file(fixture_path("does_not_exist.jsonl"));
    assert!(result.is_err(), "Missing log file should be an error");
}

#[test]
fn test_replay_all_matches_logged_solves() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("opening_depth1.jsonl"))
        .expect("Failed to load opening_depth1.jsonl");

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 3, "Should have replayed all 3 plies");

    for result in &results {
        assert!(result.matches, "Ply {} should replay identically", result.ply);
        assert_eq!(result.replayed_move, result.original_move);
        assert_eq!(result.replayed_score, result.original_score);
    }
}

#[test]
fn test_replay_two_ply_lookahead() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("opening_depth2.jsonl"))
        .expect("Failed to load opening_depth2.jsonl");

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 1);
    assert!(results[0].matches, "Depth-2 opening should replay identically");
    assert_eq!(results[0].replayed_score, 0, "Player 2 evens the count");
    assert_eq!(results[0].search_depth, 2);
}

#[test]
fn test_replay_specific_plies() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("opening_depth1.jsonl"))
        .expect("Failed to load opening_depth1.jsonl");

    let results = engine
        .replay_plies(&entries, &[0, 2])
        .expect("Failed to replay specific plies");

    assert_eq!(results.len(), 2, "Should have replayed 2 specific plies");
    assert_eq!(results[0].ply, 0, "First result should be ply 0");
    assert_eq!(results[1].ply, 2, "Second result should be ply 2");

    let missing = engine.replay_plies(&entries, &[7]);
    assert!(missing.is_err(), "Unknown ply should be an error");
}

#[test]
fn test_stale_recommendation_is_a_mismatch() {
    // GREEN and YELLOW gain the same at depth 1; the earlier color wins the tie
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("stale_recommendation.jsonl"))
        .expect("Failed to load stale_recommendation.jsonl");

    let results = engine.replay_all(&entries);
    assert_eq!(results.len(), 1);
    assert!(!results[0].matches);
    assert_eq!(results[0].original_move, Some(2));
    assert_eq!(results[0].replayed_move, Some(1));

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.total_positions, 1);
    assert_eq!(stats.mismatches, 1);
    assert_eq!(stats.match_rate, 0.0);
}

#[test]
fn test_generate_stats() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("opening_depth1.jsonl"))
        .expect("Failed to load opening_depth1.jsonl");

    let results = engine.replay_all(&entries);
    let stats = engine.generate_stats(&results);

    assert_eq!(stats.total_positions, 3, "Should have 3 total positions");
    assert_eq!(
        stats.matches + stats.mismatches,
        stats.total_positions,
        "Matches + mismatches should equal total positions"
    );
    assert_eq!(stats.match_rate, 100.0);
}

#[test]
fn test_validate_expected_moves_success() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("opening_depth1.jsonl"))
        .expect("Failed to load opening_depth1.jsonl");

    let expected_moves = vec![(0, vec![1]), (1, vec![2]), (2, vec![3, 5])];
    let result = engine.validate_expected_moves(&entries, &expected_moves);
    assert!(result.is_ok(), "Validation should succeed: {:?}", result);
}

#[test]
fn test_validate_expected_moves_failure() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("opening_depth1.jsonl"))
        .expect("Failed to load opening_depth1.jsonl");

    let result = engine.validate_expected_moves(&entries, &[(1, vec![0, 5])]);
    let message = result.expect_err("Validation should fail for an unexpected move");
    assert!(message.contains("Ply 1"), "Error should name the ply: {}", message);
}

#[tokio::test]
async fn test_replay_of_fresh_log_matches_completely() {
    let path = std::env::temp_dir().join(format!("filler_replay_{}.jsonl", std::process::id()));
    let path_str = path.to_string_lossy().to_string();

    let mut config = Config::default_hardcoded();
    config.search.max_depth = 4;
    let solver = Solver::new(config.clone());
    let logger = DebugLogger::new(true, &path_str).await;

    let mut rng = StdRng::seed_from_u64(2024);
    let grid = random_grid(&mut rng, 6);
    let board = grid_to_rows(&grid);
    let mut game = StandardGame::new(&grid, false).expect("random board is valid");
    let mut history = Vec::new();

    // Follow the solver's own recommendations for a few plies
    for _ in 0..4 {
        let outcome = solver.solve(&game);
        logger
            .log_solve(&LogEntry::new(board.clone(), false, history.clone(), 4, &outcome))
            .await;

        let Some(color) = outcome.best_move() else {
            break;
        };
        game = game.simulate(color).expect("recommended move is legal");
        history.push(color);
    }

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).expect("fresh log loads");
    assert!(!entries.is_empty());

    let results = engine.replay_all(&entries);
    let stats = engine.generate_stats(&results);
    assert_eq!(stats.total_positions, entries.len());
    assert_eq!(stats.matches, entries.len(), "Replays must be deterministic");

    let _ = std::fs::remove_file(&path);
}
