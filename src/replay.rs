// Replay module for re-solving logged positions
//
// This module provides functionality to:
// 1. Parse JSONL solve logs
// 2. Rebuild each logged position and solve it again
// 3. Compare logged vs replayed recommendations
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::game::StandardGame;
use crate::grid::grid_from_rows;
use crate::search::Score;
use crate::solver::Solver;
use crate::types::color_name;

pub use crate::debug_logger::LogEntry;

/// Result of replaying a single logged position
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub ply: usize,
    pub original_move: Option<u8>,
    pub replayed_move: Option<u8>,
    pub matches: bool,
    pub original_score: Score,
    pub replayed_score: Score,
    pub search_depth: u8,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_positions: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing solve logs
pub struct ReplayEngine {
    solver: Solver,
    verbose: bool,
}

fn move_str(color: Option<u8>) -> String {
    color.map(color_name).unwrap_or_else(|| "none".to_string())
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            solver: Solver::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Rebuilds the position a log entry was solved from
    pub fn rebuild_position(entry: &LogEntry) -> Result<StandardGame, String> {
        let grid = grid_from_rows(entry.board.as_slice()).map_err(|e| e.to_string())?;
        StandardGame::new(&grid, entry.second_player_starts)
            .and_then(|game| game.simulate_sequence(&entry.history))
            .map_err(|e| format!("Cannot rebuild ply {}: {}", entry.ply, e))
    }

    /// Replays a single log entry at its logged depth and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying ply {}...", entry.ply);
        }

        let position = Self::rebuild_position(entry)?;

        let start_time = Instant::now();
        let outcome = self.solver.solve_to_depth(&position, entry.depth);
        let computation_time = start_time.elapsed().as_millis();

        let replayed_move = outcome.best_move();
        let matches = replayed_move == entry.recommended && outcome.score == entry.score;

        let result = ReplayResult {
            ply: entry.ply,
            original_move: entry.recommended,
            replayed_move,
            matches,
            original_score: entry.score,
            replayed_score: outcome.score,
            search_depth: entry.depth,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Ply {}: ✓ MATCH - {} (score: {:+}, depth: {}, time: {}ms)",
                    entry.ply,
                    move_str(replayed_move),
                    outcome.score,
                    entry.depth,
                    computation_time
                );
            } else {
                warn!(
                    "Ply {}: ✗ MISMATCH - Original: {} ({:+}), Replayed: {} ({:+}) (depth: {}, time: {}ms)",
                    entry.ply,
                    move_str(entry.recommended),
                    entry.score,
                    move_str(replayed_move),
                    outcome.score,
                    entry.depth,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay ply {}: {}", entry.ply, e);
                }
            }
        }

        results
    }

    /// Replays specific plies from a log file
    pub fn replay_plies(
        &self,
        entries: &[LogEntry],
        plies: &[usize],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for ply in plies {
            let entry = entries
                .iter()
                .find(|e| e.ply == *ply)
                .ok_or_else(|| format!("Ply {} not found in log file", ply))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay ply {}: {}", ply, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_positions = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_positions - matches;
        let match_rate = if total_positions > 0 {
            (matches as f64 / total_positions as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_positions,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Positions: {}", stats.total_positions);
        println!("Matches:         {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:      {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>()
                / results.len() as f64;
            let avg_depth: f64 =
                results.iter().map(|r| r.search_depth as f64).sum::<f64>() / results.len() as f64;

            println!("Average Search Depth:       {:.1}", avg_depth);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        // Show mismatches in detail
        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Ply {}: {} ({:+}) → {} ({:+}) (depth: {}, time: {}ms)",
                    result.ply,
                    move_str(result.original_move),
                    result.original_score,
                    move_str(result.replayed_move),
                    result.replayed_score,
                    result.search_depth,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that the logged recommendations match expectations
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(usize, Vec<u8>)], // (ply, acceptable colors)
    ) -> Result<(), String> {
        for (ply, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.ply == *ply)
                .ok_or_else(|| format!("Ply {} not found in log", ply))?;

            let accepted = entry
                .recommended
                .map(|color| acceptable.contains(&color))
                .unwrap_or(false);

            if !accepted {
                return Err(format!(
                    "Ply {}: Expected one of {:?}, but got {}",
                    ply,
                    acceptable.iter().map(|&c| color_name(c)).collect::<Vec<_>>(),
                    move_str(entry.recommended)
                ));
            }
        }

        Ok(())
    }
}
