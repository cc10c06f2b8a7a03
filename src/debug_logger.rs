// Debug logging module for recording solved positions
//
// Each solve is appended to a JSONL file with enough information to rebuild
// the position (initial board, who started, colors played since) and the
// solver's answer, so the replay tool can re-solve it later.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::search::{Score, SearchOutcome};

/// Represents a single debug log entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogEntry {
    /// Number of colors played before this position
    pub ply: usize,
    /// Initial board, one string of color digits per row
    pub board: Vec<String>,
    pub second_player_starts: bool,
    /// Colors played from the initial board to this position
    pub history: Vec<u8>,
    /// Color the solver recommended, or None when no claim gains tiles
    pub recommended: Option<u8>,
    pub score: Score,
    pub depth: u8,
    pub reachable: u64,
    pub timestamp: String,
}

impl LogEntry {
    /// Builds an entry for a solved position, stamped with the current time
    pub fn new(
        board: Vec<String>,
        second_player_starts: bool,
        history: Vec<u8>,
        depth: u8,
        outcome: &SearchOutcome,
    ) -> Self {
        LogEntry {
            ply: history.len(),
            board,
            second_player_starts,
            history,
            recommended: outcome.best_move(),
            score: outcome.score,
            depth,
            reachable: outcome.reachable,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> so clones of the logger append to the same file
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        // Initialize the log file
        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one entry; failures are logged, never returned
    pub async fn log_solve(&self, entry: &LogEntry) {
        if !self.enabled {
            return;
        }

        let mut file_guard = self.file.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else {
                        // Flush to ensure data is written to disk
                        if let Err(e) = file.flush().await {
                            error!("Failed to flush debug log: {}", e);
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}
