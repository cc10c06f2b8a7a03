//! Simple profiling counters using thread-local storage
//!
//! This module provides lightweight profiling without changing function signatures.
//! Enable with environment variable: FILLER_PROFILE=1
//!
//! Unlike the explored-path counter carried by search results, these counters
//! see every node the search visits, including siblings that end in a cutoff.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

thread_local! {
    static MOVE_GEN_TIME: RefCell<u64> = const { RefCell::new(0) };
    static MOVE_GEN_COUNT: RefCell<usize> = const { RefCell::new(0) };

    static SEARCH_TIME: RefCell<u64> = const { RefCell::new(0) };
    static SEARCH_COUNT: RefCell<usize> = const { RefCell::new(0) };
    static SEARCH_LEAVES: RefCell<usize> = const { RefCell::new(0) };
    static SEARCH_CUTOFFS: RefCell<usize> = const { RefCell::new(0) };
}

// Global aggregators
static GLOBAL_MOVE_GEN_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_MOVE_GEN_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SEARCH_TIME: AtomicU64 = AtomicU64::new(0);
static GLOBAL_SEARCH_COUNT: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SEARCH_LEAVES: AtomicUsize = AtomicUsize::new(0);
static GLOBAL_SEARCH_CUTOFFS: AtomicUsize = AtomicUsize::new(0);

static ENABLED: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn is_profiling_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("FILLER_PROFILE").is_ok())
}

/// Times a scope and charges it to a category when dropped
pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        match self.category {
            "move_gen" => {
                MOVE_GEN_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                MOVE_GEN_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            "search" => {
                SEARCH_TIME.with(|t| *t.borrow_mut() += elapsed_ns);
                SEARCH_COUNT.with(|c| *c.borrow_mut() += 1);
            }
            _ => {}
        }
    }
}

#[inline]
pub fn record_leaf() {
    if is_profiling_enabled() {
        SEARCH_LEAVES.with(|c| *c.borrow_mut() += 1);
    }
}

#[inline]
pub fn record_cutoff() {
    if is_profiling_enabled() {
        SEARCH_CUTOFFS.with(|c| *c.borrow_mut() += 1);
    }
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    MOVE_GEN_TIME.with(|t| {
        GLOBAL_MOVE_GEN_TIME.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
    MOVE_GEN_COUNT.with(|c| {
        GLOBAL_MOVE_GEN_COUNT.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });

    SEARCH_TIME.with(|t| {
        GLOBAL_SEARCH_TIME.fetch_add(*t.borrow(), Ordering::Relaxed);
        *t.borrow_mut() = 0;
    });
    SEARCH_COUNT.with(|c| {
        GLOBAL_SEARCH_COUNT.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
    SEARCH_LEAVES.with(|c| {
        GLOBAL_SEARCH_LEAVES.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
    SEARCH_CUTOFFS.with(|c| {
        GLOBAL_SEARCH_CUTOFFS.fetch_add(*c.borrow(), Ordering::Relaxed);
        *c.borrow_mut() = 0;
    });
}

/// Total number of search nodes visited since the last reset
pub fn nodes_visited() -> usize {
    GLOBAL_SEARCH_COUNT.load(Ordering::Relaxed)
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    let mg_time = GLOBAL_MOVE_GEN_TIME.load(Ordering::Relaxed);
    let mg_count = GLOBAL_MOVE_GEN_COUNT.load(Ordering::Relaxed);
    let mg_ms = mg_time as f64 / 1_000_000.0;
    let mg_pct = if total_ns > 0 { 100.0 * mg_time as f64 / total_ns as f64 } else { 0.0 };
    let mg_avg_us = if mg_count > 0 { mg_time as f64 / (mg_count * 1000) as f64 } else { 0.0 };

    eprintln!("Move Generation:");
    eprintln!("  Time:     {:.2}ms ({:.1}%)", mg_ms, mg_pct);
    eprintln!("  Calls:    {}", mg_count);
    eprintln!("  Avg:      {:.2}µs/call\n", mg_avg_us);

    let search_count = GLOBAL_SEARCH_COUNT.load(Ordering::Relaxed);
    let leaves = GLOBAL_SEARCH_LEAVES.load(Ordering::Relaxed);
    let cutoffs = GLOBAL_SEARCH_CUTOFFS.load(Ordering::Relaxed);
    let interior = search_count.saturating_sub(leaves);
    let cutoff_rate = if interior > 0 { 100.0 * cutoffs as f64 / interior as f64 } else { 0.0 };

    // Node timings nest, so the summed search time is not a share of wall time
    let search_ms = GLOBAL_SEARCH_TIME.load(Ordering::Relaxed) as f64 / 1_000_000.0;

    eprintln!("Search:");
    eprintln!("  Nodes:      {} ({} leaves)", search_count, leaves);
    eprintln!("  Cutoffs:    {} ({:.1}% of interior nodes)", cutoffs, cutoff_rate);
    eprintln!("  Node Time:  {:.2}ms (nested)\n", search_ms);

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    GLOBAL_MOVE_GEN_TIME.store(0, Ordering::Relaxed);
    GLOBAL_MOVE_GEN_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_SEARCH_TIME.store(0, Ordering::Relaxed);
    GLOBAL_SEARCH_COUNT.store(0, Ordering::Relaxed);
    GLOBAL_SEARCH_LEAVES.store(0, Ordering::Relaxed);
    GLOBAL_SEARCH_CUTOFFS.store(0, Ordering::Relaxed);
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
