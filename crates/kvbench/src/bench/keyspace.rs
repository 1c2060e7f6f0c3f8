//! Deterministic keyspace partitioning.
//!
//! Every worker owns a contiguous slice of `[0, total_keys)` of exactly
//! `total_keys / workers` indices. When `total_keys` is not a multiple of
//! the worker count, the trailing `total_keys % workers` indices belong to
//! no worker and are never visited: a run covers `workers * (total_keys /
//! workers)` keys, not `total_keys`. Callers that need exact coverage must
//! pick a divisible key count.

use std::ops::Range;

/// Key index range owned by worker `index` out of `workers`.
pub fn worker_range(total_keys: u64, workers: usize, index: usize) -> Range<u64> {
    debug_assert!(index < workers, "worker index out of range");
    let per_worker = total_keys / workers as u64;
    let start = index as u64 * per_worker;
    start..start + per_worker
}

/// Number of key indices actually visited by a full pool invocation.
pub fn covered_keys(total_keys: u64, workers: usize) -> u64 {
    (total_keys / workers as u64) * workers as u64
}
