//! Phase result accumulation.
//!
//! Each worker keeps a private [`WorkerTally`] while it runs and merges it
//! into the phase's [`SharedRecorder`] exactly once, after finishing its
//! key range. One lock acquisition per worker, not per operation.

use crate::results::{PhaseReport, stats};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// A single worker's private counters and latency samples.
#[derive(Debug, Default)]
pub struct WorkerTally {
    success: u64,
    fail: u64,
    samples_ms: Vec<f64>,
}

impl WorkerTally {
    pub fn record_success(&mut self, cost_ms: f64) {
        self.success += 1;
        self.samples_ms.push(cost_ms);
    }

    pub fn record_failure(&mut self, cost_ms: f64) {
        self.fail += 1;
        self.samples_ms.push(cost_ms);
    }

    pub fn ops(&self) -> u64 {
        self.success + self.fail
    }
}

/// Counters and latency samples for one benchmark phase.
///
/// Holds `success + fail == samples_ms.len()`: every completed operation
/// contributes exactly one sample, failures included.
#[derive(Debug)]
pub struct PhaseRecorder {
    started_at: Instant,
    finished_at: Option<Instant>,
    success: u64,
    fail: u64,
    samples_ms: Vec<f64>,
}

impl PhaseRecorder {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            finished_at: None,
            success: 0,
            fail: 0,
            samples_ms: Vec::new(),
        }
    }

    fn merge(&mut self, tally: WorkerTally) {
        self.success += tally.success;
        self.fail += tally.fail;
        self.samples_ms.extend(tally.samples_ms);
        debug_assert_eq!(
            self.success + self.fail,
            self.samples_ms.len() as u64,
            "per-operation sample missing"
        );
    }

    pub fn success(&self) -> u64 {
        self.success
    }

    pub fn failures(&self) -> u64 {
        self.fail
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples_ms
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Phase duration; measured up to now while the phase is still open.
    pub fn elapsed(&self) -> Duration {
        self.finished_at.unwrap_or_else(Instant::now) - self.started_at
    }
}

impl Default for PhaseRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// The lock-guarded recorder shared by all workers of a phase.
#[derive(Debug, Default)]
pub struct SharedRecorder {
    inner: Mutex<PhaseRecorder>,
}

impl SharedRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(PhaseRecorder::new()),
        }
    }

    /// Fold one worker's tally into the phase totals.
    pub fn merge(&self, tally: WorkerTally) {
        self.inner.lock().merge(tally);
    }

    /// Replace all state with a fresh recorder and a new start timestamp.
    pub fn reset(&self) {
        *self.inner.lock() = PhaseRecorder::new();
    }

    /// Close the phase and compute its report.
    pub fn report(&self, phase: &str) -> PhaseReport {
        let mut rec = self.inner.lock();
        rec.finished_at = Some(Instant::now());
        stats::compute(phase, rec.elapsed(), rec.success, rec.fail, &rec.samples_ms)
    }

    /// `(success, fail)` totals merged so far.
    pub fn counts(&self) -> (u64, u64) {
        let rec = self.inner.lock();
        (rec.success, rec.fail)
    }

    pub fn sample_count(&self) -> usize {
        self.inner.lock().samples_ms.len()
    }

    pub fn started_at(&self) -> Instant {
        self.inner.lock().started_at
    }
}
