//! Fixed-size worker pool.
//!
//! One pool invocation runs a single workload kind across `threads`
//! workers, each iterating its own contiguous key range, and blocks until
//! every worker has finished and merged its tally.

use crate::bench::{Mode, SharedRecorder, WorkerTally, keyspace};
use crate::config::{BenchConfig, KeyErrorPolicy};
use anyhow::{Context, Result, bail};
use kvbench_store::{Store, StoreError};
use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

#[derive(Clone)]
pub struct WorkerPool {
    config: Arc<BenchConfig>,
    store: Arc<dyn Store>,
}

impl WorkerPool {
    pub fn new(config: Arc<BenchConfig>, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }

    /// Execute `mode` across all workers; blocks until the last one joined.
    ///
    /// Workers that hit a key fault abort individually according to the
    /// configured [`KeyErrorPolicy`]; only the `Fail` policy turns such a
    /// fault into an error for the whole phase. Store operation failures
    /// never surface here; they are counted in the recorder.
    pub fn run(&self, mode: Mode, recorder: &Arc<SharedRecorder>) -> Result<()> {
        let mut handles = Vec::with_capacity(self.config.threads);
        for worker in 0..self.config.threads {
            let range = keyspace::worker_range(self.config.key_num, self.config.threads, worker);
            let config = Arc::clone(&self.config);
            let store = Arc::clone(&self.store);
            let recorder = Arc::clone(recorder);
            let handle = thread::Builder::new()
                .name(format!("{}-{worker}", mode.label()))
                .spawn(move || run_worker(mode, worker, &config, store.as_ref(), &recorder, range))
                .context("spawn worker thread")?;
            handles.push(handle);
        }

        let mut key_fault = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    key_fault.get_or_insert(err);
                }
                Err(_) => bail!("worker thread panicked"),
            }
        }

        if let Some(err) = key_fault
            && self.config.on_key_error == KeyErrorPolicy::Fail
        {
            return Err(err).with_context(|| format!("{} phase aborted", mode.label()));
        }
        Ok(())
    }
}

/// One worker: iterate the assigned key range, time each store call, keep
/// a local tally, merge it once at the end.
fn run_worker(
    mode: Mode,
    worker: usize,
    config: &BenchConfig,
    store: &dyn Store,
    recorder: &SharedRecorder,
    range: Range<u64>,
) -> std::result::Result<(), StoreError> {
    let mut tally = WorkerTally::default();

    for index in range {
        let key = config.keys.render(index as i64);

        let started = Instant::now();
        let outcome = match mode {
            Mode::Write => {
                let value = config.values.render(unix_nanos());
                store.put(&key, &value)
            }
            Mode::Read => store.get(&key).map(|_| ()),
        };
        let cost_ms = started.elapsed().as_secs_f64() * 1e3;

        match outcome {
            Ok(()) => tally.record_success(cost_ms),
            Err(err) if err.is_key_fault() => {
                return abort_on_key_fault(mode, worker, config, recorder, tally, err);
            }
            Err(err) => {
                tracing::debug!(worker, key = %key, error = %err, "operation failed");
                tally.record_failure(cost_ms);
            }
        }
    }

    recorder.merge(tally);
    Ok(())
}

fn abort_on_key_fault(
    mode: Mode,
    worker: usize,
    config: &BenchConfig,
    recorder: &SharedRecorder,
    tally: WorkerTally,
    err: StoreError,
) -> std::result::Result<(), StoreError> {
    match config.on_key_error {
        KeyErrorPolicy::Discard => {
            tracing::error!(
                worker,
                phase = mode.label(),
                error = %err,
                ops_dropped = tally.ops(),
                "key fault; worker aborted, partial results discarded"
            );
        }
        KeyErrorPolicy::Merge => {
            tracing::error!(
                worker,
                phase = mode.label(),
                error = %err,
                ops_merged = tally.ops(),
                "key fault; worker aborted after merging partial results"
            );
            recorder.merge(tally);
        }
        KeyErrorPolicy::Fail => {}
    }
    Err(err)
}

fn unix_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as i64)
}
