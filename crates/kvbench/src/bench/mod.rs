//! Benchmark execution: keyspace partitioning, worker pool, phase runner.

pub mod keyspace;
mod pool;
mod recorder;
mod runner;

pub use pool::WorkerPool;
pub use recorder::{PhaseRecorder, SharedRecorder, WorkerTally};
pub use runner::BenchmarkRunner;

/// Workload kind executed by a worker pool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Read => "read",
            Mode::Write => "write",
        }
    }
}
