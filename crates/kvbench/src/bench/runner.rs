//! Phase orchestration.
//!
//! Generate mode is one write pass over the keyspace with no report.
//! Benchmark mode runs read-only, write-only, and mixed phases in fixed
//! order, resetting both recorders before each so no counts leak across
//! phases. The mixed phase launches the read and write pools
//! concurrently (2 x threads workers total) and joins both before either
//! report is printed.

use crate::bench::{Mode, SharedRecorder, WorkerPool, keyspace};
use crate::config::BenchConfig;
use crate::results::{PhaseReport, ReportPrinter};
use anyhow::{Context, Result, anyhow};
use kvbench_store::Store;
use std::sync::Arc;
use std::thread;

pub struct BenchmarkRunner {
    config: Arc<BenchConfig>,
    store: Arc<dyn Store>,
    pool: WorkerPool,
    read_recorder: Arc<SharedRecorder>,
    write_recorder: Arc<SharedRecorder>,
    printer: ReportPrinter,
}

impl BenchmarkRunner {
    pub fn new(config: Arc<BenchConfig>, store: Arc<dyn Store>) -> Self {
        let pool = WorkerPool::new(Arc::clone(&config), Arc::clone(&store));
        let printer = ReportPrinter::new(config.color);
        Self {
            config,
            store,
            pool,
            read_recorder: Arc::new(SharedRecorder::new()),
            write_recorder: Arc::new(SharedRecorder::new()),
            printer,
        }
    }

    fn reset_recorders(&self) {
        self.read_recorder.reset();
        self.write_recorder.reset();
    }

    /// Pre-populate the backend: one write pass over the full key range.
    /// No statistics are reported.
    pub fn generate(&self) -> Result<()> {
        tracing::info!(
            keys = keyspace::covered_keys(self.config.key_num, self.config.threads),
            threads = self.config.threads,
            "generating benchmark data"
        );
        self.reset_recorders();
        self.pool.run(Mode::Write, &self.write_recorder)?;
        let (written, failed) = self.write_recorder.counts();
        tracing::info!(written, failed, "data generation complete");
        Ok(())
    }

    /// Run the benchmark sequence and return all phase reports in order:
    /// read, write, 50%-read, 50%-write.
    pub fn run(&self) -> Result<Vec<PhaseReport>> {
        let mut reports = Vec::with_capacity(4);
        reports.push(self.run_single(Mode::Read)?);
        reports.push(self.run_single(Mode::Write)?);
        reports.extend(self.run_mixed()?);
        Ok(reports)
    }

    fn run_single(&self, mode: Mode) -> Result<PhaseReport> {
        self.reset_recorders();
        let recorder = match mode {
            Mode::Read => &self.read_recorder,
            Mode::Write => &self.write_recorder,
        };
        self.pool.run(mode, recorder)?;
        let report = recorder.report(mode.label());
        self.printer.print_phase(self.store.name(), &report);
        Ok(report)
    }

    fn run_mixed(&self) -> Result<Vec<PhaseReport>> {
        self.reset_recorders();

        let read_pool = self.pool.clone();
        let read_recorder = Arc::clone(&self.read_recorder);
        let read_handle = thread::Builder::new()
            .name("mixed-read".to_owned())
            .spawn(move || read_pool.run(Mode::Read, &read_recorder))
            .context("spawn mixed read pool")?;

        let write_pool = self.pool.clone();
        let write_recorder = Arc::clone(&self.write_recorder);
        let write_handle = thread::Builder::new()
            .name("mixed-write".to_owned())
            .spawn(move || write_pool.run(Mode::Write, &write_recorder))
            .context("spawn mixed write pool")?;

        let read_result = read_handle
            .join()
            .map_err(|_| anyhow!("mixed read pool panicked"))?;
        let write_result = write_handle
            .join()
            .map_err(|_| anyhow!("mixed write pool panicked"))?;
        read_result?;
        write_result?;

        let read_report = self.read_recorder.report("50%-read");
        let write_report = self.write_recorder.report("50%-write");
        self.printer.print_phase(self.store.name(), &read_report);
        self.printer.print_phase(self.store.name(), &write_report);
        Ok(vec![read_report, write_report])
    }
}
