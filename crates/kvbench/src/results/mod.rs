//! Phase reports, stdout printing, and JSON export.

mod printer;
pub mod stats;

pub use printer::ReportPrinter;

use crate::config::BenchConfig;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// The measured outcome of one benchmark phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    /// Phase label: `read`, `write`, `50%-read`, `50%-write`.
    pub phase: String,
    /// Wall-clock phase duration, whole seconds.
    pub elapsed_secs: u64,
    pub total_ops: u64,
    pub failures: u64,
    /// Operations per second, truncated.
    pub qps: u64,
    /// Phase duration divided by operation count, milliseconds.
    pub avg_cost_ms: f64,
    pub p99_ms: f64,
    pub p95_ms: f64,
}

/// Host information recorded alongside exported results.
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
    pub cpus: usize,
}

impl HostInfo {
    pub fn collect() -> Self {
        Self {
            os: std::env::consts::OS.to_owned(),
            arch: std::env::consts::ARCH.to_owned(),
            cpus: std::thread::available_parallelism().map_or(1, |p| p.get()),
        }
    }
}

/// A full benchmark run, as exported with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub backend: String,
    pub threads: usize,
    pub key_num: u64,
    pub timestamp: String,
    pub host: HostInfo,
    pub phases: Vec<PhaseReport>,
}

impl RunSummary {
    pub fn new(config: &BenchConfig, phases: Vec<PhaseReport>) -> Self {
        Self {
            backend: config.backend.name().to_owned(),
            threads: config.threads,
            key_num: config.key_num,
            timestamp: chrono::Utc::now().to_rfc3339(),
            host: HostInfo::collect(),
            phases,
        }
    }
}

/// Write the run summary as pretty-printed JSON.
pub fn export_json(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize results")?;
    std::fs::write(path, json)
        .with_context(|| format!("write results to {}", path.display()))?;
    Ok(())
}
