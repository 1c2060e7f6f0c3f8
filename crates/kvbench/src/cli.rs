//! Command-line interface for the benchmark harness.

use crate::config::{self, BenchConfig};
use anyhow::{Context, Result};
use clap::Parser;
use kvbench_store::BackendKind;
use std::path::PathBuf;

/// Concurrent load-generation and latency benchmark for key-value backends.
///
/// Reads the workload shape (threads, keyspace, key/value formats) from a
/// YAML config file and drives the selected store backend through a
/// read-only, a write-only, and a mixed read+write pass, reporting QPS and
/// latency percentiles per phase.
#[derive(Parser, Debug)]
#[command(name = "kvbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML config file.
    #[arg(short = 'c', long = "config", default_value = "bt.yml", value_name = "FILE")]
    pub config: PathBuf,

    /// Store backend to drive.
    ///
    /// Valid values: aerospike, memory
    #[arg(short = 't', long = "type", default_value = "aerospike", value_name = "BACKEND")]
    pub backend: String,

    /// Prefix prepended to every generated key.
    #[arg(short = 'p', long = "prefix", default_value = "benchmark")]
    pub prefix: String,

    /// Generate (pre-populate) the keyspace instead of benchmarking.
    #[arg(short = 'g', long = "generate")]
    pub generate: bool,

    /// Export phase reports to a JSON file.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the flags and the config file into a run snapshot.
    pub fn into_config(self) -> Result<BenchConfig> {
        let backend: BackendKind = self
            .backend
            .parse()
            .with_context(|| format!("unsupported backend type {:?}", self.backend))?;
        let file = config::load_file(&self.config)?;
        BenchConfig::build(file, backend, &self.prefix, !self.no_color)
    }
}
