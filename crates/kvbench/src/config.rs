//! Run configuration.
//!
//! The YAML config file is deserialized into [`FileConfig`], then combined
//! with the CLI flags into an immutable [`BenchConfig`] snapshot that is
//! validated once and shared read-only by the orchestrator, the keyspace
//! partitioner, and the worker pool.

use crate::template::Template;
use anyhow::{Context, Result, ensure};
use kvbench_store::{AerospikeConfig, BackendKind};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// What a worker does when the store rejects a key as malformed.
///
/// `Discard` reproduces the historical behavior: the worker aborts and its
/// unmerged partial results are dropped, so the phase silently under-counts
/// while the surviving workers merge normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyErrorPolicy {
    /// Abort the worker and drop its partial tally.
    #[default]
    Discard,
    /// Merge the partial tally, then abort the worker.
    Merge,
    /// Abort the whole run.
    Fail,
}

/// `common` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct CommonSection {
    #[serde(alias = "thread")]
    pub threads: usize,
    pub key_num: u64,
    pub key_fmt: String,
    pub val_fmt: String,
    #[serde(default)]
    pub on_key_error: KeyErrorPolicy,
}

/// Raw shape of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub common: CommonSection,
    #[serde(default)]
    pub aerospike: Option<AerospikeConfig>,
}

/// Immutable snapshot of everything a run needs.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Parallel workers per workload invocation.
    pub threads: usize,
    /// Total keyspace size.
    pub key_num: u64,
    /// Full key pattern: CLI prefix + `key_fmt`, rendered with the key index.
    pub keys: Template,
    /// Value pattern, rendered with the current UNIX-nanosecond timestamp.
    pub values: Template,
    pub backend: BackendKind,
    pub aerospike: Option<AerospikeConfig>,
    pub on_key_error: KeyErrorPolicy,
    /// Colored phase headers on stdout.
    pub color: bool,
}

/// Read and deserialize the config file.
pub fn load_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parse config file {}", path.display()))
}

impl BenchConfig {
    /// Validate the raw file config and freeze it into a snapshot.
    pub fn build(
        file: FileConfig,
        backend: BackendKind,
        key_prefix: &str,
        color: bool,
    ) -> Result<Self> {
        let common = file.common;
        ensure!(common.threads >= 1, "common.threads must be at least 1");
        ensure!(common.key_num >= 1, "common.key_num must be at least 1");

        let key_pattern = format!("{key_prefix}{}", common.key_fmt);
        let keys = Template::parse(&key_pattern)
            .with_context(|| format!("invalid key pattern {key_pattern:?}"))?;
        let values = Template::parse(&common.val_fmt)
            .with_context(|| format!("invalid common.val_fmt {:?}", common.val_fmt))?;

        Ok(Self {
            threads: common.threads,
            key_num: common.key_num,
            keys,
            values,
            backend,
            aerospike: file.aerospike,
            on_key_error: common.on_key_error,
            color,
        })
    }
}
