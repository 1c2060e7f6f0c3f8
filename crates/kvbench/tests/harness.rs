//! End-to-end harness tests against the in-process memory backend.

use kvbench::bench::{BenchmarkRunner, Mode, SharedRecorder, WorkerPool};
use kvbench::cli::Cli;
use kvbench::config::{BenchConfig, KeyErrorPolicy};
use kvbench::template::Template;
use kvbench_store::{BackendKind, MemoryStore, Store, StoreError, StoreResult};
use std::sync::Arc;

fn test_config(threads: usize, key_num: u64, policy: KeyErrorPolicy) -> Arc<BenchConfig> {
    Arc::new(BenchConfig {
        threads,
        key_num,
        keys: Template::parse("bench-%06d").unwrap(),
        values: Template::parse("v-%d").unwrap(),
        backend: BackendKind::Memory,
        aerospike: None,
        on_key_error: policy,
        color: false,
    })
}

fn memory_store() -> (Arc<MemoryStore>, Arc<dyn Store>) {
    let mem = Arc::new(MemoryStore::new());
    let store: Arc<dyn Store> = mem.clone();
    (mem, store)
}

/// Store wrapper that rejects one specific key as malformed.
struct KeyFaultStore {
    inner: MemoryStore,
    bad_key: String,
}

impl KeyFaultStore {
    fn new(bad_key: String) -> Self {
        Self {
            inner: MemoryStore::new(),
            bad_key,
        }
    }

    fn check(&self, key: &str) -> StoreResult<()> {
        if key == self.bad_key {
            return Err(StoreError::InvalidKey {
                key: key.to_owned(),
                reason: "injected fault".to_owned(),
            });
        }
        Ok(())
    }
}

impl Store for KeyFaultStore {
    fn name(&self) -> &str {
        "key-fault"
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check(key)?;
        self.inner.put(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<String> {
        self.check(key)?;
        self.inner.get(key)
    }
}

#[test]
fn generate_then_benchmark_has_no_read_failures() {
    let config = test_config(10, 100, KeyErrorPolicy::Discard);
    let (mem, store) = memory_store();

    let runner = BenchmarkRunner::new(Arc::clone(&config), store);
    runner.generate().unwrap();
    assert_eq!(mem.len(), 100);
    assert!(mem.get("bench-000000").unwrap().starts_with("v-"));
    assert!(mem.get("bench-000099").is_ok());

    let reports = runner.run().unwrap();
    assert_eq!(reports.len(), 4);

    let read = &reports[0];
    assert_eq!(read.phase, "read");
    assert_eq!(read.total_ops, 100);
    assert_eq!(read.failures, 0);

    let write = &reports[1];
    assert_eq!(write.phase, "write");
    assert_eq!(write.total_ops, 100);
    assert_eq!(write.failures, 0);
}

#[test]
fn mixed_phase_reports_are_independent() {
    let config = test_config(2, 10, KeyErrorPolicy::Discard);
    let (_mem, store) = memory_store();

    let runner = BenchmarkRunner::new(Arc::clone(&config), store);
    runner.generate().unwrap();
    let reports = runner.run().unwrap();

    let mixed_read = &reports[2];
    let mixed_write = &reports[3];
    assert_eq!(mixed_read.phase, "50%-read");
    assert_eq!(mixed_write.phase, "50%-write");
    assert_eq!(mixed_read.total_ops, 10);
    assert_eq!(mixed_write.total_ops, 10);
    assert_eq!(mixed_read.failures, 0);
    assert_eq!(mixed_write.failures, 0);
}

#[test]
fn reads_against_an_empty_store_all_fail_but_are_counted() {
    let config = test_config(4, 40, KeyErrorPolicy::Discard);
    let (_mem, store) = memory_store();

    let pool = WorkerPool::new(Arc::clone(&config), store);
    let recorder = Arc::new(SharedRecorder::new());
    pool.run(Mode::Read, &recorder).unwrap();

    assert_eq!(recorder.counts(), (0, 40));
    assert_eq!(recorder.sample_count(), 40);

    let report = recorder.report("read");
    assert_eq!(report.total_ops, 40);
    assert_eq!(report.failures, 40);
}

#[test]
fn success_plus_fail_equals_sample_count() {
    let config = test_config(10, 100, KeyErrorPolicy::Discard);
    let (_mem, store) = memory_store();

    let pool = WorkerPool::new(Arc::clone(&config), store);
    let recorder = Arc::new(SharedRecorder::new());
    pool.run(Mode::Write, &recorder).unwrap();

    let (success, fail) = recorder.counts();
    assert_eq!(success + fail, 100);
    assert_eq!(recorder.sample_count(), 100);
}

#[test]
fn remainder_keys_are_never_written() {
    // 105 keys over 10 workers: the last 5 are dropped by partitioning.
    let config = test_config(10, 105, KeyErrorPolicy::Discard);
    let (mem, store) = memory_store();

    let runner = BenchmarkRunner::new(Arc::clone(&config), store);
    runner.generate().unwrap();

    assert_eq!(mem.len(), 100);
    assert!(mem.get("bench-000099").is_ok());
    assert!(matches!(
        mem.get("bench-000100"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn fewer_keys_than_workers_yields_an_empty_zero_report() {
    let config = test_config(10, 5, KeyErrorPolicy::Discard);
    let (mem, store) = memory_store();

    let runner = BenchmarkRunner::new(Arc::clone(&config), store);
    runner.generate().unwrap();
    assert_eq!(mem.len(), 0);

    let reports = runner.run().unwrap();
    for report in &reports {
        assert_eq!(report.total_ops, 0);
        assert_eq!(report.failures, 0);
        assert_eq!(report.qps, 0);
        assert_eq!(report.avg_cost_ms, 0.0);
    }
}

#[test]
fn key_fault_discard_drops_the_workers_partial_results() {
    // Two workers over 10 keys; worker 1 hits a fault at index 7 after two
    // successful writes. Its whole tally is dropped, worker 0's survives.
    let config = test_config(2, 10, KeyErrorPolicy::Discard);
    let store: Arc<dyn Store> = Arc::new(KeyFaultStore::new("bench-000007".to_owned()));

    let pool = WorkerPool::new(Arc::clone(&config), store);
    let recorder = Arc::new(SharedRecorder::new());
    pool.run(Mode::Write, &recorder).unwrap();

    assert_eq!(recorder.counts(), (5, 0));
    assert_eq!(recorder.sample_count(), 5);
}

#[test]
fn key_fault_merge_keeps_the_partial_tally() {
    let config = test_config(2, 10, KeyErrorPolicy::Merge);
    let store: Arc<dyn Store> = Arc::new(KeyFaultStore::new("bench-000007".to_owned()));

    let pool = WorkerPool::new(Arc::clone(&config), store);
    let recorder = Arc::new(SharedRecorder::new());
    pool.run(Mode::Write, &recorder).unwrap();

    // Worker 0 merged 5 ops, worker 1 merged indices 5 and 6 before the
    // fault at 7 aborted it.
    assert_eq!(recorder.counts(), (7, 0));
    assert_eq!(recorder.sample_count(), 7);
}

#[test]
fn key_fault_fail_policy_aborts_the_phase() {
    let config = test_config(2, 10, KeyErrorPolicy::Fail);
    let store: Arc<dyn Store> = Arc::new(KeyFaultStore::new("bench-000007".to_owned()));

    let pool = WorkerPool::new(Arc::clone(&config), store);
    let recorder = Arc::new(SharedRecorder::new());
    assert!(pool.run(Mode::Write, &recorder).is_err());
}

#[test]
fn config_file_round_trip_through_the_cli() {
    use clap::Parser;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bt.yml");
    std::fs::write(
        &path,
        "\
common:
  threads: 3
  key_num: 30
  key_fmt: \"-%06d\"
  val_fmt: \"v-%d\"
",
    )
    .unwrap();

    let cli = Cli::parse_from([
        "kvbench",
        "-c",
        path.to_str().unwrap(),
        "-t",
        "memory",
        "-p",
        "smoke",
    ]);
    let config = cli.into_config().unwrap();
    assert_eq!(config.threads, 3);
    assert_eq!(config.key_num, 30);
    assert_eq!(config.backend, BackendKind::Memory);
    assert_eq!(config.keys.render(1), "smoke-000001");
}

#[test]
fn json_export_writes_a_parseable_summary() {
    let config = test_config(2, 20, KeyErrorPolicy::Discard);
    let (_mem, store) = memory_store();

    let runner = BenchmarkRunner::new(Arc::clone(&config), store);
    runner.generate().unwrap();
    let reports = runner.run().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    let summary = kvbench::results::RunSummary::new(&config, reports);
    kvbench::results::export_json(&summary, &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["backend"], "memory");
    assert_eq!(value["phases"].as_array().unwrap().len(), 4);
    assert_eq!(value["phases"][0]["phase"], "read");
}
