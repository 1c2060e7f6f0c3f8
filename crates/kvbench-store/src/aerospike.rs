//! Aerospike store backend.
//!
//! Owns everything cluster-specific: host list, connection pool sizing,
//! record addressing (namespace/set/bin), and the timeout/retry policy.
//! Writes commit on the master replica with a 1 second timeout; reads
//! retry up to 10 times. The harness never sees any of this.

use crate::{Store, StoreError, StoreResult};
use aerospike::{Bin, Bins, Client, ClientPolicy, CommitLevel, Key, ReadPolicy, Value, WritePolicy};
use serde::Deserialize;
use std::time::Duration;

const WRITE_TIMEOUT: Duration = Duration::from_secs(1);
const READ_MAX_RETRIES: usize = 10;

/// `aerospike` section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AerospikeConfig {
    /// Cluster seed nodes, `host:port`.
    #[serde(alias = "host")]
    pub hosts: Vec<String>,
    pub namespace: String,
    pub set: String,
    pub bin: String,
}

pub struct AerospikeStore {
    client: Client,
    namespace: String,
    set: String,
    bin: String,
    read_policy: ReadPolicy,
    write_policy: WritePolicy,
}

impl AerospikeStore {
    /// Connect to the cluster described by `cfg`.
    ///
    /// The connection queue is sized from `pool_hint` (the harness worker
    /// count) so that every worker can hold a connection per node without
    /// queueing on the pool itself.
    pub fn connect(cfg: &AerospikeConfig, pool_hint: usize) -> StoreResult<Self> {
        if cfg.hosts.is_empty() {
            return Err(StoreError::Config(
                "aerospike: at least one host is required".to_owned(),
            ));
        }

        let mut cpolicy = ClientPolicy::default();
        cpolicy.max_conns_per_node = pool_hint.max(1);

        let hosts = cfg.hosts.join(",");
        let client = Client::new(&cpolicy, &hosts)
            .map_err(|e| StoreError::Backend(format!("connect to {hosts}: {e}")))?;
        tracing::info!(hosts = %hosts, namespace = %cfg.namespace, "connected to aerospike cluster");

        let mut write_policy = WritePolicy::default();
        write_policy.base_policy.timeout = Some(WRITE_TIMEOUT);
        write_policy.commit_level = CommitLevel::CommitMaster;

        let mut read_policy = ReadPolicy::default();
        read_policy.max_retries = Some(READ_MAX_RETRIES);

        Ok(Self {
            client,
            namespace: cfg.namespace.clone(),
            set: cfg.set.clone(),
            bin: cfg.bin.clone(),
            read_policy,
            write_policy,
        })
    }

    fn record_key(&self, key: &str) -> StoreResult<Key> {
        Key::new(self.namespace.clone(), self.set.clone(), Value::from(key)).map_err(|e| {
            StoreError::InvalidKey {
                key: key.to_owned(),
                reason: e.to_string(),
            }
        })
    }
}

impl Store for AerospikeStore {
    fn name(&self) -> &str {
        "aerospike"
    }

    fn put(&self, key: &str, value: &str) -> StoreResult<()> {
        let record_key = self.record_key(key)?;
        let bins = [Bin::new(&self.bin, Value::from(value))];
        self.client
            .put(&self.write_policy, &record_key, &bins)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    fn get(&self, key: &str) -> StoreResult<String> {
        let record_key = self.record_key(key)?;
        let record = self
            .client
            .get(&self.read_policy, &record_key, Bins::All)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        match record.bins.get(self.bin.as_str()) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(format!("{other:?}")),
            None => Err(StoreError::NotFound(key.to_owned())),
        }
    }
}
